//! # Cart Store
//!
//! Holds the cart lines for the session and mirrors them to device storage.
//!
//! ## Mutation Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Store Operations                                │
//! │                                                                         │
//! │  Screen Action            Store Method              Cart Change         │
//! │  ─────────────            ────────────              ───────────         │
//! │                                                                         │
//! │  Add to Cart ───────────► add_to_cart() ──────────► push / qty + 1      │
//! │  "+" ───────────────────► increase_quantity() ────► qty + 1             │
//! │  "−" ───────────────────► decrease_quantity() ────► qty − 1 / remove    │
//! │  Remove ────────────────► remove_from_cart() ─────► remove line         │
//! │  Clear ─────────────────► clear_cart() ───────────► empty + delete key  │
//! │                                                                         │
//! │  Every mutation:                                                        │
//! │    1. lock, mutate, snapshot lines, unlock                              │
//! │    2. write {"version":2,"items":[...]} under "cart"                    │
//! │    3. on write failure: record `error`, keep the in-memory change       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The lock is never held across an `.await`, so two un-awaited mutations
//! may race: the last in-memory mutation wins, and whichever write lands last
//! wins on disk.

use serde::Serialize;
use shopfront_core::persisted::{self, CART_KEY};
use shopfront_core::{AddOutcome, Cart, CartLine, CoreError, Decrease, Money, Product};
use shopfront_db::KeyValueStore;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, info, warn};

use crate::error::AppError;

/// What happened on "Add to Cart".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum AddStatus {
    Added,
    QuantityIncreased,
    /// A cart limit was reached; nothing changed.
    Rejected,
}

/// Result of `add_to_cart`, with the translation key of the status message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddToCartOutcome {
    pub status: AddStatus,
    /// Quantity of the product in the cart afterwards.
    pub quantity: i64,
    pub success: bool,
    pub message_key: &'static str,
}

#[derive(Debug, Default)]
struct CartInner {
    cart: Cart,
    is_loading: bool,
    error: Option<AppError>,
}

/// Session cart with a persisted mirror.
pub struct CartStore {
    kv: Arc<dyn KeyValueStore>,
    inner: Mutex<CartInner>,
}

impl CartStore {
    /// Creates an empty store. Call [`CartStore::load`] to restore the mirror.
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        CartStore {
            kv,
            inner: Mutex::new(CartInner::default()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, CartInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn record_error(&self, err: AppError) {
        self.lock().error = Some(err);
    }

    // =========================================================================
    // Persistence
    // =========================================================================

    /// Replaces the in-memory cart with the stored copy.
    ///
    /// ## Behavior
    /// - No stored copy: empty cart
    /// - Unreadable stored copy: empty cart, logged, `error` untouched
    /// - Unreadable entries: skipped and logged, the rest kept and rewritten
    /// - Older schema: migrated, then rewritten in the current schema
    /// - Storage read failure: cart unchanged, `error` recorded
    pub async fn load(&self) {
        self.lock().is_loading = true;

        let stored = match self.kv.get(CART_KEY).await {
            Ok(stored) => stored,
            Err(e) => {
                warn!(error = %e, "Could not read stored cart");
                let mut inner = self.lock();
                inner.is_loading = false;
                inner.error = Some(AppError::from(e));
                return;
            }
        };

        let (cart, rewrite) = match stored {
            None => (Cart::new(), false),
            Some(raw) => match persisted::decode_cart(&raw) {
                Ok(decoded) => {
                    let cart = Cart::from_lines(decoded.items.iter().cloned());
                    let normalized = cart.lines() != decoded.items.as_slice();
                    if let Some(version) = decoded.migrated_from {
                        info!(from_version = version, "Migrating stored cart");
                    }
                    for entry in &decoded.skipped {
                        warn!(index = entry.index, reason = %entry.reason, "Skipping unreadable cart entry");
                    }
                    (cart, decoded.needs_rewrite() || normalized)
                }
                Err(e) => {
                    warn!(error = %e, "Discarding unreadable stored cart");
                    (Cart::new(), false)
                }
            },
        };

        let snapshot = {
            let mut inner = self.lock();
            debug!(lines = cart.line_count(), "Cart loaded");
            inner.cart = cart;
            inner.is_loading = false;
            inner.cart.lines().to_vec()
        };

        if rewrite {
            self.persist(snapshot).await;
        }
    }

    async fn persist(&self, lines: Vec<CartLine>) {
        let result = match persisted::encode_cart(&lines) {
            Ok(document) => self
                .kv
                .set(CART_KEY, &document)
                .await
                .map_err(AppError::from),
            Err(e) => Err(AppError::from(e)),
        };

        if let Err(err) = result {
            warn!(error = %err, "Failed to persist cart");
            self.record_error(err);
        }
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Adds one unit of `product`.
    pub async fn add_to_cart(&self, product: &Product) -> AddToCartOutcome {
        let (result, snapshot) = {
            let mut inner = self.lock();
            let result = inner.cart.add(product);
            let quantity = inner.cart.quantity_of(&product.id);
            ((result, quantity), inner.cart.lines().to_vec())
        };

        let outcome = match result {
            (Ok(AddOutcome::Added), quantity) => AddToCartOutcome {
                status: AddStatus::Added,
                quantity,
                success: true,
                message_key: "cart.addedToCart",
            },
            (Ok(AddOutcome::QuantityIncreased(quantity)), _) => AddToCartOutcome {
                status: AddStatus::QuantityIncreased,
                quantity,
                success: true,
                message_key: "cart.quantityIncreased",
            },
            (Err(e), quantity) => {
                warn!(product_id = %product.id, error = %e, "Add to cart rejected");
                return AddToCartOutcome {
                    status: AddStatus::Rejected,
                    quantity,
                    success: false,
                    message_key: "cart.errorAddingToCart",
                };
            }
        };

        debug!(product_id = %product.id, quantity = outcome.quantity, "Added to cart");
        self.persist(snapshot).await;
        outcome
    }

    /// Removes the line for `product_id`. Returns whether a line was removed.
    pub async fn remove_from_cart(&self, product_id: &str) -> bool {
        let snapshot = {
            let mut inner = self.lock();
            if !inner.cart.remove(product_id) {
                return false;
            }
            inner.cart.lines().to_vec()
        };

        debug!(product_id = %product_id, "Removed from cart");
        self.persist(snapshot).await;
        true
    }

    /// Adds one to a line's quantity.
    ///
    /// Returns the new quantity, or `None` if the product is not in the cart.
    /// At the per-line cap the quantity is left as is.
    pub async fn increase_quantity(&self, product_id: &str) -> Option<i64> {
        let (quantity, snapshot) = {
            let mut inner = self.lock();
            match inner.cart.increase(product_id) {
                Ok(Some(quantity)) => (quantity, inner.cart.lines().to_vec()),
                Ok(None) => return None,
                Err(CoreError::QuantityTooLarge { max, .. }) => {
                    debug!(product_id = %product_id, max, "Quantity already at maximum");
                    return Some(max);
                }
                Err(e) => {
                    warn!(product_id = %product_id, error = %e, "Increase rejected");
                    return Some(inner.cart.quantity_of(product_id));
                }
            }
        };

        debug!(product_id = %product_id, quantity, "Quantity increased");
        self.persist(snapshot).await;
        Some(quantity)
    }

    /// Subtracts one from a line's quantity, removing the line at zero.
    pub async fn decrease_quantity(&self, product_id: &str) -> Decrease {
        let (result, snapshot) = {
            let mut inner = self.lock();
            let result = inner.cart.decrease(product_id);
            if result == Decrease::NotInCart {
                return result;
            }
            (result, inner.cart.lines().to_vec())
        };

        debug!(product_id = %product_id, ?result, "Quantity decreased");
        self.persist(snapshot).await;
        result
    }

    /// Empties the cart and deletes the stored copy.
    pub async fn clear_cart(&self) {
        self.lock().cart.clear();
        debug!("Cart cleared");

        if let Err(e) = self.kv.remove(CART_KEY).await {
            warn!(error = %e, "Failed to delete stored cart");
            self.record_error(AppError::from(e));
        }
    }

    // =========================================================================
    // Reads
    // =========================================================================

    pub fn lines(&self) -> Vec<CartLine> {
        self.lock().cart.lines().to_vec()
    }

    /// Σ price × quantity.
    pub fn total_price(&self) -> Money {
        self.lock().cart.total_price()
    }

    pub fn total_quantity(&self) -> i64 {
        self.lock().cart.total_quantity()
    }

    pub fn line_count(&self) -> usize {
        self.lock().cart.line_count()
    }

    pub fn contains(&self, product_id: &str) -> bool {
        self.lock().cart.contains(product_id)
    }

    pub fn quantity_of(&self, product_id: &str) -> i64 {
        self.lock().cart.quantity_of(product_id)
    }

    /// Runs `f` against the cart under the lock.
    pub fn with_cart<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&Cart) -> R,
    {
        f(&self.lock().cart)
    }

    pub fn is_loading(&self) -> bool {
        self.lock().is_loading
    }

    /// Last persistence failure, if any.
    pub fn error(&self) -> Option<AppError> {
        self.lock().error.clone()
    }

    pub fn clear_error(&self) {
        self.lock().error = None;
    }
}
