//! # Cart
//!
//! Cart lines, quantity rules and totals.
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Operations                                      │
//! │                                                                         │
//! │  User Action              Cart method            Line change            │
//! │  ───────────              ───────────            ───────────            │
//! │                                                                         │
//! │  "Add to cart" ─────────► add() ───────────────► push(qty 1) or qty+1  │
//! │                                                                         │
//! │  "+" in basket ─────────► increase() ──────────► qty+1                 │
//! │                                                                         │
//! │  "−" in basket ─────────► decrease() ──────────► qty−1, or remove at 0 │
//! │                                                                         │
//! │  Trash icon ────────────► remove() ────────────► remove line           │
//! │                                                                         │
//! │  "Clear cart" ──────────► clear() ─────────────► no lines              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::Product;
use crate::validation::validate_price;
use crate::{MAX_CART_ITEMS, MAX_ITEM_QUANTITY};

// =============================================================================
// Cart Line
// =============================================================================

/// One product plus its quantity in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CartLine {
    pub product: Product,

    /// Always at least 1 while the line exists.
    pub quantity: i64,
}

impl CartLine {
    /// Creates a line with quantity 1.
    pub fn new(product: Product) -> Self {
        CartLine {
            product,
            quantity: 1,
        }
    }

    /// Unit price × quantity.
    pub fn line_total(&self) -> Money {
        self.product.price.multiply_quantity(self.quantity)
    }
}

// =============================================================================
// Outcomes
// =============================================================================

/// What `Cart::add` did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    /// A new line with quantity 1 was appended.
    Added,
    /// The existing line's quantity was bumped to the contained value.
    QuantityIncreased(i64),
}

/// What `Cart::decrease` did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decrease {
    /// Quantity dropped to the contained value (still ≥ 1).
    Decreased(i64),
    /// Quantity would have reached 0, so the line was removed.
    Removed,
    /// No line for that product id.
    NotInCart,
}

// =============================================================================
// Cart
// =============================================================================

/// The shopping cart.
///
/// ## Invariants
/// - Lines are unique by `product.id` (adding the same product bumps quantity)
/// - Quantity is never 0: a line that would reach 0 is removed
/// - At most `MAX_CART_ITEMS` lines, each with at most `MAX_ITEM_QUANTITY`
/// - Every unit price is within `0..=MAX_PRICE`, so totals cannot overflow
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    /// Creates a new empty cart.
    pub fn new() -> Self {
        Cart { lines: Vec::new() }
    }

    /// Builds a cart from lines of unknown provenance (e.g. a persisted mirror).
    ///
    /// Duplicate product ids are merged, keeping the first line's position,
    /// quantities are clamped to `1..=MAX_ITEM_QUANTITY`, and lines with a
    /// non-positive quantity or an out-of-range price are dropped. Lines past
    /// `MAX_CART_ITEMS` are dropped too.
    pub fn from_lines(lines: impl IntoIterator<Item = CartLine>) -> Self {
        let mut cart = Cart::new();
        for line in lines {
            if line.quantity < 1 || validate_price(line.product.price).is_err() {
                continue;
            }
            match cart.position(&line.product.id) {
                Some(idx) => {
                    let merged = cart.lines[idx].quantity.saturating_add(line.quantity);
                    cart.lines[idx].quantity = merged.min(MAX_ITEM_QUANTITY);
                }
                None if cart.lines.len() >= MAX_CART_ITEMS => {}
                None => cart.lines.push(CartLine {
                    quantity: line.quantity.min(MAX_ITEM_QUANTITY),
                    ..line
                }),
            }
        }
        cart
    }

    fn position(&self, product_id: &str) -> Option<usize> {
        self.lines.iter().position(|l| l.product.id == product_id)
    }

    /// Adds a product, or bumps its quantity by one if already present.
    ///
    /// ## Errors
    /// - `QuantityTooLarge` if the existing line is at `MAX_ITEM_QUANTITY`
    /// - `CartTooLarge` if a new line would exceed `MAX_CART_ITEMS`
    /// - `Validation` if the price is negative or above `MAX_PRICE`
    pub fn add(&mut self, product: &Product) -> CoreResult<AddOutcome> {
        validate_price(product.price)?;

        if let Some(idx) = self.position(&product.id) {
            let quantity = self.bump(idx)?;
            return Ok(AddOutcome::QuantityIncreased(quantity));
        }

        if self.lines.len() >= MAX_CART_ITEMS {
            return Err(CoreError::CartTooLarge {
                max: MAX_CART_ITEMS,
            });
        }

        self.lines.push(CartLine::new(product.clone()));
        Ok(AddOutcome::Added)
    }

    fn bump(&mut self, idx: usize) -> CoreResult<i64> {
        let line = &mut self.lines[idx];
        let requested = line.quantity + 1;
        if requested > MAX_ITEM_QUANTITY {
            return Err(CoreError::QuantityTooLarge {
                requested,
                max: MAX_ITEM_QUANTITY,
            });
        }
        line.quantity = requested;
        Ok(requested)
    }

    /// Increments a line's quantity by one.
    ///
    /// Returns `Ok(None)` when the product is not in the cart (no-op).
    pub fn increase(&mut self, product_id: &str) -> CoreResult<Option<i64>> {
        match self.position(product_id) {
            Some(idx) => self.bump(idx).map(Some),
            None => Ok(None),
        }
    }

    /// Decrements a line's quantity by one, removing the line instead of
    /// storing quantity 0.
    pub fn decrease(&mut self, product_id: &str) -> Decrease {
        let Some(idx) = self.position(product_id) else {
            return Decrease::NotInCart;
        };

        if self.lines[idx].quantity <= 1 {
            self.lines.remove(idx);
            Decrease::Removed
        } else {
            self.lines[idx].quantity -= 1;
            Decrease::Decreased(self.lines[idx].quantity)
        }
    }

    /// Removes a line by product id. Returns whether anything was removed.
    pub fn remove(&mut self, product_id: &str) -> bool {
        let initial_len = self.lines.len();
        self.lines.retain(|l| l.product.id != product_id);
        self.lines.len() != initial_len
    }

    /// Removes every line.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn into_lines(self) -> Vec<CartLine> {
        self.lines
    }

    /// Number of distinct products.
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Sum of all quantities (the basket badge number).
    pub fn total_quantity(&self) -> i64 {
        self.lines.iter().map(|l| l.quantity).sum()
    }

    /// Sum over all lines of price × quantity.
    pub fn total_price(&self) -> Money {
        self.lines.iter().map(CartLine::line_total).sum()
    }

    pub fn contains(&self, product_id: &str) -> bool {
        self.position(product_id).is_some()
    }

    /// Quantity for a product, 0 if not in the cart.
    pub fn quantity_of(&self, product_id: &str) -> i64 {
        self.position(product_id)
            .map(|idx| self.lines[idx].quantity)
            .unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
