//! # Cart Commands
//!
//! The basket screen and the "Add to Cart" button.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  BASKET                                                   3 items       │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │  Tesla Model S                [−] 2 [+]                  21.00 TL       │
//! │  Ford Mustang                 [−] 1 [+]                   5.00 TL       │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │  Total                                                   26.00 TL       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Serialize;
use shopfront_core::{Cart, CartLine, Decrease};
use tracing::debug;

use crate::error::{AppError, AppResult};
use crate::state::{AddStatus, AppConfig};
use crate::AppState;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItemDto {
    pub product_id: String,
    pub name: String,
    pub brand: String,
    pub model: String,
    pub image: String,
    pub unit_price: String,
    pub quantity: i64,
    pub line_total: String,
    pub formatted_line_total: String,
}

impl CartItemDto {
    fn from_line(config: &AppConfig, line: &CartLine) -> Self {
        let line_total = line.line_total();
        CartItemDto {
            product_id: line.product.id.clone(),
            name: line.product.name.clone(),
            brand: line.product.brand.clone(),
            model: line.product.model.clone(),
            image: line.product.image.clone(),
            unit_price: line.product.price.to_decimal_string(),
            quantity: line.quantity,
            line_total: line_total.to_decimal_string(),
            formatted_line_total: config.format_price(line_total),
        }
    }
}

/// Cart totals summary.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartTotals {
    pub line_count: usize,
    pub total_quantity: i64,
    pub total_price: String,
    pub formatted_total: String,
}

impl CartTotals {
    fn from_cart(config: &AppConfig, cart: &Cart) -> Self {
        let total = cart.total_price();
        CartTotals {
            line_count: cart.line_count(),
            total_quantity: cart.total_quantity(),
            total_price: total.to_decimal_string(),
            formatted_total: config.format_price(total),
        }
    }
}

/// Cart response including items, totals and the status of the last action.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartResponse {
    pub items: Vec<CartItemDto>,
    pub totals: CartTotals,
    /// Outcome of the add, when the action was "Add to Cart".
    pub status: Option<AddStatus>,
    /// Translated status message.
    pub message: Option<String>,
    /// Last persistence failure recorded by the store.
    pub error: Option<AppError>,
}

fn respond(state: &AppState, status: Option<AddStatus>, message_key: Option<&str>) -> CartResponse {
    let (items, totals) = state.cart.with_cart(|cart| {
        let items = cart
            .lines()
            .iter()
            .map(|line| CartItemDto::from_line(&state.config, line))
            .collect();
        (items, CartTotals::from_cart(&state.config, cart))
    });

    CartResponse {
        items,
        totals,
        status,
        message: message_key.map(|key| state.translator().t(key)),
        error: state.cart.error(),
    }
}

/// Current cart contents.
pub fn get_cart(state: &AppState) -> CartResponse {
    debug!("get_cart command");
    respond(state, None, None)
}

/// Adds one unit of a catalog product.
///
/// ## Errors
/// `NotFound` if the id is not in the cached catalog.
pub async fn add_to_cart(state: &AppState, product_id: &str) -> AppResult<CartResponse> {
    debug!(product_id = %product_id, "add_to_cart command");
    let product = state.catalog.require(product_id)?;
    let outcome = state.cart.add_to_cart(&product).await;
    Ok(respond(state, Some(outcome.status), Some(outcome.message_key)))
}

/// Removes a line. Absent ids are a no-op.
pub async fn remove_from_cart(state: &AppState, product_id: &str) -> CartResponse {
    debug!(product_id = %product_id, "remove_from_cart command");
    let removed = state.cart.remove_from_cart(product_id).await;
    respond(state, None, removed.then_some("cart.removedFromCart"))
}

/// "+" on a basket line.
pub async fn increase_quantity(state: &AppState, product_id: &str) -> CartResponse {
    debug!(product_id = %product_id, "increase_quantity command");
    state.cart.increase_quantity(product_id).await;
    respond(state, None, None)
}

/// "−" on a basket line; the line disappears at zero.
pub async fn decrease_quantity(state: &AppState, product_id: &str) -> CartResponse {
    debug!(product_id = %product_id, "decrease_quantity command");
    let result = state.cart.decrease_quantity(product_id).await;
    let message = (result == Decrease::Removed).then_some("cart.removedFromCart");
    respond(state, None, message)
}

/// Empties the basket.
pub async fn clear_cart(state: &AppState) -> CartResponse {
    debug!("clear_cart command");
    state.cart.clear_cart().await;
    respond(state, None, Some("cart.cleared"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use crate::i18n::Language;
    use crate::testing::{product, FakeCatalog};
    use shopfront_db::MemoryKvStore;
    use std::sync::Arc;

    async fn state(kv: Arc<MemoryKvStore>) -> AppState {
        let state = AppState::new(
            AppConfig::default(),
            kv,
            Arc::new(FakeCatalog::new(vec![product("a", "10.50"), product("b", "5")])),
        );
        crate::initialize_stores(&state).await;
        state.language.change_language(Language::En).await.unwrap();
        state
    }

    #[tokio::test]
    async fn test_add_messages_and_totals() {
        let state = state(Arc::new(MemoryKvStore::new())).await;

        let first = add_to_cart(&state, "a").await.unwrap();
        assert_eq!(first.status, Some(AddStatus::Added));
        assert_eq!(first.message.as_deref(), Some("Product added to cart"));

        let second = add_to_cart(&state, "a").await.unwrap();
        assert_eq!(second.status, Some(AddStatus::QuantityIncreased));
        assert_eq!(second.message.as_deref(), Some("Product quantity increased"));

        let response = add_to_cart(&state, "b").await.unwrap();
        assert_eq!(response.totals.total_price, "26.00");
        assert_eq!(response.totals.formatted_total, "26.00 TL");
        assert_eq!(response.totals.total_quantity, 3);
        assert_eq!(response.items[0].line_total, "21.00");
        assert!(response.error.is_none());
    }

    #[tokio::test]
    async fn test_add_unknown_product() {
        let state = state(Arc::new(MemoryKvStore::new())).await;
        let err = add_to_cart(&state, "zzz").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn test_quantity_buttons() {
        let state = state(Arc::new(MemoryKvStore::new())).await;
        add_to_cart(&state, "a").await.unwrap();

        let response = increase_quantity(&state, "a").await;
        assert_eq!(response.items[0].quantity, 2);

        decrease_quantity(&state, "a").await;
        let response = decrease_quantity(&state, "a").await;
        assert!(response.items.is_empty());
        assert_eq!(response.message.as_deref(), Some("Product removed from cart"));
    }

    #[tokio::test]
    async fn test_storage_failure_reported_in_response() {
        let kv = Arc::new(MemoryKvStore::new());
        let state = state(kv.clone()).await;
        kv.set_fail_writes(true);

        let response = add_to_cart(&state, "a").await.unwrap();

        assert_eq!(response.items.len(), 1);
        assert_eq!(response.error.unwrap().code, ErrorCode::StorageError);
    }

    #[tokio::test]
    async fn test_clear() {
        let state = state(Arc::new(MemoryKvStore::new())).await;
        add_to_cart(&state, "a").await.unwrap();

        let response = clear_cart(&state).await;
        assert!(response.items.is_empty());
        assert_eq!(response.totals.total_price, "0.00");
        assert_eq!(get_cart(&state).totals.line_count, 0);
    }
}
