//! # Favorites Commands
//!
//! The favorites tab and the star button on product cards.

use serde::Serialize;
use tracing::debug;

use crate::commands::product::ProductDto;
use crate::error::{AppError, AppResult};
use crate::state::FavoriteOutcome;
use crate::AppState;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoritesResponse {
    pub items: Vec<ProductDto>,
    pub count: usize,
    pub outcome: Option<FavoriteOutcome>,
    pub message: Option<String>,
    pub error: Option<AppError>,
}

fn respond(state: &AppState, outcome: Option<FavoriteOutcome>) -> FavoritesResponse {
    let items: Vec<ProductDto> = state
        .favorites
        .favorites()
        .into_iter()
        .map(|p| ProductDto::from_product(state, p))
        .collect();

    FavoritesResponse {
        count: items.len(),
        items,
        outcome,
        message: outcome.map(|o| state.translator().t(o.message_key())),
        error: state.favorites.error(),
    }
}

pub fn get_favorites(state: &AppState) -> FavoritesResponse {
    debug!("get_favorites command");
    respond(state, None)
}

/// Adds a catalog product to favorites.
pub async fn add_to_favorites(state: &AppState, product_id: &str) -> AppResult<FavoritesResponse> {
    debug!(product_id = %product_id, "add_to_favorites command");
    let product = state.catalog.require(product_id)?;
    let outcome = state.favorites.add_to_favorites(&product).await;
    Ok(respond(state, Some(outcome)))
}

/// Removes a favorite. Works for products no longer in the catalog.
pub async fn remove_from_favorites(state: &AppState, product_id: &str) -> FavoritesResponse {
    debug!(product_id = %product_id, "remove_from_favorites command");
    let removed = state.favorites.remove_from_favorites(product_id).await;
    respond(state, removed.then_some(FavoriteOutcome::Removed))
}

/// The star button.
///
/// A stored favorite can be un-starred even when the catalog no longer
/// lists it.
pub async fn toggle_favorite(state: &AppState, product_id: &str) -> AppResult<FavoritesResponse> {
    debug!(product_id = %product_id, "toggle_favorite command");
    if state.favorites.contains(product_id) {
        return Ok(remove_from_favorites(state, product_id).await);
    }
    let product = state.catalog.require(product_id)?;
    let outcome = state.favorites.toggle(&product).await;
    Ok(respond(state, Some(outcome)))
}

pub async fn clear_favorites(state: &AppState) -> FavoritesResponse {
    debug!("clear_favorites command");
    state.favorites.clear_favorites().await;
    let mut response = respond(state, None);
    response.message = Some(state.translator().t("favorites.cleared"));
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::Language;
    use crate::state::AppConfig;
    use crate::testing::{product, FakeCatalog};
    use shopfront_db::MemoryKvStore;
    use std::sync::Arc;

    async fn state() -> AppState {
        let state = AppState::new(
            AppConfig::default(),
            Arc::new(MemoryKvStore::new()),
            Arc::new(FakeCatalog::new(vec![product("1", "10"), product("2", "20")])),
        );
        crate::initialize_stores(&state).await;
        state.language.change_language(Language::Tr).await.unwrap();
        state
    }

    #[tokio::test]
    async fn test_add_twice_reports_already_present() {
        let state = state().await;

        let first = add_to_favorites(&state, "1").await.unwrap();
        assert_eq!(first.outcome, Some(FavoriteOutcome::Added));
        assert_eq!(first.message.as_deref(), Some("Favorilere eklendi"));

        let second = add_to_favorites(&state, "1").await.unwrap();
        assert_eq!(second.outcome, Some(FavoriteOutcome::AlreadyPresent));
        assert_eq!(second.count, 1);
        assert!(second.items[0].is_favorite);
    }

    #[tokio::test]
    async fn test_toggle_and_remove() {
        let state = state().await;

        let on = toggle_favorite(&state, "2").await.unwrap();
        assert_eq!(on.outcome, Some(FavoriteOutcome::Added));

        let off = toggle_favorite(&state, "2").await.unwrap();
        assert_eq!(off.outcome, Some(FavoriteOutcome::Removed));
        assert_eq!(off.count, 0);

        let noop = remove_from_favorites(&state, "2").await;
        assert_eq!(noop.outcome, None);
        assert!(toggle_favorite(&state, "nope").await.is_err());
    }

    #[tokio::test]
    async fn test_clear() {
        let state = state().await;
        add_to_favorites(&state, "1").await.unwrap();
        add_to_favorites(&state, "2").await.unwrap();

        let response = clear_favorites(&state).await;
        assert_eq!(response.count, 0);
        assert_eq!(get_favorites(&state).count, 0);
    }
}
