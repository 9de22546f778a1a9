//! # Favorites Store
//!
//! Same persistence contract as the cart store, keyed under `favorites`.

use serde::Serialize;
use shopfront_core::persisted::{self, FAVORITES_KEY};
use shopfront_core::{FavoriteSet, Product};
use shopfront_db::KeyValueStore;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, info, warn};

use crate::error::AppError;

/// Result of adding or toggling a favorite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum FavoriteOutcome {
    Added,
    AlreadyPresent,
    Removed,
}

impl FavoriteOutcome {
    /// Translation key of the status message.
    pub fn message_key(&self) -> &'static str {
        match self {
            FavoriteOutcome::Added => "favorites.addedToFavorites",
            FavoriteOutcome::AlreadyPresent => "favorites.alreadyInFavorites",
            FavoriteOutcome::Removed => "favorites.removedFromFavorites",
        }
    }
}

#[derive(Debug, Default)]
struct FavoritesInner {
    favorites: FavoriteSet,
    is_loading: bool,
    error: Option<AppError>,
}

pub struct FavoritesStore {
    kv: Arc<dyn KeyValueStore>,
    inner: Mutex<FavoritesInner>,
}

impl FavoritesStore {
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        FavoritesStore {
            kv,
            inner: Mutex::new(FavoritesInner::default()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, FavoritesInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn record_error(&self, err: AppError) {
        self.lock().error = Some(err);
    }

    /// Replaces the in-memory set with the stored copy.
    pub async fn load(&self) {
        self.lock().is_loading = true;

        let stored = match self.kv.get(FAVORITES_KEY).await {
            Ok(stored) => stored,
            Err(e) => {
                warn!(error = %e, "Could not read stored favorites");
                let mut inner = self.lock();
                inner.is_loading = false;
                inner.error = Some(AppError::from(e));
                return;
            }
        };

        let (favorites, rewrite) = match stored {
            None => (FavoriteSet::new(), false),
            Some(raw) => match persisted::decode_favorites(&raw) {
                Ok(decoded) => {
                    let favorites = FavoriteSet::from_products(decoded.items.iter().cloned());
                    let deduped = favorites.len() != decoded.items.len();
                    if let Some(version) = decoded.migrated_from {
                        info!(from_version = version, "Migrating stored favorites");
                    }
                    for entry in &decoded.skipped {
                        warn!(index = entry.index, reason = %entry.reason, "Skipping unreadable favorite");
                    }
                    (favorites, decoded.needs_rewrite() || deduped)
                }
                Err(e) => {
                    warn!(error = %e, "Discarding unreadable stored favorites");
                    (FavoriteSet::new(), false)
                }
            },
        };

        let snapshot = {
            let mut inner = self.lock();
            debug!(count = favorites.len(), "Favorites loaded");
            inner.favorites = favorites;
            inner.is_loading = false;
            inner.favorites.products().to_vec()
        };

        if rewrite {
            self.persist(snapshot).await;
        }
    }

    async fn persist(&self, products: Vec<Product>) {
        let result = match persisted::encode_favorites(&products) {
            Ok(document) => self
                .kv
                .set(FAVORITES_KEY, &document)
                .await
                .map_err(AppError::from),
            Err(e) => Err(AppError::from(e)),
        };

        if let Err(err) = result {
            warn!(error = %err, "Failed to persist favorites");
            self.record_error(err);
        }
    }

    /// Adds `product` unless its id is already a favorite.
    pub async fn add_to_favorites(&self, product: &Product) -> FavoriteOutcome {
        let snapshot = {
            let mut inner = self.lock();
            if !inner.favorites.add(product.clone()) {
                return FavoriteOutcome::AlreadyPresent;
            }
            inner.favorites.products().to_vec()
        };

        debug!(product_id = %product.id, "Added to favorites");
        self.persist(snapshot).await;
        FavoriteOutcome::Added
    }

    /// Removes a favorite. Returns whether anything was removed.
    pub async fn remove_from_favorites(&self, product_id: &str) -> bool {
        let snapshot = {
            let mut inner = self.lock();
            if !inner.favorites.remove(product_id) {
                return false;
            }
            inner.favorites.products().to_vec()
        };

        debug!(product_id = %product_id, "Removed from favorites");
        self.persist(snapshot).await;
        true
    }

    /// The star button: add if absent, remove if present.
    pub async fn toggle(&self, product: &Product) -> FavoriteOutcome {
        let (added, snapshot) = {
            let mut inner = self.lock();
            let added = inner.favorites.toggle(product.clone());
            (added, inner.favorites.products().to_vec())
        };

        debug!(product_id = %product.id, added, "Favorite toggled");
        self.persist(snapshot).await;
        if added {
            FavoriteOutcome::Added
        } else {
            FavoriteOutcome::Removed
        }
    }

    /// Empties the set and deletes the stored copy.
    pub async fn clear_favorites(&self) {
        self.lock().favorites.clear();
        debug!("Favorites cleared");

        if let Err(e) = self.kv.remove(FAVORITES_KEY).await {
            warn!(error = %e, "Failed to delete stored favorites");
            self.record_error(AppError::from(e));
        }
    }

    pub fn favorites(&self) -> Vec<Product> {
        self.lock().favorites.products().to_vec()
    }

    pub fn contains(&self, product_id: &str) -> bool {
        self.lock().favorites.contains(product_id)
    }

    pub fn len(&self) -> usize {
        self.lock().favorites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().favorites.is_empty()
    }

    pub fn is_loading(&self) -> bool {
        self.lock().is_loading
    }

    pub fn error(&self) -> Option<AppError> {
        self.lock().error.clone()
    }

    pub fn clear_error(&self) {
        self.lock().error = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use crate::testing::product;
    use serde_json::Value;
    use shopfront_db::MemoryKvStore;

    fn store() -> (Arc<MemoryKvStore>, FavoritesStore) {
        let kv = Arc::new(MemoryKvStore::new());
        let store = FavoritesStore::new(kv.clone());
        (kv, store)
    }

    #[tokio::test]
    async fn test_favoriting_twice_keeps_one() {
        let (kv, favorites) = store();
        let p = product("1", "10");

        assert_eq!(favorites.add_to_favorites(&p).await, FavoriteOutcome::Added);
        let writes = kv.write_count();
        assert_eq!(
            favorites.add_to_favorites(&p).await,
            FavoriteOutcome::AlreadyPresent
        );

        assert_eq!(favorites.len(), 1);
        assert_eq!(kv.write_count(), writes);
        assert_eq!(
            FavoriteOutcome::AlreadyPresent.message_key(),
            "favorites.alreadyInFavorites"
        );
    }

    #[tokio::test]
    async fn test_persisted_document_shape() {
        let (kv, favorites) = store();
        favorites.add_to_favorites(&product("1", "51.00")).await;
        favorites.add_to_favorites(&product("2", "3")).await;

        let doc: Value = serde_json::from_str(&kv.peek(FAVORITES_KEY).await.unwrap()).unwrap();
        assert_eq!(doc["version"], 2);
        assert_eq!(doc["items"].as_array().unwrap().len(), 2);
        assert_eq!(doc["items"][0]["id"], "1");
        assert_eq!(doc["items"][0]["price"], "51.00");
    }

    #[tokio::test]
    async fn test_remove_and_toggle() {
        let (_kv, favorites) = store();
        let p = product("1", "1");

        assert!(!favorites.remove_from_favorites("1").await);

        assert_eq!(favorites.toggle(&p).await, FavoriteOutcome::Added);
        assert!(favorites.contains("1"));
        assert_eq!(favorites.toggle(&p).await, FavoriteOutcome::Removed);
        assert!(favorites.is_empty());

        favorites.add_to_favorites(&p).await;
        assert!(favorites.remove_from_favorites("1").await);
        assert!(favorites.favorites().is_empty());
    }

    #[tokio::test]
    async fn test_clear_deletes_key() {
        let (kv, favorites) = store();
        favorites.add_to_favorites(&product("1", "1")).await;

        favorites.clear_favorites().await;

        assert!(favorites.is_empty());
        assert_eq!(kv.peek(FAVORITES_KEY).await, None);
    }

    #[tokio::test]
    async fn test_write_failure_keeps_memory_and_sets_error() {
        let (kv, favorites) = store();
        kv.set_fail_writes(true);

        favorites.add_to_favorites(&product("1", "1")).await;
        assert!(favorites.contains("1"));
        assert_eq!(favorites.error().unwrap().code, ErrorCode::StorageError);

        favorites.clear_favorites().await;
        assert!(favorites.is_empty());
        assert!(favorites.error().is_some());
    }

    #[tokio::test]
    async fn test_load_bare_array_and_rewrite() {
        let legacy = serde_json::to_string(&vec![
            product("1", "1"),
            product("2", "2"),
            product("1", "1"),
        ])
        .unwrap();
        let kv = Arc::new(MemoryKvStore::with_entries([(FAVORITES_KEY, legacy)]));
        let favorites = FavoritesStore::new(kv.clone());

        favorites.load().await;

        assert_eq!(favorites.len(), 2);
        assert!(!favorites.is_loading());
        let doc: Value = serde_json::from_str(&kv.peek(FAVORITES_KEY).await.unwrap()).unwrap();
        assert_eq!(doc["version"], 2);
        assert_eq!(doc["items"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_load_skips_unreadable_entry_and_rewrites() {
        let mut bad = serde_json::to_value(product("2", "1")).unwrap();
        bad["price"] = Value::String("n/a".into());
        let legacy = Value::Array(vec![
            serde_json::to_value(product("1", "1")).unwrap(),
            bad,
            serde_json::to_value(product("3", "3")).unwrap(),
        ]);
        let kv = Arc::new(MemoryKvStore::with_entries([(FAVORITES_KEY, legacy.to_string())]));
        let favorites = FavoritesStore::new(kv.clone());

        favorites.load().await;

        assert_eq!(favorites.len(), 2);
        assert!(favorites.contains("1"));
        assert!(favorites.contains("3"));
        let doc: Value = serde_json::from_str(&kv.peek(FAVORITES_KEY).await.unwrap()).unwrap();
        assert_eq!(doc["items"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_load_malformed_is_empty() {
        let kv = Arc::new(MemoryKvStore::with_entries([(FAVORITES_KEY, "42")]));
        let favorites = FavoritesStore::new(kv);

        favorites.load().await;

        assert!(favorites.is_empty());
        assert!(favorites.error().is_none());
    }
}
