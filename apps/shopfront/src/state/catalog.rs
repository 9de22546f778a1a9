//! # Catalog Store
//!
//! Fetch-once cache of the remote product list, plus the Home screen's
//! search, filter and "load more" views over it.
//!
//! ```text
//! fetch_products()
//!      │
//!      ├── already loaded? ──► return (no TTL, no invalidation)
//!      ├── already loading? ─► return
//!      ▼
//! is_loading = true, error = None
//!      │
//!      ▼
//! CatalogSource::fetch_products().await
//!      │
//!      ├── Ok  ──► products cached, loaded = true unless the list is empty
//!      └── Err ──► error recorded, cache untouched (next call retries)
//! ```

use shopfront_core::catalog::{self, paginate};
use shopfront_core::{CoreError, Page, Product, ProductQuery, DEFAULT_PAGE_SIZE};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, info, warn};

use crate::api::CatalogSource;
use crate::error::{AppError, AppResult};

#[derive(Debug, Default)]
struct CatalogInner {
    products: Vec<Product>,
    loaded: bool,
    is_loading: bool,
    error: Option<AppError>,
}

pub struct CatalogStore {
    source: Arc<dyn CatalogSource>,
    page_size: usize,
    inner: Mutex<CatalogInner>,
}

impl CatalogStore {
    pub fn new(source: Arc<dyn CatalogSource>) -> Self {
        CatalogStore {
            source,
            page_size: DEFAULT_PAGE_SIZE,
            inner: Mutex::new(CatalogInner::default()),
        }
    }

    /// Sets the "load more" page size (minimum 1).
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    fn lock(&self) -> MutexGuard<'_, CatalogInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Loads the catalog once per store lifetime.
    ///
    /// An empty response is cached but does not count as loaded, so the next
    /// call asks the service again.
    pub async fn fetch_products(&self) {
        {
            let mut inner = self.lock();
            if inner.loaded || inner.is_loading {
                debug!(loaded = inner.loaded, "Catalog fetch skipped");
                return;
            }
            inner.is_loading = true;
            inner.error = None;
        }

        let result = self.source.fetch_products().await;

        let mut inner = self.lock();
        inner.is_loading = false;
        match result {
            Ok(products) => {
                info!(count = products.len(), "Catalog cached");
                inner.loaded = !products.is_empty();
                inner.products = products;
            }
            Err(err) => {
                warn!(error = %err, "Catalog fetch failed");
                inner.error = Some(err);
            }
        }
    }

    pub fn products(&self) -> Vec<Product> {
        self.lock().products.clone()
    }

    pub fn is_loaded(&self) -> bool {
        self.lock().loaded
    }

    pub fn is_loading(&self) -> bool {
        self.lock().is_loading
    }

    pub fn error(&self) -> Option<AppError> {
        self.lock().error.clone()
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Looks up a cached product by id.
    pub fn find(&self, product_id: &str) -> Option<Product> {
        self.lock()
            .products
            .iter()
            .find(|p| p.id == product_id)
            .cloned()
    }

    /// Like [`CatalogStore::find`], but a missing id is a `NotFound` error.
    pub fn require(&self, product_id: &str) -> AppResult<Product> {
        self.find(product_id)
            .ok_or_else(|| CoreError::ProductNotFound(product_id.to_string()).into())
    }

    /// Products matching `query`, in catalog order.
    pub fn search(&self, query: &ProductQuery) -> Vec<Product> {
        query.apply(&self.lock().products)
    }

    /// The first `page × page_size` matches.
    pub fn page(&self, query: &ProductQuery, page: usize) -> Page<Product> {
        paginate(self.search(query), page, self.page_size)
    }

    pub fn available_brands(&self) -> Vec<String> {
        catalog::available_brands(&self.lock().products)
    }

    pub fn available_models(&self) -> Vec<String> {
        catalog::available_models(&self.lock().products)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use crate::testing::{product, FakeCatalog};
    use shopfront_core::Money;

    fn catalog() -> Vec<Product> {
        let mut a = product("1", "10");
        a.name = "Red Roadster".into();
        a.model = "Roadster".into();
        let mut b = product("2", "25.50");
        b.brand = "Ford".into();
        b.model = "Mustang".into();
        let mut c = product("3", "99.99");
        c.description = "A roadster with a soft top".into();
        c.brand = "Mazda".into();
        c.model = "MX-5".into();
        vec![a, b, c]
    }

    #[tokio::test]
    async fn test_fetch_once() {
        let source = Arc::new(FakeCatalog::new(catalog()));
        let store = CatalogStore::new(source.clone());

        store.fetch_products().await;
        store.fetch_products().await;

        assert_eq!(source.calls(), 1);
        assert!(store.is_loaded());
        assert!(!store.is_loading());
        assert_eq!(store.products().len(), 3);
    }

    #[tokio::test]
    async fn test_fetch_failure_is_recorded_and_retried() {
        let source = Arc::new(FakeCatalog::failing());
        let store = CatalogStore::new(source.clone());

        store.fetch_products().await;
        assert_eq!(store.error().unwrap().code, ErrorCode::NetworkError);
        assert!(store.products().is_empty());
        assert!(!store.is_loaded());

        source.set_failing(false);
        source.set_products(catalog());
        store.fetch_products().await;
        assert_eq!(source.calls(), 2);
        assert!(store.error().is_none());
        assert!(store.is_loaded());
    }

    #[tokio::test]
    async fn test_empty_catalog_is_fetched_again() {
        let source = Arc::new(FakeCatalog::new(Vec::new()));
        let store = CatalogStore::new(source.clone());

        store.fetch_products().await;
        assert!(!store.is_loaded());
        assert!(store.error().is_none());
        assert!(store.products().is_empty());

        source.set_products(catalog());
        store.fetch_products().await;
        assert_eq!(source.calls(), 2);
        assert!(store.is_loaded());
        assert_eq!(store.products().len(), 3);

        store.fetch_products().await;
        assert_eq!(source.calls(), 2);
    }

    #[tokio::test]
    async fn test_find_and_require() {
        let store = CatalogStore::new(Arc::new(FakeCatalog::new(catalog())));
        store.fetch_products().await;

        assert_eq!(store.find("2").unwrap().brand, "Ford");
        assert!(store.find("9").is_none());
        assert_eq!(store.require("9").unwrap_err().code, ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn test_search_and_filters() {
        let store = CatalogStore::new(Arc::new(FakeCatalog::new(catalog())));
        store.fetch_products().await;

        let hits = store.search(&ProductQuery::new().search("ROADSTER"));
        let ids: Vec<_> = hits.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "3"]);

        let hits = store.search(
            &ProductQuery::new().price_range(Some(Money::from_cents(1000)), Some(Money::from_cents(2550))),
        );
        assert_eq!(hits.len(), 2);

        assert_eq!(store.available_brands(), vec!["Ford", "Mazda", "Tesla"]);
        assert_eq!(store.available_models(), vec!["MX-5", "Mustang", "Roadster"]);
    }

    #[tokio::test]
    async fn test_page() {
        let store = CatalogStore::new(Arc::new(FakeCatalog::new(catalog()))).with_page_size(2);
        store.fetch_products().await;

        let first = store.page(&ProductQuery::new(), 1);
        assert_eq!(first.items.len(), 2);
        assert_eq!(first.total, 3);
        assert!(first.has_more);

        let second = store.page(&ProductQuery::new(), 2);
        assert_eq!(second.items.len(), 3);
        assert!(!second.has_more);
    }
}
