//! Test fixtures shared by the store and command tests.

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use shopfront_core::{Money, Product};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use crate::api::CatalogSource;
use crate::error::{AppError, AppResult};

/// Product with the given id and decimal price.
pub(crate) fn product(id: &str, price: &str) -> Product {
    Product {
        id: id.to_string(),
        name: format!("Product {}", id),
        brand: "Tesla".to_string(),
        model: "Model S".to_string(),
        price: Money::parse_decimal(price).unwrap(),
        image: format!("https://example.com/{}.png", id),
        description: "A product".to_string(),
        created_at: Utc.with_ymd_and_hms(2023, 7, 17, 7, 21, 2).unwrap(),
    }
}

/// Catalog source returning a fixed list and counting calls.
pub(crate) struct FakeCatalog {
    products: Mutex<Vec<Product>>,
    fail: AtomicBool,
    calls: AtomicUsize,
}

impl FakeCatalog {
    pub(crate) fn new(products: Vec<Product>) -> Self {
        FakeCatalog {
            products: Mutex::new(products),
            fail: AtomicBool::new(false),
            calls: AtomicUsize::new(0),
        }
    }

    pub(crate) fn failing() -> Self {
        let fake = FakeCatalog::new(Vec::new());
        fake.set_failing(true);
        fake
    }

    pub(crate) fn set_failing(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    pub(crate) fn set_products(&self, products: Vec<Product>) {
        *self.products.lock().unwrap() = products;
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CatalogSource for FakeCatalog {
    async fn fetch_products(&self) -> AppResult<Vec<Product>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail.load(Ordering::SeqCst) {
            return Err(AppError::network("Could not reach the catalog service"));
        }
        Ok(self.products.lock().unwrap().clone())
    }
}
