//! # Catalog API Client
//!
//! The product catalog comes from a single remote endpoint:
//!
//! ```text
//! GET {api_url}/products
//!   Content-Type: application/json
//!   timeout: 30 s (configurable), no retry
//!
//! 200 OK
//! [
//!   { "id": "1", "name": "...", "brand": "...", "model": "...",
//!     "price": "51.00", "image": "...", "description": "...",
//!     "createdAt": "2023-07-17T07:21:02.529Z" },
//!   ...
//! ]
//! ```
//!
//! The body is parsed record by record: a record with a missing field or an
//! unparseable/negative price is dropped with a warning instead of failing the
//! whole catalog.

use async_trait::async_trait;
use reqwest::header::{HeaderValue, CONTENT_TYPE};
use reqwest::Client;
use serde_json::Value;
use shopfront_core::validation::validate_product;
use shopfront_core::Product;
use std::collections::HashSet;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::error::{AppError, AppResult};

/// Source of the product catalog.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    async fn fetch_products(&self) -> AppResult<Vec<Product>>;
}

/// `reqwest`-backed catalog client.
#[derive(Debug, Clone)]
pub struct HttpCatalogClient {
    http_client: Client,
    base_url: String,
}

impl HttpCatalogClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> AppResult<Self> {
        let http_client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(HttpCatalogClient {
            http_client,
            base_url: base_url.into(),
        })
    }

    /// `{base_url}/products`, tolerating a trailing slash on the base.
    pub fn products_url(&self) -> String {
        format!("{}/products", self.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl CatalogSource for HttpCatalogClient {
    async fn fetch_products(&self) -> AppResult<Vec<Product>> {
        let url = self.products_url();
        debug!(url = %url, "Fetching catalog");

        let response = self
            .http_client
            .get(&url)
            .header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
            .send()
            .await?
            .error_for_status()?;

        let body: Value = response.json().await?;
        let products = parse_catalog(body)?;

        info!(count = products.len(), "Catalog fetched");
        Ok(products)
    }
}

/// Turns a catalog response body into validated products.
///
/// The body must be a JSON array. Invalid records and repeated ids are
/// skipped; the first occurrence of an id wins.
pub fn parse_catalog(body: Value) -> AppResult<Vec<Product>> {
    let Value::Array(records) = body else {
        return Err(AppError::network("Catalog response is not a list"));
    };

    let mut seen = HashSet::new();
    let mut products = Vec::with_capacity(records.len());

    for (index, record) in records.into_iter().enumerate() {
        let product = match serde_json::from_value::<Product>(record) {
            Ok(product) => product,
            Err(e) => {
                warn!(index, error = %e, "Dropping unreadable catalog record");
                continue;
            }
        };

        if let Err(e) = validate_product(&product) {
            warn!(index, product_id = %product.id, error = %e, "Dropping invalid catalog record");
            continue;
        }

        if !seen.insert(product.id.clone()) {
            warn!(index, product_id = %product.id, "Dropping duplicate catalog record");
            continue;
        }

        products.push(product);
    }

    Ok(products)
}
