//! # Product Commands
//!
//! Home grid search/filter/"load more" and the product detail view.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Home Screen Flow                                     │
//! │                                                                         │
//! │  search box ──┐                                                         │
//! │  filter sheet ┼──► SearchParams ──► ProductQuery ──► CatalogStore::page │
//! │  scroll end ──┘        (page)                              │            │
//! │                                                            ▼            │
//! │                     ProductListResponse { items, hasMore, brands, ... } │
//! │                                                                         │
//! │  Each item carries `inCart` / `isFavorite` for the card buttons.        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use shopfront_core::validation::validate_search_query;
use shopfront_core::{Money, Product, ProductQuery};
use tracing::debug;

use crate::error::{AppError, AppResult};
use crate::AppState;

/// Product card / detail DTO.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDto {
    pub id: String,
    pub name: String,
    pub brand: String,
    pub model: String,
    pub price: String,
    pub formatted_price: String,
    pub image: String,
    pub description: String,
    pub in_cart: bool,
    pub cart_quantity: i64,
    pub is_favorite: bool,
}

impl ProductDto {
    pub fn from_product(state: &AppState, product: Product) -> Self {
        let cart_quantity = state.cart.quantity_of(&product.id);
        ProductDto {
            is_favorite: state.favorites.contains(&product.id),
            in_cart: cart_quantity > 0,
            cart_quantity,
            formatted_price: state.config.format_price(product.price),
            price: product.price.to_decimal_string(),
            id: product.id,
            name: product.name,
            brand: product.brand,
            model: product.model,
            image: product.image,
            description: product.description,
        }
    }
}

/// Search box text plus filter sheet selections.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchParams {
    pub search: Option<String>,
    #[serde(default)]
    pub brands: Vec<String>,
    #[serde(default)]
    pub models: Vec<String>,
    /// Decimal string, inclusive.
    pub min_price: Option<String>,
    /// Decimal string, inclusive.
    pub max_price: Option<String>,
    /// 1-based "load more" page.
    #[serde(default)]
    pub page: usize,
}

impl SearchParams {
    /// Validates the raw input into a catalog query.
    pub fn to_query(&self) -> AppResult<ProductQuery> {
        let mut query = ProductQuery::new();

        if let Some(search) = &self.search {
            let search = validate_search_query(search)
                .map_err(|e| AppError::validation(e.to_string()))?;
            if !search.is_empty() {
                query = query.search(search);
            }
        }

        query.brands = self.brands.clone();
        query.models = self.models.clone();

        let min = parse_bound(self.min_price.as_deref())?;
        let max = parse_bound(self.max_price.as_deref())?;
        if let (Some(min), Some(max)) = (min, max) {
            if min > max {
                return Err(AppError::validation(
                    "Minimum price cannot be greater than maximum price",
                ));
            }
        }

        Ok(query.price_range(min, max))
    }
}

fn parse_bound(raw: Option<&str>) -> AppResult<Option<Money>> {
    raw.map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| Money::parse_decimal(s).map_err(|e| AppError::validation(e.to_string())))
        .transpose()
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductListResponse {
    pub items: Vec<ProductDto>,
    pub page: usize,
    pub page_size: usize,
    pub total: usize,
    pub has_more: bool,
    pub available_brands: Vec<String>,
    pub available_models: Vec<String>,
    /// Empty-state text when nothing matched.
    pub message: Option<String>,
    /// Catalog fetch failure, if any.
    pub error: Option<AppError>,
}

/// Searches, filters and pages the cached catalog.
pub fn search_products(state: &AppState, params: &SearchParams) -> AppResult<ProductListResponse> {
    let query = params.to_query()?;
    debug!(?query, page = params.page, "search_products command");

    let page = state.catalog.page(&query, params.page);
    let t = state.translator();

    let message = if page.total > 0 {
        None
    } else if let Some(search) = &query.search {
        Some(t.t_with("home.noSearchResults", &[("query", search.as_str())]))
    } else if query.has_filters() {
        Some(t.t("home.noFilterResults"))
    } else {
        None
    };

    Ok(ProductListResponse {
        items: page
            .items
            .into_iter()
            .map(|p| ProductDto::from_product(state, p))
            .collect(),
        page: page.page,
        page_size: page.page_size,
        total: page.total,
        has_more: page.has_more,
        available_brands: state.catalog.available_brands(),
        available_models: state.catalog.available_models(),
        message,
        error: state.catalog.error(),
    })
}

/// Product detail by id.
pub fn get_product(state: &AppState, product_id: &str) -> AppResult<ProductDto> {
    debug!(product_id = %product_id, "get_product command");
    let product = state.catalog.require(product_id)?;
    Ok(ProductDto::from_product(state, product))
}
