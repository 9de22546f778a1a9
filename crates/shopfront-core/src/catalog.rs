//! # Catalog Query
//!
//! Client-side search, filtering and "load more" pagination over the cached
//! product list. The catalog service takes no query parameters, so every
//! narrowing of the list happens here.
//!
//! ## Filter Pipeline
//! ```text
//! all products
//!      │
//!      ▼
//! search text ──► name / brand / model / description contains (case-insensitive)
//!      │
//!      ▼
//! brands ───────► product.brand ∈ selected brands   (skipped when empty)
//!      │
//!      ▼
//! models ───────► product.model ∈ selected models   (skipped when empty)
//!      │
//!      ▼
//! price range ──► min ≤ price ≤ max                  (each bound optional)
//!      │
//!      ▼
//! paginate(page, page_size) ──► first page × page_size items
//! ```

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::money::Money;
use crate::types::Product;

// =============================================================================
// Product Query
// =============================================================================

/// Search text plus the filter-sheet selections.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductQuery {
    pub search: Option<String>,
    pub brands: Vec<String>,
    pub models: Vec<String>,
    pub min_price: Option<Money>,
    pub max_price: Option<Money>,
}

impl ProductQuery {
    pub fn new() -> Self {
        ProductQuery::default()
    }

    pub fn search(mut self, text: impl Into<String>) -> Self {
        self.search = Some(text.into());
        self
    }

    pub fn brand(mut self, brand: impl Into<String>) -> Self {
        self.brands.push(brand.into());
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.models.push(model.into());
        self
    }

    pub fn price_range(mut self, min: Option<Money>, max: Option<Money>) -> Self {
        self.min_price = min;
        self.max_price = max;
        self
    }

    /// Whether any filter-sheet selection is active (search text excluded).
    pub fn has_filters(&self) -> bool {
        !self.brands.is_empty()
            || !self.models.is_empty()
            || self.min_price.is_some()
            || self.max_price.is_some()
    }

    fn search_needle(&self) -> Option<String> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase)
    }

    /// Whether a single product passes every active criterion.
    pub fn matches(&self, product: &Product) -> bool {
        self.matches_with(product, self.search_needle().as_deref())
    }

    fn matches_with(&self, product: &Product, needle: Option<&str>) -> bool {
        if let Some(needle) = needle {
            if !product.matches_text(needle) {
                return false;
            }
        }
        if !self.brands.is_empty() && !self.brands.contains(&product.brand) {
            return false;
        }
        if !self.models.is_empty() && !self.models.contains(&product.model) {
            return false;
        }
        if self.min_price.is_some_and(|min| product.price < min) {
            return false;
        }
        if self.max_price.is_some_and(|max| product.price > max) {
            return false;
        }
        true
    }

    /// Applies the query, preserving catalog order.
    pub fn apply(&self, products: &[Product]) -> Vec<Product> {
        let needle = self.search_needle();
        products
            .iter()
            .filter(|p| self.matches_with(p, needle.as_deref()))
            .cloned()
            .collect()
    }
}

// =============================================================================
// Filter Options
// =============================================================================

/// Distinct brands, sorted. Feeds the filter sheet's brand list.
pub fn available_brands(products: &[Product]) -> Vec<String> {
    distinct(products.iter().map(|p| p.brand.as_str()))
}

/// Distinct models, sorted. Feeds the filter sheet's model list.
pub fn available_models(products: &[Product]) -> Vec<String> {
    distinct(products.iter().map(|p| p.model.as_str()))
}

fn distinct<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    values
        .filter(|v| !v.is_empty())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}

// =============================================================================
// Pagination
// =============================================================================

/// A "load more" window over a filtered list.
///
/// Page `n` shows the first `n × page_size` items, matching an infinite
/// scroll that appends a page at a time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: usize,
    pub page_size: usize,
    /// Size of the full filtered list.
    pub total: usize,
    pub has_more: bool,
}

/// Cuts the "load more" window for `page` (1-based; 0 is treated as 1).
pub fn paginate<T>(mut items: Vec<T>, page: usize, page_size: usize) -> Page<T> {
    let page = page.max(1);
    let page_size = page_size.max(1);
    let total = items.len();
    let shown = page.saturating_mul(page_size).min(total);
    items.truncate(shown);

    Page {
        items,
        page,
        page_size,
        total,
        has_more: shown < total,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::tests::product;

    fn catalog() -> Vec<Product> {
        let mut a = product("1", "10");
        a.name = "Red Roadster".into();
        a.brand = "Tesla".into();
        a.model = "Roadster".into();

        let mut b = product("2", "25.50");
        b.name = "Family Wagon".into();
        b.brand = "Volvo".into();
        b.model = "V90".into();

        let mut c = product("3", "99");
        c.name = "City Car".into();
        c.brand = "Fiat".into();
        c.model = "500".into();
        c.description = "Tiny and red".into();

        vec![a, b, c]
    }

    fn ids(products: &[Product]) -> Vec<&str> {
        products.iter().map(|p| p.id.as_str()).collect()
    }

    #[test]
    fn test_empty_query_returns_everything() {
        let all = catalog();
        assert_eq!(ProductQuery::new().apply(&all).len(), 3);
        assert!(!ProductQuery::new().has_filters());
    }

    #[test]
    fn test_search_is_case_insensitive_across_fields() {
        let all = catalog();
        let hits = ProductQuery::new().search("  RED ").apply(&all);
        assert_eq!(ids(&hits), ["1", "3"]);

        let hits = ProductQuery::new().search("volvo").apply(&all);
        assert_eq!(ids(&hits), ["2"]);
    }

    #[test]
    fn test_brand_and_model_filters() {
        let all = catalog();
        let hits = ProductQuery::new().brand("Tesla").brand("Fiat").apply(&all);
        assert_eq!(ids(&hits), ["1", "3"]);

        let hits = ProductQuery::new().brand("Tesla").model("500").apply(&all);
        assert!(hits.is_empty());
    }

    #[test]
    fn test_price_range_is_inclusive() {
        let all = catalog();
        let hits = ProductQuery::new()
            .price_range(Some(Money::from_cents(1000)), Some(Money::from_cents(2550)))
            .apply(&all);
        assert_eq!(ids(&hits), ["1", "2"]);

        let query = ProductQuery::new().price_range(Some(Money::from_cents(5000)), None);
        assert!(query.has_filters());
        assert_eq!(ids(&query.apply(&all)), ["3"]);
    }

    #[test]
    fn test_available_options_sorted_and_distinct() {
        let mut all = catalog();
        all.push(product("4", "1"));
        all[3].brand = "Fiat".into();

        assert_eq!(available_brands(&all), ["Fiat", "Tesla", "Volvo"]);
        assert_eq!(available_models(&all), ["500", "Model S", "Roadster", "V90"]);
    }

    #[test]
    fn test_paginate_load_more() {
        let items: Vec<u32> = (0..30).collect();

        let first = paginate(items.clone(), 1, 12);
        assert_eq!(first.items.len(), 12);
        assert!(first.has_more);

        let third = paginate(items.clone(), 3, 12);
        assert_eq!(third.items.len(), 30);
        assert!(!third.has_more);
        assert_eq!(third.total, 30);

        let zero = paginate(items, 0, 12);
        assert_eq!(zero.page, 1);
    }
}
