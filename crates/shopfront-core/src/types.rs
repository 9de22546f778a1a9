//! # Domain Types
//!
//! The catalog record shared by every store.
//!
//! ## Wire Shape
//! ```text
//! {
//!   "id": "1",
//!   "createdAt": "2023-07-17T07:21:02.529Z",
//!   "name": "Bentley Focus",
//!   "image": "https://loremflickr.com/640/480/food",
//!   "price": "51.00",
//!   "description": "Quasi adipisci sint veniam delectus...",
//!   "model": "CTS",
//!   "brand": "Lamborghini"
//! }
//! ```
//!
//! `price` is held as [`Money`] in memory and written back as a decimal string,
//! so a record round-trips through the persisted cart unchanged.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::{self, Money};

// =============================================================================
// Product
// =============================================================================

/// A product from the remote catalog.
///
/// Immutable from the client's point of view: the only source of products is
/// the catalog fetch (or a persisted copy of an earlier fetch).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Product {
    /// Stable unique identifier assigned by the catalog service.
    pub id: String,

    /// Display name.
    pub name: String,

    #[serde(default)]
    pub brand: String,

    #[serde(default)]
    pub model: String,

    /// Unit price. Travels as a decimal string (`"51.00"`).
    #[serde(with = "money::decimal_string")]
    #[ts(as = "String")]
    pub price: Money,

    /// Image URI.
    #[serde(default)]
    pub image: String,

    #[serde(default)]
    pub description: String,

    /// When the catalog service created the record.
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl Product {
    /// Case-insensitive substring match over the searchable text fields.
    ///
    /// `needle` must already be lowercase.
    pub fn matches_text(&self, needle: &str) -> bool {
        [&self.name, &self.brand, &self.model, &self.description]
            .iter()
            .any(|field| field.to_lowercase().contains(needle))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Builds a product with the given id and decimal price.
    pub(crate) fn product(id: &str, price: &str) -> Product {
        Product {
            id: id.to_string(),
            name: format!("Product {}", id),
            brand: "Tesla".to_string(),
            model: "Model S".to_string(),
            price: Money::parse_decimal(price).unwrap(),
            image: format!("https://img.example/{}.png", id),
            description: "A product".to_string(),
            created_at: DateTime::parse_from_rfc3339("2023-07-17T07:21:02.529Z")
                .unwrap()
                .with_timezone(&Utc),
        }
    }

    #[test]
    fn test_product_deserializes_api_record() {
        let json = r#"{
            "createdAt": "2023-07-17T07:21:02.529Z",
            "name": "Bentley Focus",
            "image": "https://loremflickr.com/640/480/food",
            "price": "51.00",
            "description": "Quasi adipisci sint veniam delectus.",
            "model": "CTS",
            "brand": "Lamborghini",
            "id": "1"
        }"#;

        let product: Product = serde_json::from_str(json).unwrap();
        assert_eq!(product.id, "1");
        assert_eq!(product.brand, "Lamborghini");
        assert_eq!(product.price.cents(), 5100);
    }

    #[test]
    fn test_product_serializes_price_as_string() {
        let value = serde_json::to_value(product("7", "10.5")).unwrap();
        assert_eq!(value["price"], "10.50");
        assert!(value["createdAt"]
            .as_str()
            .unwrap()
            .starts_with("2023-07-17T07:21:02"));
    }

    #[test]
    fn test_product_rejects_non_numeric_price() {
        let json = r#"{"id":"1","name":"X","price":"free","createdAt":"2023-07-17T07:21:02.529Z"}"#;
        assert!(serde_json::from_str::<Product>(json).is_err());
    }

    #[test]
    fn test_matches_text() {
        let p = product("1", "1");
        assert!(p.matches_text("tesla"));
        assert!(p.matches_text("model s"));
        assert!(!p.matches_text("bmw"));
    }
}
