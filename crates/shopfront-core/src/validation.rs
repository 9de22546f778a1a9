//! # Validation Module
//!
//! Input validation utilities for Shopfront.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Deserialization (serde)                                      │
//! │  ├── Required fields present                                           │
//! │  └── Price parses as a decimal number                                  │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Catalog ingestion (THIS MODULE)                              │
//! │  ├── Non-empty id and name                                             │
//! │  └── Price within 0..=MAX_PRICE                                        │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Cart rules (cart.rs)                                         │
//! │  └── Line and quantity caps                                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::Product;
use crate::MAX_PRICE;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Longest search text accepted from the search box.
pub const MAX_SEARCH_LEN: usize = 100;

const MAX_NAME_LEN: usize = 200;

/// Validates a product record at catalog-ingestion time.
///
/// ## Rules
/// - `id` must not be blank
/// - `name` must not be blank and at most 200 characters
/// - `price` must be within `0..=MAX_PRICE`
pub fn validate_product(product: &Product) -> ValidationResult<()> {
    if product.id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "id".to_string(),
        });
    }

    let name = product.name.trim();
    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }
    if name.chars().count() > MAX_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: MAX_NAME_LEN,
        });
    }

    validate_price(product.price)
}

/// Validates a price.
///
/// ## Rules
/// - Must be non-negative (>= 0)
/// - Zero is allowed (free items)
/// - At most `MAX_PRICE`; bounds are reported in major units
pub fn validate_price(price: Money) -> ValidationResult<()> {
    if price.is_negative() || price > MAX_PRICE {
        return Err(ValidationError::OutOfRange {
            field: "price".to_string(),
            min: 0,
            max: MAX_PRICE.major(),
        });
    }

    Ok(())
}

/// Validates search-box text.
///
/// ## Returns
/// The trimmed query string (may be empty: no search).
pub fn validate_search_query(query: &str) -> ValidationResult<String> {
    let query = query.trim();

    if query.chars().count() > MAX_SEARCH_LEN {
        return Err(ValidationError::TooLong {
            field: "query".to_string(),
            max: MAX_SEARCH_LEN,
        });
    }

    Ok(query.to_string())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::tests::product;

    #[test]
    fn test_validate_product() {
        assert!(validate_product(&product("1", "10")).is_ok());
        assert!(validate_product(&product("1", "0")).is_ok());

        let mut blank_id = product("1", "1");
        blank_id.id = "  ".into();
        assert!(matches!(
            validate_product(&blank_id),
            Err(ValidationError::Required { .. })
        ));

        let mut long_name = product("1", "1");
        long_name.name = "A".repeat(300);
        assert!(validate_product(&long_name).is_err());

        assert!(validate_product(&product("1", "-1")).is_err());
    }

    #[test]
    fn test_validate_price_upper_bound() {
        assert!(validate_price(MAX_PRICE).is_ok());
        assert!(validate_price(MAX_PRICE + Money::from_cents(1)).is_err());

        let err = validate_product(&product("1", "92233720368547758.07")).unwrap_err();
        assert_eq!(
            err,
            ValidationError::OutOfRange {
                field: "price".to_string(),
                min: 0,
                max: 10_000_000,
            }
        );
    }

    #[test]
    fn test_validate_search_query() {
        assert_eq!(validate_search_query("  tesla ").unwrap(), "tesla");
        assert_eq!(validate_search_query("").unwrap(), "");
        assert!(validate_search_query(&"q".repeat(101)).is_err());
    }
}
