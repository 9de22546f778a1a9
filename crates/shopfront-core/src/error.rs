//! # Error Types
//!
//! Domain-specific error types for shopfront-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  shopfront-core errors (this file)                                     │
//! │  ├── CoreError        - Cart rules, persisted documents                │
//! │  └── ValidationError  - Input validation failures (prices, queries)    │
//! │                                                                         │
//! │  shopfront-db errors (separate crate)                                  │
//! │  └── DbError          - Key-value storage failures                     │
//! │                                                                         │
//! │  App errors (apps/shopfront)                                           │
//! │  └── AppError         - What the screens see (code + message)          │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → AppError → store `error` field    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Product id is not part of the cached catalog.
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// Cart already holds the maximum number of distinct lines.
    #[error("Cart cannot have more than {max} items")]
    CartTooLarge { max: usize },

    /// A line's quantity would exceed the per-product cap.
    #[error("Quantity {requested} exceeds maximum allowed ({max})")]
    QuantityTooLarge { requested: i64, max: i64 },

    /// Persisted document could not be parsed at all.
    ///
    /// ## When This Occurs
    /// - Truncated write from a previous session
    /// - Document edited by hand or by an older build with a bug
    #[error("Malformed persisted document: {0}")]
    MalformedDocument(String),

    /// Persisted document was written by a newer schema than this build knows.
    #[error("Unsupported persisted schema version {found} (newest known: {supported})")]
    UnsupportedSchemaVersion { found: u64, supported: u32 },

    /// Serializing a document for storage failed.
    #[error("Serialization failed: {0}")]
    Serialization(String),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Invalid format (e.g., non-numeric price).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::QuantityTooLarge {
            requested: 1000,
            max: 999,
        };
        assert_eq!(
            err.to_string(),
            "Quantity 1000 exceeds maximum allowed (999)"
        );

        let err = CoreError::UnsupportedSchemaVersion {
            found: 7,
            supported: 2,
        };
        assert_eq!(
            err.to_string(),
            "Unsupported persisted schema version 7 (newest known: 2)"
        );
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "price".to_string(),
        };
        assert_eq!(err.to_string(), "price is required");

        let err = ValidationError::InvalidFormat {
            field: "price".to_string(),
            reason: "not a number".to_string(),
        };
        assert_eq!(err.to_string(), "price has invalid format: not a number");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "id".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
