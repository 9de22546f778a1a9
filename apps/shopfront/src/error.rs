//! # App Error Type
//!
//! Unified error type recorded by the stores and returned by commands.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in Shopfront                              │
//! │                                                                         │
//! │  Store mutation                                                         │
//! │       │  in-memory change applied (never rolled back)                   │
//! │       ▼                                                                 │
//! │  kv.set(...) fails ─── DbError::QueryFailed ──┐                         │
//! │                                               ▼                         │
//! │  Catalog fetch fails ── reqwest::Error ───► AppError ──► store.error    │
//! │                                               ▲                         │
//! │  Cart limit reached ─── CoreError ────────────┘                         │
//! │                                                                         │
//! │  The caller of a store operation never sees these as `Err`; it reads    │
//! │  `store.error()` the way a screen reads the store's error field.        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Serialize;
use shopfront_core::CoreError;
use shopfront_db::DbError;

/// Error with a machine-readable code and a human-readable message.
///
/// ## Serialization
/// ```json
/// {
///   "code": "STORAGE_ERROR",
///   "message": "Storage operation failed"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Product id unknown to the catalog
    NotFound,

    /// Input validation failed
    ValidationError,

    /// Device storage read or write failed
    StorageError,

    /// Catalog request failed (connect, timeout, status, body)
    NetworkError,

    /// Cart limit reached
    CartError,

    /// Configuration could not be loaded
    ConfigError,

    /// Anything else
    Internal,
}

pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        AppError {
            code,
            message: message.into(),
        }
    }

    pub fn not_found(resource: &str, id: &str) -> Self {
        AppError::new(ErrorCode::NotFound, format!("{} not found: {}", resource, id))
    }

    pub fn validation(message: impl Into<String>) -> Self {
        AppError::new(ErrorCode::ValidationError, message)
    }

    pub fn network(message: impl Into<String>) -> Self {
        AppError::new(ErrorCode::NetworkError, message)
    }

    pub fn config(message: impl Into<String>) -> Self {
        AppError::new(ErrorCode::ConfigError, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        AppError::new(ErrorCode::Internal, message)
    }
}

/// Converts storage errors.
impl From<DbError> for AppError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::ConnectionFailed(e) => {
                tracing::error!("Storage connection failed: {}", e);
                AppError::new(ErrorCode::StorageError, "Storage connection failed")
            }
            DbError::MigrationFailed(e) => {
                tracing::error!("Storage migration failed: {}", e);
                AppError::new(ErrorCode::StorageError, "Storage migration failed")
            }
            DbError::QueryFailed(e) => {
                // Log the actual error but record a generic message
                tracing::error!("Storage query failed: {}", e);
                AppError::new(ErrorCode::StorageError, "Storage operation failed")
            }
            DbError::PoolExhausted => {
                AppError::new(ErrorCode::StorageError, "Storage pool exhausted")
            }
            DbError::Internal(e) => {
                tracing::error!("Internal storage error: {}", e);
                AppError::new(ErrorCode::StorageError, "Storage operation failed")
            }
        }
    }
}

/// Converts core errors.
impl From<CoreError> for AppError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ProductNotFound(id) => AppError::not_found("Product", &id),
            CoreError::CartTooLarge { max } => AppError::new(
                ErrorCode::CartError,
                format!("Cart cannot have more than {} items", max),
            ),
            CoreError::QuantityTooLarge { requested, max } => AppError::new(
                ErrorCode::CartError,
                format!("Quantity {} exceeds maximum allowed ({})", requested, max),
            ),
            CoreError::MalformedDocument(e) => {
                AppError::new(ErrorCode::StorageError, format!("Malformed stored data: {}", e))
            }
            CoreError::UnsupportedSchemaVersion { found, supported } => AppError::new(
                ErrorCode::StorageError,
                format!(
                    "Stored data has version {} (newest known: {})",
                    found, supported
                ),
            ),
            CoreError::Serialization(e) => AppError::internal(e),
            CoreError::Validation(e) => AppError::validation(e.to_string()),
        }
    }
}

/// Converts HTTP client errors.
impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        let message = if err.is_timeout() {
            "Catalog request timed out".to_string()
        } else if err.is_connect() {
            "Could not reach the catalog service".to_string()
        } else if let Some(status) = err.status() {
            format!("Catalog service returned {}", status)
        } else if err.is_decode() {
            "Catalog response was not valid JSON".to_string()
        } else {
            format!("Catalog request failed: {}", err)
        };
        AppError::network(message)
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for AppError {}

#[cfg(test)]
mod tests {
    use super::*;
    use shopfront_core::ValidationError;

    #[test]
    fn test_serializes_screaming_code() {
        let err = AppError::new(ErrorCode::StorageError, "Storage operation failed");
        let json = serde_json::to_value(&err).unwrap();

        assert_eq!(json["code"], "STORAGE_ERROR");
        assert_eq!(json["message"], "Storage operation failed");
    }

    #[test]
    fn test_db_error_message_is_generic() {
        let err = AppError::from(DbError::QueryFailed("disk I/O error at page 7".into()));

        assert_eq!(err.code, ErrorCode::StorageError);
        assert!(!err.message.contains("page 7"));
    }

    #[test]
    fn test_core_error_mapping() {
        let err = AppError::from(CoreError::CartTooLarge { max: 100 });
        assert_eq!(err.code, ErrorCode::CartError);

        let err = AppError::from(CoreError::Validation(ValidationError::Required {
            field: "id".into(),
        }));
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert_eq!(err.message, "id is required");
    }

    #[test]
    fn test_display() {
        let err = AppError::not_found("Product", "42");
        assert_eq!(err.to_string(), "[NotFound] Product not found: 42");
    }
}
