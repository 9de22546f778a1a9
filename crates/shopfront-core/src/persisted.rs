//! # Persisted Documents
//!
//! The on-device mirrors of the cart and favorites are whole JSON documents
//! stored under a single key each. This module owns their schema and the
//! migrations from older shapes.
//!
//! ## Schema Versions
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Version │ Cart document                  │ Favorites document          │
//! │  ────────┼────────────────────────────────┼──────────────────────────── │
//! │  0       │ [Product, ...]  (no quantity)  │ n/a                         │
//! │  1       │ [{product, quantity}, ...]     │ [Product, ...]              │
//! │  2 (now) │ {"version": 2, "items": [...]} │ {"version": 2, "items": …}  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Versions 0 and 1 were written as bare arrays without a tag. A bare array
//! is classified once on load, migrated, and the caller rewrites it as a
//! tagged version 2 document.
//!
//! Entries are parsed one at a time. An entry that cannot be read (older
//! builds stored prices without checking them) is skipped and reported in
//! [`Decoded::skipped`]; the rest of the document survives.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::cart::CartLine;
use crate::error::{CoreError, CoreResult};
use crate::types::Product;

/// Storage key of the cart mirror.
pub const CART_KEY: &str = "cart";

/// Storage key of the favorites mirror.
pub const FAVORITES_KEY: &str = "favorites";

/// Version written by this build.
pub const SCHEMA_VERSION: u32 = 2;

// =============================================================================
// Document Envelope
// =============================================================================

/// Tagged envelope around a persisted collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersistedDocument<T> {
    pub version: u32,
    pub items: Vec<T>,
}

/// A stored entry that could not be read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedEntry {
    /// Position in the stored `items` array.
    pub index: usize,
    pub reason: String,
}

/// Result of decoding a stored document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decoded<T> {
    pub items: Vec<T>,
    /// Schema version the document was migrated from, if it was not current.
    pub migrated_from: Option<u32>,
    /// Entries left out of `items`.
    pub skipped: Vec<SkippedEntry>,
}

impl<T> Decoded<T> {
    /// Whether the stored copy should be rewritten in the current schema.
    ///
    /// True after a migration or when entries were skipped, so the stored
    /// copy matches what was loaded.
    pub fn needs_rewrite(&self) -> bool {
        self.migrated_from.is_some() || !self.skipped.is_empty()
    }
}

fn encode<T: Serialize>(items: &[T]) -> CoreResult<String> {
    #[derive(Serialize)]
    struct Borrowed<'a, T> {
        version: u32,
        items: &'a [T],
    }

    serde_json::to_string(&Borrowed {
        version: SCHEMA_VERSION,
        items,
    })
    .map_err(|e| CoreError::Serialization(e.to_string()))
}

/// Splits a stored document into `(version, raw items)`.
///
/// Untagged arrays get a version from `classify_untagged`.
fn unwrap_document(
    raw: &str,
    classify_untagged: impl FnOnce(&[Value]) -> u32,
) -> CoreResult<(u32, Vec<Value>, bool)> {
    let value: Value =
        serde_json::from_str(raw).map_err(|e| CoreError::MalformedDocument(e.to_string()))?;

    match value {
        Value::Array(items) => {
            let version = classify_untagged(&items);
            Ok((version, items, false))
        }
        Value::Object(mut map) => {
            let version = map
                .get("version")
                .and_then(Value::as_u64)
                .ok_or_else(|| CoreError::MalformedDocument("missing version tag".into()))?;
            if version > u64::from(SCHEMA_VERSION) {
                return Err(CoreError::UnsupportedSchemaVersion {
                    found: version,
                    supported: SCHEMA_VERSION,
                });
            }
            let items = match map.remove("items") {
                Some(Value::Array(items)) => items,
                _ => return Err(CoreError::MalformedDocument("missing items array".into())),
            };
            // Bounded by SCHEMA_VERSION above
            Ok((version as u32, items, true))
        }
        _ => Err(CoreError::MalformedDocument(
            "expected an array or a tagged object".into(),
        )),
    }
}

/// Parses each entry with `parse`, keeping the ones that succeed.
fn parse_each<T>(
    items: Vec<Value>,
    parse: impl Fn(Value) -> serde_json::Result<T>,
) -> (Vec<T>, Vec<SkippedEntry>) {
    let mut parsed = Vec::with_capacity(items.len());
    let mut skipped = Vec::new();

    for (index, item) in items.into_iter().enumerate() {
        match parse(item) {
            Ok(value) => parsed.push(value),
            Err(e) => skipped.push(SkippedEntry {
                index,
                reason: e.to_string(),
            }),
        }
    }

    (parsed, skipped)
}

fn parse_items<T: DeserializeOwned>(items: Vec<Value>) -> (Vec<T>, Vec<SkippedEntry>) {
    parse_each(items, serde_json::from_value)
}

// =============================================================================
// Cart
// =============================================================================

/// Version 1 line: quantity may be missing, and an extra `id` field may be
/// present (ignored).
#[derive(Deserialize)]
struct LegacyLine {
    product: Product,
    #[serde(default = "one")]
    quantity: i64,
}

fn one() -> i64 {
    1
}

/// Untagged cart arrays: entries carrying a `product` object are version 1
/// lines, anything else is a version 0 bare product.
fn classify_cart(items: &[Value]) -> u32 {
    let all_lines = items
        .iter()
        .all(|item| item.get("product").is_some_and(Value::is_object));
    if all_lines {
        1
    } else {
        0
    }
}

impl From<LegacyLine> for CartLine {
    fn from(line: LegacyLine) -> Self {
        CartLine {
            product: line.product,
            quantity: line.quantity,
        }
    }
}

/// Migrates raw cart entries from `version` to current `CartLine`s.
///
/// Unreadable entries are skipped and returned alongside the lines.
pub fn migrate_cart(version: u32, items: Vec<Value>) -> (Vec<CartLine>, Vec<SkippedEntry>) {
    match version {
        0 => parse_each(items, |item| {
            // Mixed arrays can carry the occasional line among bare products
            if item.get("product").is_some_and(Value::is_object) {
                serde_json::from_value::<LegacyLine>(item).map(CartLine::from)
            } else {
                serde_json::from_value::<Product>(item).map(CartLine::new)
            }
        }),
        1 => parse_each(items, |item| {
            serde_json::from_value::<LegacyLine>(item).map(CartLine::from)
        }),
        _ => parse_items(items),
    }
}

/// Serializes cart lines as a current-version document.
pub fn encode_cart(lines: &[CartLine]) -> CoreResult<String> {
    encode(lines)
}

/// Decodes a stored cart document of any known version.
pub fn decode_cart(raw: &str) -> CoreResult<Decoded<CartLine>> {
    let (version, items, tagged) = unwrap_document(raw, classify_cart)?;
    let (lines, skipped) = migrate_cart(version, items);
    Ok(Decoded {
        items: lines,
        migrated_from: (!tagged || version < SCHEMA_VERSION).then_some(version),
        skipped,
    })
}

// =============================================================================
// Favorites
// =============================================================================

/// Migrates raw favorites entries from `version` to current `Product`s.
///
/// Every known version stores bare products; only the envelope changed.
/// Unreadable entries are skipped and returned alongside the products.
pub fn migrate_favorites(_version: u32, items: Vec<Value>) -> (Vec<Product>, Vec<SkippedEntry>) {
    parse_items(items)
}

/// Serializes favorites as a current-version document.
pub fn encode_favorites(products: &[Product]) -> CoreResult<String> {
    encode(products)
}

/// Decodes a stored favorites document of any known version.
pub fn decode_favorites(raw: &str) -> CoreResult<Decoded<Product>> {
    let (version, items, tagged) = unwrap_document(raw, |_| 1)?;
    let (products, skipped) = migrate_favorites(version, items);
    Ok(Decoded {
        items: products,
        migrated_from: (!tagged || version < SCHEMA_VERSION).then_some(version),
        skipped,
    })
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::tests::product;

    fn product_json(id: &str, price: &str) -> Value {
        serde_json::to_value(product(id, price)).unwrap()
    }

    #[test]
    fn test_legacy_bare_products_migrate_to_lines() {
        let raw = Value::Array(vec![product_json("1", "10.50"), product_json("2", "5")]).to_string();

        let decoded = decode_cart(&raw).unwrap();
        assert_eq!(decoded.migrated_from, Some(0));
        assert!(decoded.needs_rewrite());
        assert_eq!(decoded.items.len(), 2);
        assert!(decoded.items.iter().all(|l| l.quantity == 1));
        assert_eq!(decoded.items[0].product, product("1", "10.50"));
    }

    #[test]
    fn test_untagged_lines_are_version_one() {
        let raw = serde_json::json!([
            {"product": product_json("1", "3"), "quantity": 4, "id": "1"},
            {"product": product_json("2", "3")}
        ])
        .to_string();

        let decoded = decode_cart(&raw).unwrap();
        assert_eq!(decoded.migrated_from, Some(1));
        assert_eq!(decoded.items[0].quantity, 4);
        assert_eq!(decoded.items[1].quantity, 1);
    }

    #[test]
    fn test_current_document_round_trips_without_rewrite() {
        let lines = vec![CartLine {
            product: product("1", "2.25"),
            quantity: 3,
        }];
        let raw = encode_cart(&lines).unwrap();
        assert!(raw.starts_with(r#"{"version":2,"items":["#));

        let decoded = decode_cart(&raw).unwrap();
        assert!(!decoded.needs_rewrite());
        assert_eq!(decoded.items, lines);
    }

    #[test]
    fn test_malformed_and_future_documents_are_errors() {
        assert!(matches!(
            decode_cart("{not json"),
            Err(CoreError::MalformedDocument(_))
        ));
        assert!(matches!(
            decode_cart(r#""just a string""#),
            Err(CoreError::MalformedDocument(_))
        ));
        assert!(matches!(
            decode_cart(r#"{"version":9,"items":[]}"#),
            Err(CoreError::UnsupportedSchemaVersion { found: 9, .. })
        ));
        assert!(matches!(
            decode_cart(r#"{"items":[]}"#),
            Err(CoreError::MalformedDocument(_))
        ));
    }

    #[test]
    fn test_favorites_bare_array_migrates() {
        let raw = Value::Array(vec![product_json("1", "1")]).to_string();

        let decoded = decode_favorites(&raw).unwrap();
        assert_eq!(decoded.migrated_from, Some(1));
        assert_eq!(decoded.items, vec![product("1", "1")]);

        let rewritten = encode_favorites(&decoded.items).unwrap();
        let again = decode_favorites(&rewritten).unwrap();
        assert!(!again.needs_rewrite());
    }

    #[test]
    fn test_unreadable_legacy_entry_is_skipped_not_fatal() {
        let mut bad = product_json("3", "1");
        bad["price"] = Value::String(String::new());
        let raw = Value::Array(vec![product_json("1", "10.50"), product_json("2", "5"), bad])
            .to_string();

        let decoded = decode_cart(&raw).unwrap();

        assert_eq!(decoded.migrated_from, Some(0));
        assert_eq!(decoded.items.len(), 2);
        assert_eq!(decoded.items[1].product.id, "2");
        assert_eq!(decoded.skipped.len(), 1);
        assert_eq!(decoded.skipped[0].index, 2);
        assert!(decoded.needs_rewrite());
    }

    #[test]
    fn test_unreadable_entry_in_current_document_forces_rewrite() {
        let raw = serde_json::json!({
            "version": 2,
            "items": [
                {"product": product_json("1", "3"), "quantity": 2},
                {"product": {"id": "2"}, "quantity": 1}
            ]
        })
        .to_string();

        let decoded = decode_cart(&raw).unwrap();
        assert_eq!(decoded.migrated_from, None);
        assert_eq!(decoded.items.len(), 1);
        assert_eq!(decoded.skipped[0].index, 1);
        assert!(decoded.needs_rewrite());
    }

    #[test]
    fn test_unreadable_favorite_is_skipped() {
        let raw = Value::Array(vec![
            product_json("1", "1"),
            Value::from(42),
            product_json("2", "2"),
        ])
        .to_string();

        let decoded = decode_favorites(&raw).unwrap();
        assert_eq!(decoded.items, vec![product("1", "1"), product("2", "2")]);
        assert_eq!(decoded.skipped.len(), 1);
        assert_eq!(decoded.skipped[0].index, 1);
    }
}
