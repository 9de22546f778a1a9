//! # shopfront-core: Pure Business Logic for Shopfront
//!
//! This crate holds the client-side commerce rules as pure functions and
//! plain data types. Nothing in here touches storage or the network.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Shopfront Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │              Screens / CLI commands (apps/shopfront)            │   │
//! │  │      Home ──► Product Detail ──► Basket ──► Favorites           │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │        CatalogStore   CartStore   FavoritesStore                │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │             ★ shopfront-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌─────────┐ ┌─────────┐ ┌─────────┐ ┌──────────┐ ┌─────────┐ │   │
//! │  │   │  types  │ │  money  │ │  cart   │ │favorites │ │ catalog │ │   │
//! │  │   │ Product │ │  Money  │ │CartLine │ │FavoriteS.│ │  query  │ │   │
//! │  │   └─────────┘ └─────────┘ └─────────┘ └──────────┘ └─────────┘ │   │
//! │  │   ┌───────────────────────┐ ┌──────────────────────┐           │   │
//! │  │   │ persisted (schema v2) │ │ validation           │           │   │
//! │  │   └───────────────────────┘ └──────────────────────┘           │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product)
//! - [`money`] - Money type with integer arithmetic and decimal-string parsing
//! - [`cart`] - Cart lines, quantities and totals
//! - [`favorites`] - Favorite product set
//! - [`catalog`] - Client-side search, filtering and pagination
//! - [`persisted`] - Versioned persisted documents and their migrations
//! - [`validation`] - Business rule validation
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use shopfront_core::money::Money;
//!
//! let price = Money::parse_decimal("10.50").unwrap();
//! let total = price * 2 + Money::parse_decimal("5").unwrap();
//!
//! assert_eq!(total.to_string(), "26.00");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod catalog;
pub mod error;
pub mod favorites;
pub mod money;
pub mod persisted;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use cart::{AddOutcome, Cart, CartLine, Decrease};
pub use catalog::{Page, ProductQuery};
pub use error::{CoreError, CoreResult, ValidationError};
pub use favorites::FavoriteSet;
pub use money::Money;
pub use types::Product;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum distinct lines allowed in a single cart.
pub const MAX_CART_ITEMS: usize = 100;

/// Maximum quantity of a single product in the cart.
///
/// ## Business Reason
/// Prevents runaway "+" tapping from producing absurd orders.
pub const MAX_ITEM_QUANTITY: i64 = 999;

/// Highest unit price accepted from the catalog or a persisted cart
/// (10,000,000.00).
///
/// ## Business Reason
/// Keeps `price × MAX_ITEM_QUANTITY × MAX_CART_ITEMS` far inside `i64` cents.
pub const MAX_PRICE: Money = Money::from_cents(1_000_000_000);

/// Products shown per "page" of the home grid.
pub const DEFAULT_PAGE_SIZE: usize = 12;
