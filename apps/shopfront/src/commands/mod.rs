//! # Commands Module
//!
//! The operations the screens perform, as plain functions over [`AppState`]
//! returning serializable responses. The CLI prints them; a UI shell would
//! bind them to buttons.
//!
//! ```text
//! commands/
//! ├── mod.rs        ◄─── You are here (exports)
//! ├── product.rs    ◄─── Home grid + product detail
//! ├── cart.rs       ◄─── Basket
//! ├── favorites.rs  ◄─── Favorites
//! └── settings.rs   ◄─── Profile (language)
//! ```
//!
//! ## Response Shape
//! Store operations never fail from the caller's point of view; a
//! persistence failure shows up as the `error` field of the response, the
//! way a screen reads the store's error. Only bad input (unknown product id,
//! malformed price filter) is returned as `Err(AppError)`.
//!
//! [`AppState`]: crate::AppState

pub mod cart;
pub mod favorites;
pub mod product;
pub mod settings;
