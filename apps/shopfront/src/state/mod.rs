//! # State Module
//!
//! One store per concern, each behind its own lock, so a cart write never
//! waits on a favorites write.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │  ┌──────────────┐  ┌──────────────┐  ┌──────────────────┐              │
//! │  │ CatalogStore │  │  CartStore   │  │  FavoritesStore  │              │
//! │  │              │  │              │  │                  │              │
//! │  │  Arc<dyn     │  │  Mutex<Cart> │  │  Mutex<          │              │
//! │  │  Catalog     │  │  + Arc<dyn   │  │   FavoriteSet>   │              │
//! │  │  Source>     │  │  KeyValue    │  │  + Arc<dyn       │              │
//! │  │              │  │  Store>      │  │  KeyValueStore>  │              │
//! │  └──────────────┘  └──────────────┘  └──────────────────┘              │
//! │                                                                         │
//! │  AppConfig: read-only after startup                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod cart;
mod catalog;
mod config;
mod favorites;

pub use cart::{AddStatus, AddToCartOutcome, CartStore};
pub use catalog::CatalogStore;
pub use config::AppConfig;
pub use favorites::{FavoriteOutcome, FavoritesStore};
