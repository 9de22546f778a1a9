//! # shopfront-db: On-Device Storage for Shopfront
//!
//! Key-value persistence for the store mirrors. Values are whole documents:
//! no partial updates, no query language on top.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Shopfront Data Flow                              │
//! │                                                                         │
//! │  CartStore / FavoritesStore / LanguageSettings                          │
//! │       │  Arc<dyn KeyValueStore>                                         │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  shopfront-db (THIS CRATE)                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │ KvRepository  │    │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │◄───│ (SQLite)      │    │  (embedded)  │  │   │
//! │  │   └───────────────┘    ├───────────────┤    └──────────────┘  │   │
//! │  │                        │ MemoryKvStore │                       │   │
//! │  │                        │ (tests/fakes) │                       │   │
//! │  │                        └───────────────┘                       │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite file in the platform data directory (shopfront.db)            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use shopfront_db::{Database, DbConfig, KeyValueStore};
//!
//! let db = Database::new(DbConfig::new("path/to/shopfront.db")).await?;
//! let kv = db.kv();
//! kv.set("cart", r#"{"version":2,"items":[]}"#).await?;
//! ```

pub mod error;
pub mod memory;
pub mod migrations;
pub mod pool;
pub mod repository;
pub mod store;

pub use error::{DbError, DbResult};
pub use memory::MemoryKvStore;
pub use pool::{Database, DbConfig, StorageLocation};
pub use repository::kv::{KvEntry, KvRepository};
pub use store::KeyValueStore;
