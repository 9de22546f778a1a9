//! # Repository Module
//!
//! SQLite-backed repositories.
//!
//! ```text
//! CartStore::persist
//!      │  kv.set("cart", "{\"version\":2,...}")
//!      ▼
//! KvRepository
//!      │  INSERT ... ON CONFLICT(key) DO UPDATE
//!      ▼
//! kv_store table
//! ```
//!
//! - [`kv::KvRepository`] - whole-document key-value storage

pub mod kv;
