//! # Key-Value Store Seam
//!
//! The stores never talk to SQLite directly. They hold an
//! `Arc<dyn KeyValueStore>` so tests can inject [`MemoryKvStore`] and a
//! device build can inject [`KvRepository`].
//!
//! [`MemoryKvStore`]: crate::memory::MemoryKvStore
//! [`KvRepository`]: crate::repository::kv::KvRepository

use async_trait::async_trait;

use crate::error::DbResult;

/// Asynchronous string key-value storage.
///
/// Values are whole documents; `set` replaces whatever was stored.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Reads the value under `key`, `None` if absent.
    async fn get(&self, key: &str) -> DbResult<Option<String>>;

    /// Stores `value` under `key`, replacing any previous value.
    async fn set(&self, key: &str, value: &str) -> DbResult<()>;

    /// Deletes `key`. Removing an absent key is not an error.
    async fn remove(&self, key: &str) -> DbResult<()>;
}
