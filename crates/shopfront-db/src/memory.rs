//! # In-Memory Key-Value Store
//!
//! A [`KeyValueStore`] backed by a `HashMap`, for tests and for running the
//! app without a database file. Reads and writes can be made to fail on
//! demand to exercise the stores' error paths.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use tokio::sync::RwLock;

use crate::error::{DbError, DbResult};
use crate::store::KeyValueStore;

#[derive(Debug, Default)]
pub struct MemoryKvStore {
    entries: RwLock<HashMap<String, String>>,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
    writes: AtomicUsize,
}

impl MemoryKvStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated with `(key, value)` pairs.
    pub fn with_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let map = entries
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();

        MemoryKvStore {
            entries: RwLock::new(map),
            ..Self::default()
        }
    }

    /// Makes every subsequent `get` fail.
    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Makes every subsequent `set`/`remove` fail.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Number of successful writes (`set` and `remove`) so far.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// Raw value under `key`, bypassing failure injection.
    pub async fn peek(&self, key: &str) -> Option<String> {
        self.entries.read().await.get(key).cloned()
    }

    fn check_writable(&self) -> DbResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(DbError::QueryFailed("storage is not writable".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl KeyValueStore for MemoryKvStore {
    async fn get(&self, key: &str) -> DbResult<Option<String>> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(DbError::QueryFailed("storage is not readable".to_string()));
        }
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> DbResult<()> {
        self.check_writable()?;
        self.entries
            .write()
            .await
            .insert(key.to_string(), value.to_string());
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn remove(&self, key: &str) -> DbResult<()> {
        self.check_writable()?;
        self.entries.write().await.remove(key);
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
