//! # Key-Value Repository
//!
//! SQLite implementation of [`KeyValueStore`] over the `kv_store` table.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;
use crate::store::KeyValueStore;

/// A stored row, including when it was last written.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct KvEntry {
    pub key: String,
    pub value: String,
    /// RFC 3339 timestamp of the last write.
    pub updated_at: String,
}

/// Repository for the `kv_store` table.
#[derive(Debug, Clone)]
pub struct KvRepository {
    pool: SqlitePool,
}

impl KvRepository {
    /// Creates a new KvRepository.
    pub fn new(pool: SqlitePool) -> Self {
        KvRepository { pool }
    }

    /// Returns the full row for `key`, including its write timestamp.
    pub async fn entry(&self, key: &str) -> DbResult<Option<KvEntry>> {
        let entry = sqlx::query_as::<_, KvEntry>(
            "SELECT key, value, updated_at FROM kv_store WHERE key = ?",
        )
        .bind(key)
        .fetch_optional(&self.pool)
        .await?;

        Ok(entry)
    }

    /// Lists every stored key in ascending order.
    pub async fn keys(&self) -> DbResult<Vec<String>> {
        let keys = sqlx::query_scalar::<_, String>("SELECT key FROM kv_store ORDER BY key")
            .fetch_all(&self.pool)
            .await?;

        Ok(keys)
    }
}

#[async_trait]
impl KeyValueStore for KvRepository {
    async fn get(&self, key: &str) -> DbResult<Option<String>> {
        let value = sqlx::query_scalar::<_, String>("SELECT value FROM kv_store WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;

        debug!(key = %key, found = value.is_some(), "kv get");
        Ok(value)
    }

    async fn set(&self, key: &str, value: &str) -> DbResult<()> {
        let now = Utc::now().to_rfc3339();

        sqlx::query(
            r#"
            INSERT INTO kv_store (key, value, updated_at)
            VALUES (?, ?, ?)
            ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(key)
        .bind(value)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        debug!(key = %key, bytes = value.len(), "kv set");
        Ok(())
    }

    async fn remove(&self, key: &str) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM kv_store WHERE key = ?")
            .bind(key)
            .execute(&self.pool)
            .await?;

        debug!(key = %key, removed = result.rows_affected(), "kv remove");
        Ok(())
    }
}
