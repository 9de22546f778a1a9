//! # Device Storage Connection
//!
//! Opens the SQLite file that backs the key-value store.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Opening Device Storage                             │
//! │                                                                         │
//! │  DbConfig::new(path) / DbConfig::in_memory()                            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Database::new(config).await                                            │
//! │       │  • parent directory created for file locations                  │
//! │       │  • WAL + NORMAL sync for files, none for memory                 │
//! │       │  • kv_store migration applied                                   │
//! │       ▼                                                                 │
//! │  db.kv() ──► KvRepository ──► Arc<dyn KeyValueStore> for the stores    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The app writes a few small documents per user action, so the pool stays
//! small. WAL lets the startup reads of cart, favorites and language run
//! alongside a rewrite of a migrated document.

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::SqlitePool;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use crate::migrations;
use crate::repository::kv::KvRepository;

// =============================================================================
// Configuration
// =============================================================================

/// Where the database lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageLocation {
    File(PathBuf),
    /// Private to one pool; gone when the pool closes.
    Memory,
}

/// Device storage settings.
///
/// ```rust,ignore
/// let config = DbConfig::new(dirs.data_dir().join("shopfront.db"))
///     .pool_size(2);
/// ```
#[derive(Debug, Clone)]
pub struct DbConfig {
    pub location: StorageLocation,

    /// Default: 4 for files. Memory databases always use 1.
    pub pool_size: u32,

    /// How long a writer waits on a locked file before failing.
    /// Default: 5 seconds
    pub busy_timeout: Duration,

    /// How long to wait for a free connection.
    /// Default: 30 seconds
    pub acquire_timeout: Duration,

    /// Apply pending migrations on open. Default: true
    pub run_migrations: bool,
}

impl DbConfig {
    /// File-backed storage at `path`, created on first open.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        DbConfig {
            location: StorageLocation::File(path.into()),
            pool_size: 4,
            busy_timeout: Duration::from_secs(5),
            acquire_timeout: Duration::from_secs(30),
            run_migrations: true,
        }
    }

    /// Throwaway storage for tests.
    pub fn in_memory() -> Self {
        DbConfig {
            location: StorageLocation::Memory,
            pool_size: 1,
            acquire_timeout: Duration::from_secs(5),
            ..DbConfig::new(PathBuf::new())
        }
    }

    pub fn pool_size(mut self, size: u32) -> Self {
        self.pool_size = size.max(1);
        self
    }

    pub fn busy_timeout(mut self, timeout: Duration) -> Self {
        self.busy_timeout = timeout;
        self
    }

    pub fn run_migrations(mut self, run: bool) -> Self {
        self.run_migrations = run;
        self
    }

    fn is_in_memory(&self) -> bool {
        self.location == StorageLocation::Memory
    }

    fn connect_options(&self) -> DbResult<SqliteConnectOptions> {
        let options = SqliteConnectOptions::new().busy_timeout(self.busy_timeout);

        match &self.location {
            StorageLocation::Memory => Ok(options.in_memory(true)),
            StorageLocation::File(path) => {
                ensure_parent_dir(path)?;
                Ok(options
                    .filename(path)
                    .create_if_missing(true)
                    .journal_mode(SqliteJournalMode::Wal)
                    .synchronous(SqliteSynchronous::Normal))
            }
        }
    }
}

fn ensure_parent_dir(path: &Path) -> DbResult<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => std::fs::create_dir_all(parent)
            .map_err(|e| {
                DbError::ConnectionFailed(format!("cannot create {}: {}", parent.display(), e))
            }),
        _ => Ok(()),
    }
}

// =============================================================================
// Database
// =============================================================================

/// Handle to device storage.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Opens (and if needed creates) the database, then migrates it.
    pub async fn new(config: DbConfig) -> DbResult<Self> {
        info!(location = ?config.location, "Opening device storage");

        let options = config.connect_options()?;
        let pool_size = if config.is_in_memory() { 1 } else { config.pool_size };

        let pool = SqlitePoolOptions::new()
            .max_connections(pool_size)
            .min_connections(1)
            .acquire_timeout(config.acquire_timeout)
            .connect_with(options)
            .await
            .map_err(|e| DbError::ConnectionFailed(e.to_string()))?;

        debug!(pool_size, "Storage pool ready");

        let db = Database { pool };
        if config.run_migrations {
            db.run_migrations().await?;
        }

        Ok(db)
    }

    pub async fn run_migrations(&self) -> DbResult<()> {
        migrations::run_migrations(&self.pool).await
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Key-value view over this database.
    ///
    /// ```rust,ignore
    /// let kv: Arc<dyn KeyValueStore> = Arc::new(db.kv());
    /// ```
    pub fn kv(&self) -> KvRepository {
        KvRepository::new(self.pool.clone())
    }

    /// Closes the pool. Later operations fail with `ConnectionFailed`.
    pub async fn close(&self) {
        info!("Closing device storage");
        self.pool.close().await;
    }

    /// `true` if a trivial query succeeds.
    pub async fn health_check(&self) -> bool {
        sqlx::query("SELECT 1").execute(&self.pool).await.is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_in_memory_database_is_migrated() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        assert!(db.health_check().await);

        let status = migrations::migration_status(db.pool()).await.unwrap();
        assert!(status.is_current());
        assert!(status.embedded >= 1);
    }

    #[test]
    fn test_config_builder() {
        let config = DbConfig::new("/tmp/shopfront-test.db")
            .pool_size(0)
            .busy_timeout(Duration::from_secs(1))
            .run_migrations(false);

        assert_eq!(config.pool_size, 1);
        assert_eq!(config.busy_timeout, Duration::from_secs(1));
        assert!(!config.run_migrations);
        assert!(!config.is_in_memory());
        assert!(DbConfig::in_memory().is_in_memory());
    }

    #[tokio::test]
    async fn test_closed_pool_fails_health_check() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.close().await;

        assert!(!db.health_check().await);
    }
}
