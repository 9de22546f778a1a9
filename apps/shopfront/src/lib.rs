//! # Shopfront App Library
//!
//! Client state core for the Shopfront mobile storefront: the stores the
//! screens read, the catalog client, translations and the command layer.
//! The `shopfront` binary is a thin CLI over this library.
//!
//! ## Module Organization
//! ```text
//! shopfront_app/
//! ├── lib.rs          ◄─── You are here (AppState & startup)
//! ├── api.rs          ◄─── CatalogSource trait + HTTP client
//! ├── i18n.rs         ◄─── Language, Translator, LanguageSettings
//! ├── state/
//! │   ├── mod.rs      ◄─── Store exports
//! │   ├── catalog.rs  ◄─── Fetch-once product cache
//! │   ├── cart.rs     ◄─── Persisted cart
//! │   ├── favorites.rs◄─── Persisted favorites
//! │   └── config.rs   ◄─── AppConfig (defaults → file → env)
//! ├── commands/
//! │   ├── mod.rs      ◄─── Command exports
//! │   ├── product.rs  ◄─── Home grid + detail
//! │   ├── cart.rs     ◄─── Basket
//! │   ├── favorites.rs◄─── Favorites
//! │   └── settings.rs ◄─── Language switch
//! └── error.rs        ◄─── AppError for commands and stores
//! ```
//!
//! ## Shared State
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                           AppState                                      │
//! │                                                                         │
//! │  ┌──────────────┐ ┌──────────────┐ ┌────────────────┐ ┌─────────────┐  │
//! │  │ CatalogStore │ │  CartStore   │ │ FavoritesStore │ │ Language    │  │
//! │  │              │ │              │ │                │ │ Settings    │  │
//! │  │ • products   │ │ • lines      │ │ • products     │ │ • current   │  │
//! │  │ • loaded     │ │ • error      │ │ • error        │ │             │  │
//! │  └──────┬───────┘ └──────┬───────┘ └───────┬────────┘ └──────┬──────┘  │
//! │         │                └─────────┬───────┴─────────────────┘         │
//! │         ▼                          ▼                                    │
//! │   CatalogSource             KeyValueStore                               │
//! │   (HTTP / fake)             (SQLite / memory)                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Each store guards its own data with a `Mutex`; none of them holds a lock
//! across an `.await`.

pub mod api;
pub mod commands;
pub mod error;
pub mod i18n;
pub mod state;

#[cfg(test)]
mod testing;

use shopfront_db::{Database, DbConfig, KeyValueStore};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

pub use api::{CatalogSource, HttpCatalogClient};
pub use error::{AppError, AppResult, ErrorCode};
pub use i18n::{Language, LanguageSettings, Translator};
pub use state::{AppConfig, CartStore, CatalogStore, FavoritesStore};

// =============================================================================
// Application State
// =============================================================================

/// Everything a screen needs, shared for the lifetime of the app.
pub struct AppState {
    pub config: AppConfig,
    pub catalog: CatalogStore,
    pub cart: CartStore,
    pub favorites: FavoritesStore,
    pub language: LanguageSettings,
}

impl AppState {
    /// Builds the stores over the given storage and catalog source.
    ///
    /// Nothing is loaded yet; call [`initialize_stores`].
    pub fn new(
        config: AppConfig,
        kv: Arc<dyn KeyValueStore>,
        source: Arc<dyn CatalogSource>,
    ) -> Self {
        AppState {
            catalog: CatalogStore::new(source).with_page_size(config.page_size),
            cart: CartStore::new(Arc::clone(&kv)),
            favorites: FavoritesStore::new(Arc::clone(&kv)),
            language: LanguageSettings::new(kv, config.initial_language()),
            config,
        }
    }

    /// Opens device storage and the HTTP catalog client for `config`.
    ///
    /// ## Startup Sequence
    /// ```text
    /// ┌─────────────────────────────────────────────────────────────────────────┐
    /// │                       Application Startup                               │
    /// │                                                                         │
    /// │  1. Resolve Database Path ────────────────────────────────────────────► │
    /// │     • SHOPFRONT_DB_PATH / config file override                          │
    /// │     • else <platform data dir>/shopfront.db                             │
    /// │                                                                         │
    /// │  2. Connect to Database ──────────────────────────────────────────────► │
    /// │     • SQLite with WAL mode                                              │
    /// │     • Run pending migrations (kv_store)                                 │
    /// │                                                                         │
    /// │  3. Build Catalog Client ─────────────────────────────────────────────► │
    /// │     • GET {api_url}/products, request timeout from config               │
    /// │                                                                         │
    /// │  4. Create Stores ────────────────────────────────────────────────────► │
    /// │     • empty until initialize_stores runs                                │
    /// └─────────────────────────────────────────────────────────────────────────┘
    /// ```
    ///
    /// The returned [`Database`] should be closed on shutdown.
    pub async fn open(config: AppConfig) -> AppResult<(AppState, Database)> {
        let db_path = config.database_path()?;
        info!(db_path = %db_path.display(), "Database path determined");

        let db = Database::new(DbConfig::new(db_path)).await?;
        info!("Database connected and migrations applied");

        let source = HttpCatalogClient::new(config.api_url.clone(), config.timeout())?;
        let kv: Arc<dyn KeyValueStore> = Arc::new(db.kv());

        Ok((AppState::new(config, kv, Arc::new(source)), db))
    }

    /// Translator for the current language.
    pub fn translator(&self) -> Translator {
        self.language.translator()
    }
}

/// Restores persisted state, then fetches the catalog.
///
/// Cart, favorites and the language preference load concurrently. Failures
/// are recorded on the stores (or logged) rather than returned, so the app
/// always starts.
pub async fn initialize_stores(state: &AppState) {
    info!("Initializing stores");

    let ((), (), language) = tokio::join!(
        state.cart.load(),
        state.favorites.load(),
        state.language.load(),
    );

    state.catalog.fetch_products().await;

    info!(
        language = %language,
        cart_lines = state.cart.line_count(),
        favorites = state.favorites.len(),
        products = state.catalog.products().len(),
        "Stores initialized"
    );
}

// =============================================================================
// Logging
// =============================================================================

/// Initializes the tracing subscriber for structured logging.
///
/// Logs go to stderr so command output on stdout stays clean.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=shopfront=trace` - Show trace for shopfront crates only
/// - Default: WARN, or DEBUG for shopfront crates when `verbose`
pub fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(verbose)));

    // Levels come from the filter alone
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Directives used when `RUST_LOG` is unset.
fn default_filter(verbose: bool) -> &'static str {
    if verbose {
        "warn,shopfront=debug,sqlx=warn"
    } else {
        "warn"
    }
}

// =============================================================================
// Tests
// =============================================================================
