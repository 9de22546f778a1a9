//! # Configuration
//!
//! ## Configuration Sources (Priority Order)
//! 1. Environment variables (`SHOPFRONT_*`)
//! 2. Config file (`SHOPFRONT_CONFIG`, else `<config dir>/shopfront.toml`)
//! 3. Defaults (this file)
//!
//! ```toml
//! # shopfront.toml
//! api_url = "https://api.example.com"
//! timeout_secs = 30
//! page_size = 12
//! language = "en"
//! ```
//!
//! Read-only after startup.

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use shopfront_core::{Money, DEFAULT_PAGE_SIZE};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

use crate::error::{AppError, AppResult};
use crate::i18n::{Language, FALLBACK_LANGUAGE};

pub const ENV_CONFIG: &str = "SHOPFRONT_CONFIG";
pub const ENV_API_URL: &str = "SHOPFRONT_API_URL";
pub const ENV_DB_PATH: &str = "SHOPFRONT_DB_PATH";
pub const ENV_TIMEOUT_SECS: &str = "SHOPFRONT_TIMEOUT_SECS";
pub const ENV_PAGE_SIZE: &str = "SHOPFRONT_PAGE_SIZE";
pub const ENV_LANG: &str = "SHOPFRONT_LANG";

const CONFIG_FILE_NAME: &str = "shopfront.toml";
const DB_FILE_NAME: &str = "shopfront.db";

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Catalog API base URL; products are fetched from `{api_url}/products`.
    pub api_url: String,

    /// Catalog request timeout in seconds.
    /// Default: 30
    pub timeout_secs: u64,

    /// SQLite file. `None` means the platform data directory.
    pub db_path: Option<PathBuf>,

    /// Products per "load more" page.
    /// Default: 12
    pub page_size: usize,

    /// Language used until a stored preference is loaded. `None` follows the
    /// system locale.
    pub language: Option<Language>,

    /// Appended to formatted prices.
    pub currency_suffix: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            api_url: "http://localhost:3000".to_string(),
            timeout_secs: 30,
            db_path: None,
            page_size: DEFAULT_PAGE_SIZE,
            language: None,
            currency_suffix: "TL".to_string(),
        }
    }
}

impl AppConfig {
    /// Loads defaults, then the config file, then environment overrides.
    pub fn load() -> AppResult<Self> {
        let explicit = std::env::var(ENV_CONFIG).ok().map(PathBuf::from);

        let mut config = match explicit {
            Some(path) => AppConfig::from_file(&path)?,
            None => match default_config_path().filter(|p| p.exists()) {
                Some(path) => AppConfig::from_file(&path)?,
                None => AppConfig::default(),
            },
        };

        config.apply_env(|key| std::env::var(key).ok())?;
        debug!(?config, "Configuration loaded");
        Ok(config)
    }

    /// Parses a TOML config file. Missing keys keep their defaults.
    pub fn from_file(path: &Path) -> AppResult<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            AppError::config(format!("Cannot read {}: {}", path.display(), e))
        })?;
        let config = AppConfig::from_toml(&raw)
            .map_err(|e| AppError::config(format!("{}: {}", path.display(), e.message)))?;
        info!(path = %path.display(), "Config file loaded");
        Ok(config)
    }

    pub fn from_toml(raw: &str) -> AppResult<Self> {
        toml::from_str(raw).map_err(|e| AppError::config(e.to_string()))
    }

    /// Applies `SHOPFRONT_*` overrides read through `lookup`.
    pub fn apply_env<F>(&mut self, lookup: F) -> AppResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_API_URL) {
            self.api_url = url;
        }

        if let Some(path) = lookup(ENV_DB_PATH) {
            self.db_path = Some(PathBuf::from(path));
        }

        if let Some(secs) = lookup(ENV_TIMEOUT_SECS) {
            self.timeout_secs = secs.trim().parse().map_err(|_| {
                AppError::config(format!("{} must be a whole number of seconds", ENV_TIMEOUT_SECS))
            })?;
        }

        if let Some(size) = lookup(ENV_PAGE_SIZE) {
            self.page_size = size
                .trim()
                .parse()
                .ok()
                .filter(|n| *n > 0)
                .ok_or_else(|| {
                    AppError::config(format!("{} must be a positive number", ENV_PAGE_SIZE))
                })?;
        }

        if let Some(lang) = lookup(ENV_LANG) {
            self.language = Some(lang.parse()?);
        }

        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Configured path, else `<data dir>/shopfront.db`.
    pub fn database_path(&self) -> AppResult<PathBuf> {
        if let Some(path) = &self.db_path {
            return Ok(path.clone());
        }

        let dirs = project_dirs()
            .ok_or_else(|| AppError::config("Could not determine app data directory"))?;
        Ok(dirs.data_dir().join(DB_FILE_NAME))
    }

    /// Configured language, else the system locale, else the fallback.
    pub fn initial_language(&self) -> Language {
        self.language
            .or_else(|| {
                std::env::var("LANG")
                    .ok()
                    .and_then(|locale| Language::from_locale(&locale))
            })
            .unwrap_or(FALLBACK_LANGUAGE)
    }

    /// `"26.00 TL"`.
    pub fn format_price(&self, amount: Money) -> String {
        if self.currency_suffix.is_empty() {
            amount.to_string()
        } else {
            format!("{} {}", amount, self.currency_suffix)
        }
    }
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "shopfront", "shopfront")
}

fn default_config_path() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.timeout(), Duration::from_secs(30));
        assert_eq!(config.page_size, 12);
        assert!(config.db_path.is_none());
    }

    #[test]
    fn test_toml_partial_keeps_defaults() {
        let config = AppConfig::from_toml(
            r#"
            api_url = "https://api.example.com"
            language = "en"
            "#,
        )
        .unwrap();

        assert_eq!(config.api_url, "https://api.example.com");
        assert_eq!(config.language, Some(Language::En));
        assert_eq!(config.timeout_secs, 30);
    }

    #[test]
    fn test_toml_invalid() {
        let err = AppConfig::from_toml("page_size = \"lots\"").unwrap_err();
        assert_eq!(err.code, ErrorCode::ConfigError);
    }

    #[test]
    fn test_env_overrides() {
        let mut config = AppConfig::default();
        config
            .apply_env(env(&[
                (ENV_API_URL, "https://override.example.com"),
                (ENV_DB_PATH, "/tmp/shop.db"),
                (ENV_TIMEOUT_SECS, "5"),
                (ENV_PAGE_SIZE, "20"),
                (ENV_LANG, "tr"),
            ]))
            .unwrap();

        assert_eq!(config.api_url, "https://override.example.com");
        assert_eq!(config.database_path().unwrap(), PathBuf::from("/tmp/shop.db"));
        assert_eq!(config.timeout(), Duration::from_secs(5));
        assert_eq!(config.page_size, 20);
        assert_eq!(config.initial_language(), Language::Tr);
    }

    #[test]
    fn test_env_rejects_bad_numbers() {
        let mut config = AppConfig::default();
        assert!(config.apply_env(env(&[(ENV_PAGE_SIZE, "0")])).is_err());
        assert!(config.apply_env(env(&[(ENV_TIMEOUT_SECS, "soon")])).is_err());
        assert!(config.apply_env(env(&[(ENV_LANG, "fr")])).is_err());
    }

    #[test]
    fn test_format_price() {
        let config = AppConfig::default();
        assert_eq!(config.format_price(Money::from_cents(2600)), "26.00 TL");

        let bare = AppConfig {
            currency_suffix: String::new(),
            ..AppConfig::default()
        };
        assert_eq!(bare.format_price(Money::from_cents(5)), "0.05");
    }
}
