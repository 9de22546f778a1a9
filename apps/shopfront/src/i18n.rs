//! # Translations
//!
//! Status messages are produced as translation keys (`cart.addedToCart`) by
//! the stores and resolved here. Bundles for English and Turkish are embedded
//! in the binary.
//!
//! ## Lookup Order
//! ```text
//! t("cart.addedToCart")
//!      │
//!      ▼
//! current language bundle ──► found? return it
//!      │ missing
//!      ▼
//! fallback bundle (tr) ──────► found? return it
//!      │ missing
//!      ▼
//! the key itself
//! ```
//!
//! The chosen language is persisted under `@app_language`.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use shopfront_db::KeyValueStore;
use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, Mutex, OnceLock, PoisonError};
use tracing::{debug, error, info, warn};

use crate::error::{AppError, AppResult};

/// Storage key of the language preference.
pub const LANGUAGE_KEY: &str = "@app_language";

/// Language used when a key is missing from the current bundle.
pub const FALLBACK_LANGUAGE: Language = Language::Tr;

const EN_BUNDLE: &str = include_str!("../locales/en.json");
const TR_BUNDLE: &str = include_str!("../locales/tr.json");

// =============================================================================
// Language
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    En,
    Tr,
}

impl Language {
    pub fn code(&self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Tr => "tr",
        }
    }

    /// Picks a language from a locale string such as `en_US.UTF-8` or `tr-TR`.
    pub fn from_locale(locale: &str) -> Option<Language> {
        let primary = locale
            .split(['_', '-', '.'])
            .next()
            .unwrap_or_default();
        primary.parse().ok()
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "en" => Ok(Language::En),
            "tr" => Ok(Language::Tr),
            other => Err(AppError::validation(format!(
                "Unsupported language '{}' (expected en or tr)",
                other
            ))),
        }
    }
}

// =============================================================================
// Translator
// =============================================================================

#[derive(Debug)]
struct Bundles {
    en: Value,
    tr: Value,
}

impl Bundles {
    fn get(&self, language: Language) -> &Value {
        match language {
            Language::En => &self.en,
            Language::Tr => &self.tr,
        }
    }
}

fn parse_bundle(language: Language, raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|e| {
        error!(language = %language, error = %e, "Translation bundle is not valid JSON");
        Value::Null
    })
}

fn embedded_bundles() -> Arc<Bundles> {
    static BUNDLES: OnceLock<Arc<Bundles>> = OnceLock::new();
    BUNDLES
        .get_or_init(|| {
            Arc::new(Bundles {
                en: parse_bundle(Language::En, EN_BUNDLE),
                tr: parse_bundle(Language::Tr, TR_BUNDLE),
            })
        })
        .clone()
}

fn lookup<'a>(bundle: &'a Value, key: &str) -> Option<&'a str> {
    key.split('.')
        .try_fold(bundle, |node, part| node.get(part))
        .and_then(Value::as_str)
}

/// Key → display string for one language.
#[derive(Debug, Clone)]
pub struct Translator {
    language: Language,
    bundles: Arc<Bundles>,
}

impl Translator {
    /// Translator over the embedded bundles.
    pub fn new(language: Language) -> Self {
        Translator {
            language,
            bundles: embedded_bundles(),
        }
    }

    /// Translator over caller-supplied bundles.
    pub fn from_bundles(language: Language, en: Value, tr: Value) -> Self {
        Translator {
            language,
            bundles: Arc::new(Bundles { en, tr }),
        }
    }

    pub fn language(&self) -> Language {
        self.language
    }

    /// Resolves a dotted key.
    pub fn t(&self, key: &str) -> String {
        if let Some(text) = lookup(self.bundles.get(self.language), key) {
            return text.to_string();
        }
        if let Some(text) = lookup(self.bundles.get(FALLBACK_LANGUAGE), key) {
            return text.to_string();
        }
        debug!(key = %key, language = %self.language, "Missing translation");
        key.to_string()
    }

    /// Resolves a key and substitutes `{{name}}` placeholders.
    pub fn t_with(&self, key: &str, args: &[(&str, &str)]) -> String {
        args.iter().fold(self.t(key), |text, (name, value)| {
            text.replace(&format!("{{{{{}}}}}", name), value)
        })
    }
}

// =============================================================================
// Language Settings
// =============================================================================

/// Current language plus its persisted mirror.
pub struct LanguageSettings {
    kv: Arc<dyn KeyValueStore>,
    current: Mutex<Language>,
}

impl LanguageSettings {
    /// `initial` is used until `load` finds a stored preference.
    pub fn new(kv: Arc<dyn KeyValueStore>, initial: Language) -> Self {
        LanguageSettings {
            kv,
            current: Mutex::new(initial),
        }
    }

    pub fn current(&self) -> Language {
        *self.current.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn translator(&self) -> Translator {
        Translator::new(self.current())
    }

    /// Applies the stored preference, if any. Unreadable or unknown values
    /// leave the current language in place.
    pub async fn load(&self) -> Language {
        match self.kv.get(LANGUAGE_KEY).await {
            Ok(Some(stored)) => match stored.parse::<Language>() {
                Ok(language) => {
                    *self.current.lock().unwrap_or_else(PoisonError::into_inner) = language;
                    debug!(language = %language, "Stored language applied");
                }
                Err(_) => warn!(stored = %stored, "Ignoring unknown stored language"),
            },
            Ok(None) => {}
            Err(e) => warn!(error = %e, "Could not read language preference"),
        }
        self.current()
    }

    /// Persists the preference, then switches.
    ///
    /// If the write fails the language is left unchanged.
    pub async fn change_language(&self, language: Language) -> AppResult<()> {
        self.kv.set(LANGUAGE_KEY, language.code()).await?;
        *self.current.lock().unwrap_or_else(PoisonError::into_inner) = language;
        info!(language = %language, "Language changed");
        Ok(())
    }
}
