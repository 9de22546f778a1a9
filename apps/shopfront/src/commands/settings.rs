//! # Settings Commands
//!
//! The profile screen's language switch.

use serde::Serialize;
use tracing::debug;

use crate::error::AppResult;
use crate::i18n::Language;
use crate::AppState;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LanguageResponse {
    pub language: Language,
    pub available: Vec<Language>,
    pub message: Option<String>,
}

pub fn get_language(state: &AppState) -> LanguageResponse {
    debug!("get_language command");
    LanguageResponse {
        language: state.language.current(),
        available: vec![Language::En, Language::Tr],
        message: None,
    }
}

/// Persists and applies a language. The confirmation is in the new language.
pub async fn change_language(state: &AppState, language: Language) -> AppResult<LanguageResponse> {
    debug!(language = %language, "change_language command");
    state.language.change_language(language).await?;

    let mut response = get_language(state);
    response.message = Some(state.translator().t("profile.languageChanged"));
    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::AppConfig;
    use crate::testing::FakeCatalog;
    use shopfront_db::MemoryKvStore;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_change_language() {
        let state = AppState::new(
            AppConfig {
                language: Some(Language::Tr),
                ..AppConfig::default()
            },
            Arc::new(MemoryKvStore::new()),
            Arc::new(FakeCatalog::new(Vec::new())),
        );

        assert_eq!(get_language(&state).language, Language::Tr);

        let response = change_language(&state, Language::En).await.unwrap();
        assert_eq!(response.language, Language::En);
        assert_eq!(
            response.message.as_deref(),
            Some("Language changed to English")
        );
    }
}
