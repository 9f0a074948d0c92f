//! GetLlmConfigHandler - Redacted view of the current completion engine settings.

use std::sync::Arc;

use serde::Serialize;

use crate::domain::llm::LlmSettingsStore;

/// Settings safe to show to operators; never includes the key itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LlmConfigView {
    pub model: String,
    pub base_url: String,
    pub api_key_set: bool,
    pub version: &'static str,
}

pub struct GetLlmConfigHandler {
    settings: Arc<LlmSettingsStore>,
}

impl GetLlmConfigHandler {
    pub fn new(settings: Arc<LlmSettingsStore>) -> Self {
        Self { settings }
    }

    pub fn handle(&self) -> LlmConfigView {
        let settings = self.settings.current();
        LlmConfigView {
            model: settings.model.clone(),
            base_url: settings.redacted_base_url(),
            api_key_set: settings.has_api_key(),
            version: env!("CARGO_PKG_VERSION"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::llm::LlmSettings;

    #[test]
    fn view_redacts_long_base_url_and_hides_key() {
        let long = format!("https://{}.example.com/v1", "x".repeat(70));
        let store = Arc::new(LlmSettingsStore::new(
            LlmSettings::new("gpt-5-mini")
                .with_api_key("sk-secret")
                .with_base_url(long),
        ));

        let view = GetLlmConfigHandler::new(store).handle();

        assert!(view.api_key_set);
        assert!(view.base_url.ends_with("..."));
        assert_eq!(view.base_url.chars().count(), 63);
        let json = serde_json::to_string(&view).unwrap();
        assert!(!json.contains("sk-secret"));
    }

    #[test]
    fn view_reports_missing_key() {
        let store = Arc::new(LlmSettingsStore::new(LlmSettings::new("gpt-5-mini")));
        let view = GetLlmConfigHandler::new(store).handle();

        assert!(!view.api_key_set);
        assert_eq!(view.base_url, "");
        assert_eq!(view.model, "gpt-5-mini");
    }
}
