//! ReconfigureLlmHandler - Swap completion engine credentials at runtime.

use std::sync::Arc;

use serde::Serialize;

use super::check_llm_health::verify;
use crate::domain::llm::{LlmSettingsStore, LlmSettingsUpdate};
use crate::ports::AIProviderFactory;

/// Command to replace the engine credentials.
#[derive(Debug, Clone)]
pub struct ReconfigureLlmCommand {
    pub api_key: String,
    pub base_url: Option<String>,
    pub model: Option<String>,
}

/// Outcome of a reconfiguration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReconfigureLlmResult {
    pub accepted: bool,
    /// True when the verification completion returned text.
    pub verified: bool,
    pub model: String,
    /// Redacted base URL.
    pub base_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReconfigureError {
    #[error("api_key must not be empty")]
    EmptyApiKey,
}

/// Handler for runtime reconfiguration.
///
/// New settings stay in place even when verification fails.
pub struct ReconfigureLlmHandler {
    settings: Arc<LlmSettingsStore>,
    providers: Arc<dyn AIProviderFactory>,
}

impl ReconfigureLlmHandler {
    pub fn new(settings: Arc<LlmSettingsStore>, providers: Arc<dyn AIProviderFactory>) -> Self {
        Self {
            settings,
            providers,
        }
    }

    pub async fn handle(
        &self,
        cmd: ReconfigureLlmCommand,
    ) -> Result<ReconfigureLlmResult, ReconfigureError> {
        let api_key = cmd.api_key.trim();
        if api_key.is_empty() {
            return Err(ReconfigureError::EmptyApiKey);
        }

        let next = self.settings.apply(&LlmSettingsUpdate {
            api_key: api_key.to_string(),
            base_url: cmd.base_url,
            model: cmd.model,
        });

        let verified = match verify(self.providers.as_ref(), &next).await {
            Ok(verified) => verified,
            Err(err) => {
                tracing::warn!(
                    model = %next.model,
                    error = %err,
                    "LLM verification failed after reconfigure"
                );
                false
            }
        };

        tracing::info!(
            model = %next.model,
            base_url = %next.redacted_base_url(),
            verified,
            "LLM reconfigured"
        );

        Ok(ReconfigureLlmResult {
            accepted: true,
            verified,
            model: next.model.clone(),
            base_url: next.redacted_base_url(),
        })
    }
}
