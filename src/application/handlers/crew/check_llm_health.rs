//! CheckLlmHealthHandler - Report whether the completion engine is usable.

use std::sync::Arc;
use std::time::Instant;

use serde::Serialize;

use crate::domain::llm::{LlmSettings, LlmSettingsStore};
use crate::ports::{AIError, AIProviderFactory, CompletionRequest, MessageRole, RequestMetadata};

const VERIFY_PROMPT: &str = "Reply with OK";
const VERIFY_MAX_TOKENS: u32 = 16;

/// Health snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HealthReport {
    /// `ok` when the engine answered, `degraded` otherwise.
    pub status: &'static str,
    pub version: &'static str,
    pub model: String,
    pub llm_configured: bool,
    pub llm_reachable: bool,
    pub uptime_ms: u64,
}

/// Sends one verification completion using `settings`.
///
/// Returns true when the engine replies with non-empty text.
pub(super) async fn verify(
    providers: &dyn AIProviderFactory,
    settings: &LlmSettings,
) -> Result<bool, AIError> {
    let provider = providers.build(settings)?;
    let request = CompletionRequest::new(RequestMetadata::probe())
        .with_message(MessageRole::User, VERIFY_PROMPT)
        .with_max_tokens(VERIFY_MAX_TOKENS)
        .with_temperature(settings.temperature);
    let response = provider.complete(request).await?;
    Ok(!response.content.trim().is_empty())
}

/// Handler for health checks.
pub struct CheckLlmHealthHandler {
    settings: Arc<LlmSettingsStore>,
    providers: Arc<dyn AIProviderFactory>,
    started_at: Instant,
}

impl CheckLlmHealthHandler {
    pub fn new(
        settings: Arc<LlmSettingsStore>,
        providers: Arc<dyn AIProviderFactory>,
        started_at: Instant,
    ) -> Self {
        Self {
            settings,
            providers,
            started_at,
        }
    }

    /// Pings the engine only when a key is configured.
    pub async fn handle(&self) -> HealthReport {
        let settings = self.settings.current();
        let llm_configured = settings.has_api_key();

        let llm_reachable = if llm_configured {
            match verify(self.providers.as_ref(), &settings).await {
                Ok(reachable) => reachable,
                Err(err) => {
                    tracing::warn!(model = %settings.model, error = %err, "LLM health check failed");
                    false
                }
            }
        } else {
            false
        };

        HealthReport {
            status: if llm_reachable { "ok" } else { "degraded" },
            version: env!("CARGO_PKG_VERSION"),
            model: settings.model.clone(),
            llm_configured,
            llm_reachable,
            uptime_ms: self.started_at.elapsed().as_millis() as u64,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ai::{MockAIProvider, MockError, MockProviderFactory};

    fn handler(
        settings: LlmSettings,
        provider: MockAIProvider,
    ) -> (CheckLlmHealthHandler, MockProviderFactory) {
        let factory = MockProviderFactory::new(provider);
        let handler = CheckLlmHealthHandler::new(
            Arc::new(LlmSettingsStore::new(settings)),
            Arc::new(factory.clone()),
            Instant::now(),
        );
        (handler, factory)
    }

    #[tokio::test]
    async fn reachable_engine_reports_ok() {
        let (handler, factory) = handler(
            LlmSettings::new("gpt-5-mini").with_api_key("sk"),
            MockAIProvider::new().with_response("OK"),
        );

        let report = handler.handle().await;

        assert_eq!(report.status, "ok");
        assert!(report.llm_configured);
        assert!(report.llm_reachable);
        assert_eq!(report.model, "gpt-5-mini");
        assert_eq!(report.version, env!("CARGO_PKG_VERSION"));
        let calls = factory.provider().get_calls();
        assert_eq!(calls[0].user_prompt(), Some(VERIFY_PROMPT));
        assert_eq!(calls[0].metadata.role, None);
    }

    #[tokio::test]
    async fn missing_key_skips_ping() {
        let (handler, factory) = handler(LlmSettings::new("gpt-5-mini"), MockAIProvider::new());

        let report = handler.handle().await;

        assert_eq!(report.status, "degraded");
        assert!(!report.llm_configured);
        assert!(!report.llm_reachable);
        assert_eq!(factory.provider().call_count(), 0);
    }

    #[tokio::test]
    async fn failing_engine_reports_degraded() {
        let (handler, _) = handler(
            LlmSettings::new("gpt-5-mini").with_api_key("sk"),
            MockAIProvider::new().with_error(MockError::Unavailable {
                message: "503".to_string(),
            }),
        );

        let report = handler.handle().await;

        assert_eq!(report.status, "degraded");
        assert!(report.llm_configured);
        assert!(!report.llm_reachable);
    }

    #[tokio::test]
    async fn blank_reply_is_unreachable() {
        let (handler, _) = handler(
            LlmSettings::new("gpt-5-mini").with_api_key("sk"),
            MockAIProvider::new().with_response("   "),
        );

        assert!(!handler.handle().await.llm_reachable);
    }
}
