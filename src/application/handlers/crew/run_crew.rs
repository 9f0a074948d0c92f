//! RunCrewHandler - Route a legal query through one role or the full crew.

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use uuid::Uuid;

use crate::domain::crew::{
    classify, plan_full_crew, PipelineId, PipelineRequest, PipelineResult, Role, RunUsage,
    TaskSpec,
};
use crate::domain::llm::{LlmSettings, LlmSettingsStore};
use crate::ports::{
    AIError, AIProvider, AIProviderFactory, CompletionRequest, CompletionResponse, MessageRole,
    RequestMetadata,
};

/// Error type for crew runs.
///
/// Completion failures are not errors here; they come back as a failed
/// [`PipelineResult`].
#[derive(Debug, Clone, thiserror::Error)]
pub enum RunCrewError {
    /// No API key in the current settings snapshot.
    #[error("LLM not configured: set OPENAI_API_KEY or NOVITA_API_KEY, or POST /api/crew/configure")]
    NotConfigured,
    /// The completion engine could not be constructed.
    #[error("completion engine setup failed: {0}")]
    EngineSetup(String),
}

/// Handler for crew pipeline runs.
pub struct RunCrewHandler {
    settings: Arc<LlmSettingsStore>,
    providers: Arc<dyn AIProviderFactory>,
}

impl RunCrewHandler {
    pub fn new(settings: Arc<LlmSettingsStore>, providers: Arc<dyn AIProviderFactory>) -> Self {
        Self {
            settings,
            providers,
        }
    }

    /// Runs the full crew when requested, otherwise a single role.
    pub async fn run(&self, request: PipelineRequest) -> Result<PipelineResult, RunCrewError> {
        if request.run_full_pipeline {
            self.run_full(request).await
        } else {
            self.run_single(request).await
        }
    }

    /// Runs one role: the forced role, or the classifier's pick.
    pub async fn run_single(
        &self,
        request: PipelineRequest,
    ) -> Result<PipelineResult, RunCrewError> {
        let run = self.start()?;
        let role = request.forced_role.unwrap_or_else(|| classify(&request.query));
        let pipeline_id = PipelineId::Role(role);

        tracing::info!(
            request_id = %run.request_id,
            role = %role,
            forced = request.forced_role.is_some(),
            jurisdiction = %request.jurisdiction,
            "Running single role"
        );

        let task = request.task_for(role);
        match run.execute(&task).await {
            Ok(response) => {
                let mut usage = RunUsage::default();
                run.record(&mut usage, &response);
                Ok(PipelineResult::succeeded(
                    pipeline_id,
                    response.content,
                    request.jurisdiction,
                    run.settings.model.clone(),
                    vec![role],
                    usage,
                ))
            }
            Err(err) => Ok(run.failed(pipeline_id, &request, role, &err)),
        }
    }

    /// Runs researcher, analyst, the drafter when needed, then strategist.
    ///
    /// Steps run strictly in order and the first failure aborts the rest.
    pub async fn run_full(
        &self,
        request: PipelineRequest,
    ) -> Result<PipelineResult, RunCrewError> {
        let run = self.start()?;
        let roles = plan_full_crew(&request);

        tracing::info!(
            request_id = %run.request_id,
            steps = roles.len(),
            drafter = roles.contains(&Role::Drafter),
            jurisdiction = %request.jurisdiction,
            "Running full crew"
        );

        let mut usage = RunUsage::default();
        let mut content = String::new();
        for role in &roles {
            let task = request.task_for(*role);
            match run.execute(&task).await {
                Ok(response) => {
                    run.record(&mut usage, &response);
                    content = response.content;
                }
                Err(err) => return Ok(run.failed(PipelineId::FullCrew, &request, *role, &err)),
            }
        }

        Ok(PipelineResult::succeeded(
            PipelineId::FullCrew,
            content,
            request.jurisdiction,
            run.settings.model.clone(),
            roles,
            usage,
        ))
    }

    /// Snapshots settings and builds the engine for one invocation.
    fn start(&self) -> Result<CrewRun, RunCrewError> {
        let settings = self.settings.current();
        if !settings.has_api_key() {
            return Err(RunCrewError::NotConfigured);
        }
        let provider = self.providers.build(&settings).map_err(|err| match err {
            AIError::AuthenticationFailed => RunCrewError::NotConfigured,
            other => RunCrewError::EngineSetup(other.to_string()),
        })?;

        let request_id = Uuid::new_v4();
        let info = provider.provider_info();
        tracing::debug!(
            request_id = %request_id,
            provider = %info.name,
            model = %info.model,
            max_context_tokens = info.max_context_tokens,
            "Completion engine ready"
        );

        Ok(CrewRun {
            request_id,
            today: Utc::now().date_naive(),
            settings,
            provider,
        })
    }
}

/// State shared by every step of one invocation.
struct CrewRun {
    request_id: Uuid,
    today: NaiveDate,
    settings: Arc<LlmSettings>,
    provider: Arc<dyn AIProvider>,
}

impl CrewRun {
    async fn execute(&self, task: &TaskSpec) -> Result<CompletionResponse, AIError> {
        let request = CompletionRequest::new(RequestMetadata::for_role(self.request_id, task.role))
            .with_system_prompt(task.role.persona().system_prompt(self.today))
            .with_message(MessageRole::User, task.prompt())
            .with_temperature(self.settings.temperature)
            .with_max_tokens(self.settings.max_tokens);

        tracing::debug!(request_id = %self.request_id, role = %task.role, "Step started");
        let response = self.provider.complete(request).await?;
        tracing::debug!(
            request_id = %self.request_id,
            role = %task.role,
            tokens = response.usage.total_tokens,
            "Step finished"
        );
        Ok(response)
    }

    fn record(&self, usage: &mut RunUsage, response: &CompletionResponse) {
        let u = &response.usage;
        usage.accumulate(
            u.prompt_tokens,
            u.completion_tokens,
            u.total_tokens,
            u.estimated_cost_cents,
        );
    }

    fn failed(
        &self,
        pipeline_id: PipelineId,
        request: &PipelineRequest,
        role: Role,
        err: &AIError,
    ) -> PipelineResult {
        tracing::error!(
            request_id = %self.request_id,
            pipeline = %pipeline_id,
            role = %role,
            error = %err,
            "Completion failed, aborting run"
        );
        PipelineResult::failed(
            pipeline_id,
            request.jurisdiction.clone(),
            self.settings.model.clone(),
            format!("{role}: {err}"),
        )
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::adapters::ai::{MockAIProvider, MockError, MockProviderFactory};
    use crate::domain::crew::Jurisdiction;
    use crate::domain::llm::LlmSettingsUpdate;
    use crate::ports::{FinishReason, TokenUsage};

    fn configured_store() -> Arc<LlmSettingsStore> {
        Arc::new(LlmSettingsStore::new(
            LlmSettings::new("gpt-5-mini").with_api_key("sk-test"),
        ))
    }

    fn handler_with(
        store: Arc<LlmSettingsStore>,
        provider: MockAIProvider,
    ) -> (RunCrewHandler, MockProviderFactory) {
        let factory = MockProviderFactory::new(provider);
        let handler = RunCrewHandler::new(store, Arc::new(factory.clone()));
        (handler, factory)
    }

    fn full_request(query: &str) -> PipelineRequest {
        PipelineRequest::new(query, Jurisdiction::Missouri).full_pipeline()
    }

    #[tokio::test]
    async fn single_run_uses_classified_role() {
        let (handler, factory) =
            handler_with(configured_store(), MockAIProvider::new().with_response("Draft v1"));

        let result = handler
            .run(PipelineRequest::new("Please draft a motion to dismiss", Jurisdiction::Kansas))
            .await
            .unwrap();

        assert!(result.success);
        assert_eq!(result.pipeline_id, PipelineId::Role(Role::Drafter));
        assert_eq!(result.content, "Draft v1");
        assert_eq!(result.roles_used, vec![Role::Drafter]);
        assert_eq!(result.tasks_completed, 1);
        assert_eq!(result.model, "gpt-5-mini");
        assert_eq!(result.token_usage.total_tokens, 30);
        assert_eq!(factory.provider().call_count(), 1);
    }

    #[tokio::test]
    async fn forced_role_skips_classification() {
        let (handler, factory) = handler_with(configured_store(), MockAIProvider::new());

        let result = handler
            .run(
                PipelineRequest::new("Please draft a motion to dismiss", Jurisdiction::Kansas)
                    .with_role(Role::Analyst),
            )
            .await
            .unwrap();

        assert_eq!(result.pipeline_id, PipelineId::Role(Role::Analyst));
        let calls = factory.provider().get_calls();
        assert_eq!(calls[0].metadata.role, Some(Role::Analyst));
    }

    #[tokio::test]
    async fn request_carries_persona_task_and_settings() {
        let store = Arc::new(LlmSettingsStore::new(
            LlmSettings::new("gpt-5-mini")
                .with_api_key("sk-test")
                .with_temperature(0.3)
                .with_max_tokens(2048),
        ));
        let (handler, factory) = handler_with(store, MockAIProvider::new());
        let request = PipelineRequest::new("Find the SOL for negligence", Jurisdiction::Kansas)
            .with_role(Role::Researcher);
        let expected_prompt = request.task_for(Role::Researcher).prompt();

        handler.run(request).await.unwrap();

        let calls = factory.provider().get_calls();
        let call = &calls[0];
        assert_eq!(call.user_prompt(), Some(expected_prompt.as_str()));
        assert!(call
            .system_prompt
            .as_deref()
            .unwrap_or_default()
            .contains(Role::Researcher.goal()));
        assert_eq!(call.temperature, Some(0.3));
        assert_eq!(call.max_tokens, Some(2048));
    }

    #[tokio::test]
    async fn full_run_without_triggers_runs_three_roles() {
        let provider = MockAIProvider::new()
            .with_response("research")
            .with_response("analysis")
            .with_response("strategy");
        let (handler, factory) = handler_with(configured_store(), provider);

        let result = handler
            .run(full_request("What is the statute of limitations for negligence?"))
            .await
            .unwrap();

        assert!(result.success);
        assert_eq!(result.pipeline_id, PipelineId::FullCrew);
        assert_eq!(
            result.roles_used,
            vec![Role::Researcher, Role::Analyst, Role::Strategist]
        );
        assert_eq!(result.tasks_completed, 3);
        assert_eq!(result.content, "strategy");
        assert_eq!(result.token_usage.total_tokens, 90);
        assert_eq!(result.token_usage.estimated_cost_cents, 3);
        assert_eq!(factory.provider().call_count(), 3);
    }

    #[tokio::test]
    async fn full_run_with_document_type_inserts_drafter_before_strategist() {
        let (handler, factory) = handler_with(configured_store(), MockAIProvider::new());

        let result = handler
            .run(
                full_request("Rear-end collision on I-70")
                    .with_document_type("motion for summary judgment"),
            )
            .await
            .unwrap();

        assert_eq!(
            result.roles_used,
            vec![
                Role::Researcher,
                Role::Analyst,
                Role::Drafter,
                Role::Strategist
            ]
        );
        let order: Vec<_> = factory
            .provider()
            .get_calls()
            .iter()
            .map(|c| c.metadata.role)
            .collect();
        assert_eq!(
            order,
            vec![
                Some(Role::Researcher),
                Some(Role::Analyst),
                Some(Role::Drafter),
                Some(Role::Strategist)
            ]
        );
    }

    #[tokio::test]
    async fn full_run_steps_share_request_id() {
        let (handler, factory) = handler_with(configured_store(), MockAIProvider::new());

        handler.run(full_request("Assess liability")).await.unwrap();

        let calls = factory.provider().get_calls();
        let first = calls[0].metadata.request_id;
        assert!(calls.iter().all(|c| c.metadata.request_id == first));
    }

    #[tokio::test]
    async fn full_run_steps_do_not_see_prior_output() {
        let provider = MockAIProvider::new().with_response("UNIQUE-RESEARCH-OUTPUT");
        let (handler, factory) = handler_with(configured_store(), provider);

        handler.run(full_request("Assess liability")).await.unwrap();

        let calls = factory.provider().get_calls();
        assert!(calls[1..].iter().all(|c| {
            !c.user_prompt()
                .unwrap_or_default()
                .contains("UNIQUE-RESEARCH-OUTPUT")
        }));
    }

    #[tokio::test]
    async fn failure_on_second_step_aborts_remaining_steps() {
        let provider = MockAIProvider::new()
            .with_response("research")
            .with_error(MockError::Network {
                message: "connection reset".to_string(),
            })
            .with_response("never used");
        let (handler, factory) = handler_with(configured_store(), provider);

        let result = handler.run(full_request("Assess liability")).await.unwrap();

        assert!(!result.success);
        assert_eq!(result.pipeline_id, PipelineId::FullCrew);
        assert_eq!(result.content, "");
        assert!(result.roles_used.is_empty());
        assert_eq!(result.tasks_completed, 0);
        assert_eq!(result.token_usage, RunUsage::default());
        let error = result.error.unwrap();
        assert!(error.starts_with("analyst: "), "error was {error:?}");
        assert!(error.contains("connection reset"));
        assert_eq!(factory.provider().call_count(), 2);
    }

    #[tokio::test]
    async fn single_run_failure_keeps_role_id() {
        let provider = MockAIProvider::new().with_error(MockError::AuthenticationFailed);
        let (handler, _) = handler_with(configured_store(), provider);

        let result = handler
            .run(PipelineRequest::new("hello", Jurisdiction::Federal))
            .await
            .unwrap();

        assert!(!result.success);
        assert_eq!(result.pipeline_id, PipelineId::Role(Role::Strategist));
        assert_eq!(result.jurisdiction, Jurisdiction::Federal);
        assert_eq!(
            result.error.as_deref(),
            Some("strategist: authentication failed")
        );
    }

    #[tokio::test]
    async fn missing_key_is_not_configured_without_engine_work() {
        let store = Arc::new(LlmSettingsStore::new(LlmSettings::new("gpt-5-mini")));
        let (handler, factory) = handler_with(store, MockAIProvider::new());

        let err = handler
            .run(full_request("Assess liability"))
            .await
            .unwrap_err();

        assert!(matches!(err, RunCrewError::NotConfigured));
        assert!(factory.builds().is_empty());
        assert_eq!(factory.provider().call_count(), 0);
    }

    #[tokio::test]
    async fn reconfigured_key_is_used_by_next_run() {
        let store = configured_store();
        let (handler, factory) = handler_with(Arc::clone(&store), MockAIProvider::new());

        handler
            .run(PipelineRequest::new("hello", Jurisdiction::Missouri))
            .await
            .unwrap();
        store.apply(&LlmSettingsUpdate {
            api_key: "sk-rotated".to_string(),
            base_url: Some("https://api.novita.ai/v3/openai".to_string()),
            model: Some("claude-3-5-sonnet-20241022".to_string()),
        });
        let result = handler
            .run(PipelineRequest::new("hello", Jurisdiction::Missouri))
            .await
            .unwrap();

        let builds = factory.builds();
        assert_eq!(builds.len(), 2);
        assert_eq!(builds[0].api_key.as_deref(), Some("sk-test"));
        assert_eq!(builds[1].api_key.as_deref(), Some("sk-rotated"));
        assert_eq!(result.model, "claude-3-5-sonnet-20241022");
    }

    #[tokio::test]
    async fn usage_sums_across_steps() {
        let provider = MockAIProvider::new()
            .with_response_full("a", TokenUsage::new(100, 50, 2), FinishReason::Stop)
            .with_response_full("b", TokenUsage::new(10, 5, 1), FinishReason::Length)
            .with_response_full("c", TokenUsage::new(1, 1, 0), FinishReason::Stop);
        let (handler, _) = handler_with(configured_store(), provider);

        let result = handler.run(full_request("Assess liability")).await.unwrap();

        assert_eq!(result.token_usage.prompt_tokens, 111);
        assert_eq!(result.token_usage.completion_tokens, 56);
        assert_eq!(result.token_usage.total_tokens, 167);
        assert_eq!(result.token_usage.estimated_cost_cents, 3);
    }

    #[tokio::test]
    async fn oversized_usage_saturates() {
        let huge = TokenUsage {
            prompt_tokens: u32::MAX,
            completion_tokens: 0,
            total_tokens: u32::MAX,
            estimated_cost_cents: 0,
        };
        let provider = MockAIProvider::new()
            .with_response_full("a", huge.clone(), FinishReason::Stop)
            .with_response_full("b", huge, FinishReason::Stop);
        let (handler, _) = handler_with(configured_store(), provider);

        let result = handler.run(full_request("Assess liability")).await.unwrap();

        assert!(result.success);
        assert_eq!(result.token_usage.prompt_tokens, u32::MAX);
        assert_eq!(result.token_usage.total_tokens, u32::MAX);
    }

    #[tokio::test]
    async fn reconfigure_mid_run_only_affects_later_runs() {
        let store = configured_store();
        let provider = MockAIProvider::new().with_delay(Duration::from_millis(30));
        let (handler, factory) = handler_with(Arc::clone(&store), provider);

        let rotate = async {
            tokio::time::sleep(Duration::from_millis(40)).await;
            store.apply(&LlmSettingsUpdate {
                api_key: "sk-rotated".to_string(),
                base_url: None,
                model: Some("claude-3-5-sonnet-20241022".to_string()),
            });
        };
        let (result, ()) = tokio::join!(handler.run(full_request("Assess liability")), rotate);
        let result = result.unwrap();

        assert!(result.success);
        assert_eq!(result.model, "gpt-5-mini");
        assert_eq!(factory.provider().call_count(), 3);
        let builds = factory.builds();
        assert_eq!(builds.len(), 1);
        assert_eq!(builds[0].api_key.as_deref(), Some("sk-test"));
        assert_eq!(store.current().api_key(), Some("sk-rotated"));

        let next = handler.run(full_request("Assess liability")).await.unwrap();
        assert_eq!(next.model, "claude-3-5-sonnet-20241022");
        assert_eq!(factory.builds()[1].api_key.as_deref(), Some("sk-rotated"));
    }
}
