//! HTTP handlers for crew endpoints
//!
//! These handlers connect Axum routes to application layer command/query handlers.

use std::str::FromStr;
use std::sync::Arc;
use std::time::Instant;

use axum::extract::{Json, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::application::{
    CheckLlmHealthHandler, GetLlmConfigHandler, HealthReport, LlmConfigView, ReconfigureError,
    ReconfigureLlmCommand, ReconfigureLlmHandler, RunCrewError, RunCrewHandler,
};
use crate::domain::crew::{score, Jurisdiction, PipelineRequest, Role};
use crate::domain::llm::LlmSettingsStore;
use crate::ports::AIProviderFactory;

use super::dto::{
    ChatRequest, ChatResponse, ClassifyQuery, ClassifyResponse, ConfigureRequest,
    ConfigureResponse, ErrorResponse, NotConfiguredResponse,
};

// ════════════════════════════════════════════════════════════════════════════════
// Application State
// ════════════════════════════════════════════════════════════════════════════════

/// Shared application state containing all dependencies
#[derive(Clone)]
pub struct CrewAppState {
    pub settings: Arc<LlmSettingsStore>,
    pub providers: Arc<dyn AIProviderFactory>,
    pub started_at: Instant,
}

impl CrewAppState {
    pub fn new(settings: Arc<LlmSettingsStore>, providers: Arc<dyn AIProviderFactory>) -> Self {
        Self {
            settings,
            providers,
            started_at: Instant::now(),
        }
    }

    pub fn run_crew_handler(&self) -> RunCrewHandler {
        RunCrewHandler::new(self.settings.clone(), self.providers.clone())
    }

    pub fn reconfigure_handler(&self) -> ReconfigureLlmHandler {
        ReconfigureLlmHandler::new(self.settings.clone(), self.providers.clone())
    }

    pub fn health_handler(&self) -> CheckLlmHealthHandler {
        CheckLlmHealthHandler::new(
            self.settings.clone(),
            self.providers.clone(),
            self.started_at,
        )
    }

    pub fn config_handler(&self) -> GetLlmConfigHandler {
        GetLlmConfigHandler::new(self.settings.clone())
    }
}

fn bad_request(message: impl Into<String>) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse::bad_request(message)),
    )
        .into_response()
}

// ════════════════════════════════════════════════════════════════════════════════
// Handlers
// ════════════════════════════════════════════════════════════════════════════════

/// Health check; pings the engine when a key is configured
///
/// GET /health
pub async fn health(State(app_state): State<CrewAppState>) -> Json<HealthReport> {
    Json(app_state.health_handler().handle().await)
}

/// Current engine configuration with the key redacted
///
/// GET /api/crew/config
pub async fn get_config(State(app_state): State<CrewAppState>) -> Json<LlmConfigView> {
    Json(app_state.config_handler().handle())
}

/// Route a query through one role or the full crew
///
/// POST /api/crew/chat
pub async fn chat(
    State(app_state): State<CrewAppState>,
    Json(req): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, Response> {
    let started = Instant::now();

    if req.message.trim().is_empty() {
        return Err(bad_request("Message cannot be empty"));
    }

    let forced_role = match req.agent_type.as_deref().filter(|t| !t.is_empty()) {
        Some(tag) => Some(Role::from_str(tag).map_err(|e| bad_request(e.to_string()))?),
        None => None,
    };

    let mut request = PipelineRequest::new(req.message, Jurisdiction::parse(&req.jurisdiction));
    if let Some(role) = forced_role {
        request = request.with_role(role);
    }
    if let Some(facts) = req.matter_facts {
        request = request.with_matter_facts(facts);
    }
    if let Some(document_type) = req.document_type {
        request = request.with_document_type(document_type);
    }
    if req.full_crew {
        request = request.full_pipeline();
    }

    tracing::info!(
        role = forced_role.map(|r| r.as_str()).unwrap_or("auto"),
        jurisdiction = %request.jurisdiction,
        full_crew = request.run_full_pipeline,
        message_len = request.query.len(),
        "Crew chat"
    );

    let result = app_state
        .run_crew_handler()
        .run(request)
        .await
        .map_err(|e| match e {
            RunCrewError::NotConfigured => (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(NotConfiguredResponse::new()),
            )
                .into_response(),
            RunCrewError::EngineSetup(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::internal(msg)),
            )
                .into_response(),
        })?;

    let duration_ms = started.elapsed().as_millis() as u64;
    Ok(Json(ChatResponse::from_result(result, duration_ms)))
}

/// Replace the engine credentials and verify them
///
/// POST /api/crew/configure
pub async fn configure(
    State(app_state): State<CrewAppState>,
    Json(req): Json<ConfigureRequest>,
) -> Result<impl IntoResponse, impl IntoResponse> {
    let cmd = ReconfigureLlmCommand {
        api_key: req.api_key,
        base_url: req.base_url,
        model: req.model,
    };

    let result = app_state
        .reconfigure_handler()
        .handle(cmd)
        .await
        .map_err(|e| match e {
            ReconfigureError::EmptyApiKey => (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse::bad_request(e.to_string())),
            ),
        })?;

    Ok::<_, (StatusCode, Json<ErrorResponse>)>((
        StatusCode::OK,
        Json(ConfigureResponse::from(result)),
    ))
}

/// Show which role a message would be routed to
///
/// GET /api/crew/classify?message=...
pub async fn classify(Query(query): Query<ClassifyQuery>) -> Json<ClassifyResponse> {
    let scores = score(&query.message);
    Json(ClassifyResponse {
        agent_type: scores.winner(),
        message: query.message,
        scores,
    })
}
