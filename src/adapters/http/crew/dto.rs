//! HTTP DTOs for crew endpoints
//!
//! These types decouple the HTTP API from domain types, allowing independent evolution.

use serde::{Deserialize, Serialize};

use crate::application::ReconfigureLlmResult;
use crate::domain::crew::{PipelineResult, Role, RoleScores};

// ════════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Request to run a query through the crew
#[derive(Debug, Clone, Deserialize)]
pub struct ChatRequest {
    /// Missing is treated like empty and rejected by the handler
    #[serde(default)]
    pub message: String,
    #[serde(default = "default_jurisdiction")]
    pub jurisdiction: String,
    /// Forces a role; classified from `message` when absent
    #[serde(default)]
    pub agent_type: Option<String>,
    #[serde(default)]
    pub matter_facts: Option<String>,
    #[serde(default)]
    pub document_type: Option<String>,
    #[serde(default)]
    pub full_crew: bool,
}

fn default_jurisdiction() -> String {
    "missouri".to_string()
}

/// Request to replace the completion engine credentials
#[derive(Debug, Clone, Deserialize)]
pub struct ConfigureRequest {
    #[serde(default)]
    pub api_key: String,
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
}

/// Query string for classification
#[derive(Debug, Clone, Deserialize)]
pub struct ClassifyQuery {
    pub message: String,
}

// ════════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Response for a crew run; failed runs are still 200 with `success: false`
#[derive(Debug, Clone, Serialize)]
pub struct ChatResponse {
    pub success: bool,
    /// Role tag or `full_crew`
    pub agent_type: String,
    pub content: String,
    pub jurisdiction: String,
    pub model: String,
    pub tokens_used: u32,
    pub duration_ms: u64,
    pub roles_used: Vec<Role>,
    pub tasks_completed: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ChatResponse {
    pub fn from_result(result: PipelineResult, duration_ms: u64) -> Self {
        Self {
            success: result.success,
            agent_type: result.pipeline_id.to_string(),
            content: result.content,
            jurisdiction: result.jurisdiction.as_tag().to_string(),
            model: result.model,
            tokens_used: result.token_usage.total_tokens,
            duration_ms,
            roles_used: result.roles_used,
            tasks_completed: result.tasks_completed,
            error: result.error,
        }
    }
}

/// Response for reconfiguration
#[derive(Debug, Clone, Serialize)]
pub struct ConfigureResponse {
    pub success: bool,
    pub accepted: bool,
    pub verified: bool,
    pub model: String,
    pub base_url: String,
    pub message: String,
}

impl From<ReconfigureLlmResult> for ConfigureResponse {
    fn from(result: ReconfigureLlmResult) -> Self {
        let message = if result.verified {
            "LLM configured and verified"
        } else {
            "LLM configured but NOT reachable: check API key and base URL"
        };
        Self {
            success: result.verified,
            accepted: result.accepted,
            verified: result.verified,
            model: result.model,
            base_url: result.base_url,
            message: message.to_string(),
        }
    }
}

/// Response for classification
#[derive(Debug, Clone, Serialize)]
pub struct ClassifyResponse {
    pub message: String,
    pub agent_type: Role,
    pub scores: RoleScores,
}

/// Body returned with 503 when no credentials are configured
#[derive(Debug, Clone, Serialize)]
pub struct NotConfiguredResponse {
    pub error: String,
    pub message: String,
    /// Tells the caller to fall back to its template agents
    pub fallback: bool,
}

impl NotConfiguredResponse {
    pub fn new() -> Self {
        Self {
            error: "LLM not configured".to_string(),
            message: "Set OPENAI_API_KEY, NOVITA_API_KEY, or configure via ~/.genspark_llm.yaml"
                .to_string(),
            fallback: true,
        }
    }
}

impl Default for NotConfiguredResponse {
    fn default() -> Self {
        Self::new()
    }
}

/// Standard error response
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            code: "BAD_REQUEST".to_string(),
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            code: "INTERNAL_ERROR".to_string(),
            message: message.into(),
        }
    }
}
