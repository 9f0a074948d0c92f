//! OpenAI Provider - Implementation of AIProvider for OpenAI-compatible APIs.
//!
//! Talks to any backend exposing `POST {base_url}/chat/completions`
//! (OpenAI, Novita, proxies). One request per role step, no streaming.
//!
//! # Configuration
//!
//! ```ignore
//! let config = OpenAIConfig::new(api_key)
//!     .with_model("gpt-5-mini")
//!     .with_base_url("https://api.novita.ai/v3/openai");
//!
//! let provider = OpenAIProvider::new(config)?;
//! ```

use async_trait::async_trait;
use reqwest::{Client, Response};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;

use crate::domain::llm::LlmSettings;
use crate::ports::{
    AIError, AIProvider, AIProviderFactory, CompletionRequest, CompletionResponse, FinishReason,
    MessageRole, ProviderInfo, TokenUsage,
};

/// Largest backoff exponent between retries (64s).
const MAX_BACKOFF_SHIFT: u32 = 6;

/// Base URL used when settings leave it unset.
pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

/// Configuration for the OpenAI provider.
#[derive(Debug, Clone)]
pub struct OpenAIConfig {
    /// API key for authentication.
    api_key: Secret<String>,
    /// Model to use (e.g., "gpt-5-mini").
    pub model: String,
    /// Base URL for the API, without the trailing `/chat/completions`.
    pub base_url: String,
    /// Request timeout.
    pub timeout: Duration,
    /// Maximum retries on transient failures.
    pub max_retries: u32,
}

impl OpenAIConfig {
    /// Creates a new configuration with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Secret::new(api_key.into()),
            model: "gpt-5-mini".to_string(),
            base_url: DEFAULT_OPENAI_BASE_URL.to_string(),
            timeout: Duration::from_secs(120),
            max_retries: 3,
        }
    }

    /// Builds a configuration from a settings snapshot.
    ///
    /// Returns `None` when the snapshot carries no API key.
    pub fn from_settings(settings: &LlmSettings) -> Option<Self> {
        let api_key = settings.api_key()?;
        let mut config = Self::new(api_key)
            .with_model(settings.model.clone())
            .with_timeout(settings.timeout)
            .with_max_retries(settings.max_retries);
        if let Some(url) = &settings.base_url {
            config = config.with_base_url(url.clone());
        }
        Some(config)
    }

    /// Sets the model to use.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Sets the base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the maximum retry count.
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Exposes the API key (for making requests).
    fn api_key(&self) -> &str {
        self.api_key.expose_secret()
    }
}

/// OpenAI-compatible API provider implementation.
pub struct OpenAIProvider {
    config: OpenAIConfig,
    client: Client,
}

impl OpenAIProvider {
    /// Creates a new OpenAI provider with the given configuration.
    pub fn new(config: OpenAIConfig) -> Result<Self, AIError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| AIError::InvalidRequest(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    /// Builds the chat completions endpoint URL.
    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.config.base_url)
    }

    /// Converts our request to OpenAI's format.
    fn to_openai_request(&self, request: &CompletionRequest) -> OpenAIRequest {
        let mut messages = Vec::new();

        if let Some(ref prompt) = request.system_prompt {
            messages.push(OpenAIMessage {
                role: "system".to_string(),
                content: Some(prompt.clone()),
            });
        }

        for msg in &request.messages {
            messages.push(OpenAIMessage {
                role: match msg.role {
                    MessageRole::System => "system",
                    MessageRole::User => "user",
                    MessageRole::Assistant => "assistant",
                }
                .to_string(),
                content: Some(msg.content.clone()),
            });
        }

        OpenAIRequest {
            model: self.config.model.clone(),
            messages,
            max_tokens: request.max_tokens,
            temperature: request.temperature,
        }
    }

    /// Sends a request and handles transport failures.
    async fn send_request(&self, request: &CompletionRequest) -> Result<Response, AIError> {
        let openai_request = self.to_openai_request(request);

        self.client
            .post(self.completions_url())
            .header("Authorization", format!("Bearer {}", self.config.api_key()))
            .header("Content-Type", "application/json")
            .json(&openai_request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    AIError::Timeout {
                        timeout_secs: self.config.timeout.as_secs() as u32,
                    }
                } else if e.is_connect() {
                    AIError::network(format!("Connection failed: {}", e))
                } else {
                    AIError::network(e.to_string())
                }
            })
    }

    /// Parses the API response status and handles errors.
    async fn handle_response_status(&self, response: Response) -> Result<Response, AIError> {
        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }

        let error_body = response.text().await.unwrap_or_default();

        match status.as_u16() {
            401 | 403 => Err(AIError::AuthenticationFailed),
            429 => Err(AIError::rate_limited(Self::parse_retry_after(&error_body))),
            400 => {
                if error_body.contains("maximum context length")
                    || error_body.contains("context_length_exceeded")
                {
                    Err(AIError::context_too_long(0, 0))
                } else {
                    Err(AIError::InvalidRequest(error_body))
                }
            }
            500..=599 => Err(AIError::unavailable(format!(
                "Server error {}: {}",
                status, error_body
            ))),
            _ => Err(AIError::network(format!(
                "Unexpected status {}: {}",
                status, error_body
            ))),
        }
    }

    /// Parses retry-after from error response, defaulting to 30 seconds.
    fn parse_retry_after(error_body: &str) -> u32 {
        let message = serde_json::from_str::<serde_json::Value>(error_body)
            .ok()
            .and_then(|v| v.get("error")?.get("message")?.as_str().map(str::to_string));

        if let Some(msg) = message {
            if let Some(idx) = msg.find("try again in ") {
                let rest = &msg[idx + 13..];
                let digits: String = rest.chars().take_while(|c| c.is_ascii_digit()).collect();
                if let Ok(secs) = digits.parse::<u32>() {
                    return secs;
                }
            }
        }
        30
    }

    /// Parses a completion response body.
    async fn parse_response(&self, response: Response) -> Result<CompletionResponse, AIError> {
        let response = self.handle_response_status(response).await?;

        let openai_response: OpenAIResponse = response
            .json()
            .await
            .map_err(|e| AIError::parse(format!("Failed to parse response: {}", e)))?;

        self.to_completion(openai_response)
    }

    fn to_completion(&self, openai_response: OpenAIResponse) -> Result<CompletionResponse, AIError> {
        let choice = openai_response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| AIError::parse("No choices in response"))?;

        let finish_reason = match choice.finish_reason.as_deref() {
            Some("length") => FinishReason::Length,
            Some("content_filter") => FinishReason::ContentFilter,
            _ => FinishReason::Stop,
        };

        let usage = openai_response
            .usage
            .map(|u| {
                TokenUsage::new(
                    u.prompt_tokens,
                    u.completion_tokens,
                    self.calculate_cost(u.prompt_tokens, u.completion_tokens),
                )
            })
            .unwrap_or_default();

        let content = choice.message.content.unwrap_or_default();
        if finish_reason == FinishReason::ContentFilter && content.trim().is_empty() {
            return Err(AIError::content_filtered("completion withheld by provider filter"));
        }

        Ok(CompletionResponse {
            content,
            usage,
            model: openai_response.model.unwrap_or_else(|| self.config.model.clone()),
            finish_reason,
        })
    }

    /// Calculates estimated cost in cents based on model and token counts.
    fn calculate_cost(&self, prompt_tokens: u32, completion_tokens: u32) -> u32 {
        // Prices per 1M tokens, in cents
        let (prompt_price, completion_price) = match self.config.model.as_str() {
            m if m.starts_with("gpt-5-mini") => (25, 200),
            m if m.starts_with("gpt-5") => (125, 1000),
            m if m.starts_with("gpt-4o-mini") => (15, 60),
            m if m.starts_with("gpt-4o") => (250, 1000),
            m if m.starts_with("claude-3-5-sonnet") => (300, 1500),
            _ => (250, 1000),
        };

        let prompt_cost = (prompt_tokens as u64 * prompt_price) / 1_000_000;
        let completion_cost = (completion_tokens as u64 * completion_price) / 1_000_000;

        (prompt_cost + completion_cost) as u32
    }
}

#[async_trait]
impl AIProvider for OpenAIProvider {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, AIError> {
        let mut last_error = AIError::network("No attempts made");
        let mut retry_count = 0;

        while retry_count <= self.config.max_retries {
            let attempt = match self.send_request(&request).await {
                Ok(response) => self.parse_response(response).await,
                Err(err) => Err(err),
            };

            match attempt {
                Ok(completion) => return Ok(completion),
                Err(err) => {
                    if !err.is_retryable() || retry_count >= self.config.max_retries {
                        return Err(err);
                    }
                    tracing::warn!(
                        model = %self.config.model,
                        retry = retry_count + 1,
                        error = %err,
                        "Completion attempt failed, retrying"
                    );
                    last_error = err;
                }
            }

            // Exponential backoff: 1s, 2s, 4s, ... capped at 64s
            let delay = Duration::from_secs(1u64 << retry_count.min(MAX_BACKOFF_SHIFT));
            sleep(delay).await;
            retry_count += 1;
        }

        Err(last_error)
    }

    fn provider_info(&self) -> ProviderInfo {
        let max_context = match self.config.model.as_str() {
            m if m.starts_with("gpt-5") => 400_000,
            m if m.starts_with("claude") => 200_000,
            _ => 128_000,
        };

        ProviderInfo::new("openai", &self.config.model, max_context)
    }
}

/// Builds [`OpenAIProvider`]s from settings snapshots.
#[derive(Debug, Clone, Copy, Default)]
pub struct OpenAIProviderFactory;

impl AIProviderFactory for OpenAIProviderFactory {
    fn build(&self, settings: &LlmSettings) -> Result<Arc<dyn AIProvider>, AIError> {
        let config = OpenAIConfig::from_settings(settings).ok_or(AIError::AuthenticationFailed)?;
        Ok(Arc::new(OpenAIProvider::new(config)?))
    }
}

// ----- OpenAI API Types -----

#[derive(Debug, Serialize)]
struct OpenAIRequest {
    model: String,
    messages: Vec<OpenAIMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Debug, Serialize, Deserialize)]
struct OpenAIMessage {
    role: String,
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpenAIResponse {
    #[serde(default)]
    model: Option<String>,
    choices: Vec<OpenAIChoice>,
    usage: Option<OpenAIUsage>,
}

#[derive(Debug, Deserialize)]
struct OpenAIChoice {
    message: OpenAIMessage,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpenAIUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::RequestMetadata;

    fn provider(model: &str) -> OpenAIProvider {
        OpenAIProvider::new(OpenAIConfig::new("test").with_model(model)).unwrap()
    }

    #[test]
    fn config_builder_works() {
        let config = OpenAIConfig::new("test-key")
            .with_model("gpt-4o")
            .with_base_url("https://custom.api.com/")
            .with_timeout(Duration::from_secs(30))
            .with_max_retries(5);

        assert_eq!(config.model, "gpt-4o");
        assert_eq!(config.base_url, "https://custom.api.com");
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.max_retries, 5);
        assert_eq!(config.api_key(), "test-key");
    }

    #[test]
    fn config_from_settings_requires_key() {
        assert!(OpenAIConfig::from_settings(&LlmSettings::new("gpt-5-mini")).is_none());

        let settings = LlmSettings::new("claude-3-5-sonnet-20241022")
            .with_api_key("sk-novita")
            .with_base_url("https://api.novita.ai/v3/openai")
            .with_max_retries(1);
        let config = OpenAIConfig::from_settings(&settings).unwrap();

        assert_eq!(config.api_key(), "sk-novita");
        assert_eq!(config.model, "claude-3-5-sonnet-20241022");
        assert_eq!(config.base_url, "https://api.novita.ai/v3/openai");
        assert_eq!(config.max_retries, 1);
    }

    #[test]
    fn config_from_settings_defaults_base_url() {
        let settings = LlmSettings::new("gpt-5-mini").with_api_key("sk");
        let config = OpenAIConfig::from_settings(&settings).unwrap();
        assert_eq!(config.base_url, DEFAULT_OPENAI_BASE_URL);
    }

    #[test]
    fn factory_rejects_missing_key() {
        let result = OpenAIProviderFactory.build(&LlmSettings::new("gpt-5-mini"));
        assert!(matches!(result, Err(AIError::AuthenticationFailed)));
    }

    #[test]
    fn completions_url_appends_path() {
        let provider = OpenAIProvider::new(
            OpenAIConfig::new("k").with_base_url("https://api.novita.ai/v3/openai"),
        )
        .unwrap();
        assert_eq!(
            provider.completions_url(),
            "https://api.novita.ai/v3/openai/chat/completions"
        );
    }

    #[test]
    fn request_puts_system_prompt_first() {
        let provider = provider("gpt-5-mini");
        let request = CompletionRequest::new(RequestMetadata::probe())
            .with_system_prompt("You are a researcher")
            .with_message(MessageRole::User, "Find the statute")
            .with_temperature(0.1)
            .with_max_tokens(4096);

        let body = serde_json::to_value(provider.to_openai_request(&request)).unwrap();

        assert_eq!(body["model"], "gpt-5-mini");
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][0]["content"], "You are a researcher");
        assert_eq!(body["messages"][1]["role"], "user");
        assert_eq!(body["max_tokens"], 4096);
        assert!(body.get("stream").is_none());
    }

    #[test]
    fn response_maps_usage_and_finish_reason() {
        let provider = provider("gpt-5-mini");
        let raw: OpenAIResponse = serde_json::from_str(
            r#"{"model":"gpt-5-mini","choices":[{"message":{"role":"assistant","content":"Memo"},"finish_reason":"length"}],"usage":{"prompt_tokens":10,"completion_tokens":5}}"#,
        )
        .unwrap();

        let completion = provider.to_completion(raw).unwrap();
        assert_eq!(completion.content, "Memo");
        assert_eq!(completion.finish_reason, FinishReason::Length);
        assert_eq!(completion.usage.total_tokens, 15);
    }

    #[test]
    fn response_without_content_or_model_is_tolerated() {
        let provider = provider("gpt-5-mini");
        let raw: OpenAIResponse = serde_json::from_str(
            r#"{"choices":[{"message":{"role":"assistant","content":null},"finish_reason":"stop"}]}"#,
        )
        .unwrap();

        let completion = provider.to_completion(raw).unwrap();
        assert_eq!(completion.content, "");
        assert_eq!(completion.model, "gpt-5-mini");
        assert_eq!(completion.usage, TokenUsage::zero());
    }

    #[test]
    fn filtered_empty_response_is_content_filtered_error() {
        let provider = provider("gpt-5-mini");
        let raw: OpenAIResponse = serde_json::from_str(
            r#"{"choices":[{"message":{"role":"assistant","content":null},"finish_reason":"content_filter"}]}"#,
        )
        .unwrap();

        let err = provider.to_completion(raw).unwrap_err();
        assert!(matches!(err, AIError::ContentFiltered { .. }));
        assert!(!err.is_retryable());
    }

    #[test]
    fn filtered_partial_response_keeps_content() {
        let provider = provider("gpt-5-mini");
        let raw: OpenAIResponse = serde_json::from_str(
            r#"{"choices":[{"message":{"role":"assistant","content":"Partial memo"},"finish_reason":"content_filter"}]}"#,
        )
        .unwrap();

        let completion = provider.to_completion(raw).unwrap();
        assert_eq!(completion.content, "Partial memo");
        assert_eq!(completion.finish_reason, FinishReason::ContentFilter);
    }

    #[test]
    fn response_without_choices_is_parse_error() {
        let provider = provider("gpt-5-mini");
        let raw: OpenAIResponse = serde_json::from_str(r#"{"choices":[]}"#).unwrap();
        assert!(matches!(provider.to_completion(raw), Err(AIError::Parse(_))));
    }

    #[test]
    fn cost_calculation_gpt5_mini() {
        // 1M prompt = 25 cents, 1M completion = 200 cents
        let cost = provider("gpt-5-mini").calculate_cost(1_000_000, 500_000);
        assert_eq!(cost, 125);
    }

    #[test]
    fn provider_info_reports_model() {
        let info = provider("gpt-5-mini").provider_info();
        assert_eq!(info.name, "openai");
        assert_eq!(info.model, "gpt-5-mini");
        assert_eq!(info.max_context_tokens, 400_000);
    }

    #[test]
    fn parse_retry_after_from_message() {
        let error = r#"{"error":{"message":"Rate limit exceeded. Please try again in 30 seconds."}}"#;
        assert_eq!(OpenAIProvider::parse_retry_after(error), 30);

        let error = r#"{"error":{"message":"Please try again in 7s."}}"#;
        assert_eq!(OpenAIProvider::parse_retry_after(error), 7);
    }

    #[test]
    fn parse_retry_after_default() {
        let error = r#"{"error":{"message":"Something went wrong"}}"#;
        assert_eq!(OpenAIProvider::parse_retry_after(error), 30);
        assert_eq!(OpenAIProvider::parse_retry_after("not json"), 30);
    }
}
