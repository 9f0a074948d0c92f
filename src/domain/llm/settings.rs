//! LLM settings and the hot-swappable holder.
//!
//! Every pipeline invocation takes one snapshot via [`LlmSettingsStore::current`].
//! Reconfiguration replaces the whole snapshot; last write wins and runs that
//! already took a snapshot keep theirs.

use secrecy::{ExposeSecret, Secret};
use std::sync::{Arc, RwLock};
use std::time::Duration;

const REDACTED_URL_LEN: usize = 60;

/// Resolved completion-engine configuration.
#[derive(Debug, Clone)]
pub struct LlmSettings {
    api_key: Option<Secret<String>>,
    /// OpenAI-compatible base URL; `None` uses the provider default.
    pub base_url: Option<String>,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub timeout: Duration,
    /// Retries performed by the completion engine adapter.
    pub max_retries: u32,
}

impl LlmSettings {
    /// Creates settings for `model` with no credentials.
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            api_key: None,
            base_url: None,
            model: model.into(),
            temperature: 0.1,
            max_tokens: 4096,
            timeout: Duration::from_secs(120),
            max_retries: 3,
        }
    }

    /// Sets the API key. Empty keys count as absent.
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        let key = api_key.into();
        self.api_key = if key.is_empty() {
            None
        } else {
            Some(Secret::new(key))
        };
        self
    }

    /// Sets the base URL. Empty URLs count as absent.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        let url = base_url.into();
        self.base_url = if url.is_empty() { None } else { Some(url) };
        self
    }

    /// Sets sampling temperature.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Sets the generation cap.
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Sets the HTTP timeout used by the engine adapter.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the engine adapter's retry budget.
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Returns true if an API key is configured.
    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// Exposes the API key (for making requests).
    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_ref().map(|k| k.expose_secret().as_str())
    }

    /// Base URL safe for logs and responses: truncated past 60 characters.
    pub fn redacted_base_url(&self) -> String {
        let url = self.base_url.as_deref().unwrap_or_default();
        if url.chars().count() > REDACTED_URL_LEN {
            let head: String = url.chars().take(REDACTED_URL_LEN).collect();
            format!("{head}...")
        } else {
            url.to_string()
        }
    }

    /// Applies an administrative update, keeping fields it leaves unset or empty.
    pub fn updated(&self, update: &LlmSettingsUpdate) -> Self {
        let mut next = self.clone().with_api_key(update.api_key.clone());
        if let Some(url) = update.base_url.as_ref().filter(|u| !u.is_empty()) {
            next = next.with_base_url(url.clone());
        }
        if let Some(model) = update.model.as_ref().filter(|m| !m.is_empty()) {
            next.model = model.clone();
        }
        next
    }
}

/// Administrative reconfiguration request.
#[derive(Debug, Clone)]
pub struct LlmSettingsUpdate {
    pub api_key: String,
    pub base_url: Option<String>,
    pub model: Option<String>,
}

/// Process-wide holder for the current [`LlmSettings`].
#[derive(Debug)]
pub struct LlmSettingsStore {
    current: RwLock<Arc<LlmSettings>>,
}

impl LlmSettingsStore {
    /// Creates a store seeded with `initial`.
    pub fn new(initial: LlmSettings) -> Self {
        Self {
            current: RwLock::new(Arc::new(initial)),
        }
    }

    /// Returns the current snapshot.
    pub fn current(&self) -> Arc<LlmSettings> {
        let guard = self.current.read().unwrap_or_else(|e| e.into_inner());
        Arc::clone(&guard)
    }

    /// Replaces the snapshot wholesale.
    pub fn replace(&self, settings: LlmSettings) -> Arc<LlmSettings> {
        let next = Arc::new(settings);
        let mut guard = self.current.write().unwrap_or_else(|e| e.into_inner());
        *guard = Arc::clone(&next);
        next
    }

    /// Applies `update` on top of the current snapshot.
    pub fn apply(&self, update: &LlmSettingsUpdate) -> Arc<LlmSettings> {
        let mut guard = self.current.write().unwrap_or_else(|e| e.into_inner());
        let next = Arc::new(guard.updated(update));
        *guard = Arc::clone(&next);
        next
    }
}
