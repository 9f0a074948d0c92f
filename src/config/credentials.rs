//! Credential resolution for the completion engine.
//!
//! Sources, lowest priority first:
//! 1. `OPENAI_API_KEY`, `OPENAI_BASE_URL`, `CREWAI_MODEL`
//! 2. the YAML credentials file (`openai: {api_key, base_url}`)
//! 3. `NOVITA_API_KEY` / `NOVITA_BASE_URL`, only when no key was found yet
//! 4. explicit `LAWYRS_CREW__LLM__*` values from [`LlmConfig`]
//!
//! Resolution is pure over an environment lookup so it can be tested without
//! touching the process environment.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use super::llm::LlmConfig;
use crate::domain::llm::LlmSettings;

pub const DEFAULT_MODEL: &str = "gpt-5-mini";
pub const NOVITA_DEFAULT_BASE_URL: &str = "https://api.novita.ai/v3/openai";
pub const NOVITA_DEFAULT_MODEL: &str = "claude-3-5-sonnet-20241022";
const CREDENTIALS_FILE_NAME: &str = ".genspark_llm.yaml";

/// Parsed YAML credentials file.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct CredentialsFile {
    #[serde(default)]
    pub openai: Option<OpenAICredentials>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct OpenAICredentials {
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub base_url: Option<String>,
}

impl CredentialsFile {
    /// Parses YAML text.
    pub fn parse(text: &str) -> Result<Self, serde_yaml::Error> {
        // An empty document deserializes as unit, not a map.
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(text)
    }

    /// Reads `path`, returning `None` when it is missing or unusable.
    ///
    /// Unreadable or malformed files are logged and skipped.
    pub fn load(path: &Path) -> Option<Self> {
        if !path.exists() {
            return None;
        }
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %err,
                    "Cannot read credentials file"
                );
                return None;
            }
        };
        match Self::parse(&text) {
            Ok(file) => Some(file),
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "Malformed credentials file");
                None
            }
        }
    }
}

/// Default credentials file location under `home`.
pub fn default_credentials_path(home: Option<&str>) -> Option<PathBuf> {
    home.filter(|h| !h.is_empty())
        .map(|h| Path::new(h).join(CREDENTIALS_FILE_NAME))
}

/// Rejects empty values and unexpanded `${...}` templates.
fn usable(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty() && !v.starts_with("${"))
}

/// Resolves [`LlmSettings`] from every credential source.
///
/// `env` looks up a process environment variable; empty values count as unset.
pub fn resolve_llm_settings<F>(
    config: &LlmConfig,
    env: F,
    credentials: Option<&CredentialsFile>,
) -> LlmSettings
where
    F: Fn(&str) -> Option<String>,
{
    let var = |name: &str| env(name).filter(|v| !v.is_empty());

    let mut api_key = var("OPENAI_API_KEY");
    let mut base_url = var("OPENAI_BASE_URL");
    let mut model = var("CREWAI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string());

    if let Some(openai) = credentials.and_then(|c| c.openai.as_ref()) {
        if let Some(key) = usable(openai.api_key.as_deref()) {
            api_key = Some(key.to_string());
        }
        if let Some(url) = usable(openai.base_url.as_deref()) {
            base_url = Some(url.to_string());
        }
    }

    if api_key.is_none() {
        if let Some(novita_key) = var("NOVITA_API_KEY") {
            api_key = Some(novita_key);
            base_url = Some(
                var("NOVITA_BASE_URL").unwrap_or_else(|| NOVITA_DEFAULT_BASE_URL.to_string()),
            );
            model = var("CREWAI_MODEL").unwrap_or_else(|| NOVITA_DEFAULT_MODEL.to_string());
        }
    }

    if let Some(key) = usable(config.api_key.as_deref()) {
        api_key = Some(key.to_string());
    }
    if let Some(url) = usable(config.base_url.as_deref()) {
        base_url = Some(url.to_string());
    }
    if let Some(m) = usable(config.model.as_deref()) {
        model = m.to_string();
    }

    let mut settings = LlmSettings::new(model)
        .with_temperature(config.temperature)
        .with_max_tokens(config.max_tokens)
        .with_timeout(config.timeout())
        .with_max_retries(config.max_retries);
    if let Some(key) = api_key {
        settings = settings.with_api_key(key);
    }
    if let Some(url) = base_url {
        settings = settings.with_base_url(url);
    }
    settings
}

/// Resolves settings from the real process environment and credentials file.
pub fn resolve_from_environment(config: &LlmConfig) -> LlmSettings {
    let path = config
        .credentials_file
        .clone()
        .or_else(|| default_credentials_path(std::env::var("HOME").ok().as_deref()));
    let credentials = path.as_deref().and_then(CredentialsFile::load);

    resolve_llm_settings(config, |name| std::env::var(name).ok(), credentials.as_ref())
}
