//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `LAWYRS_CREW` prefix and nested values use double underscores as separators.
//!
//! Completion engine credentials are resolved separately by
//! [`credentials::resolve_from_environment`], which also honours the
//! conventional `OPENAI_*` / `NOVITA_*` variables.
//!
//! # Example
//!
//! ```no_run
//! use lawyrs_crew::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Server running on {:?}", config.server.socket_addr());
//! ```

pub mod credentials;
mod error;
mod llm;
mod server;

pub use credentials::{resolve_from_environment, resolve_llm_settings, CredentialsFile};
pub use error::{ConfigError, ValidationError};
pub use llm::LlmConfig;
pub use server::{Environment, ServerConfig};

use serde::Deserialize;

use crate::domain::llm::LlmSettings;

/// Root application configuration
///
/// Load using [`AppConfig::load()`] which reads from environment variables.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Server configuration (host, port, environment)
    #[serde(default)]
    pub server: ServerConfig,

    /// Completion engine tunables and overrides
    #[serde(default)]
    pub llm: LlmConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `LAWYRS_CREW` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `LAWYRS_CREW__SERVER__PORT=8100` -> `server.port = 8100`
    /// - `LAWYRS_CREW__LLM__MODEL=gpt-5-mini` -> `llm.model = gpt-5-mini`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("LAWYRS_CREW")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.llm.validate()?;
        Ok(())
    }

    /// Resolves the initial completion engine settings.
    pub fn llm_settings(&self) -> LlmSettings {
        resolve_from_environment(&self.llm)
    }

    /// Check if running in production environment
    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}
