//! Provider Factory Port - builds completion engines from a settings snapshot.
//!
//! Engines are built per invocation so that an administrative reconfiguration
//! takes effect on the next request without restarting.

use std::sync::Arc;

use super::ai_provider::{AIError, AIProvider};
use crate::domain::llm::LlmSettings;

/// Builds an [`AIProvider`] bound to one [`LlmSettings`] snapshot.
pub trait AIProviderFactory: Send + Sync {
    /// Returns a provider using `settings` for every call it makes.
    ///
    /// Fails with [`AIError::AuthenticationFailed`] when no key is configured,
    /// or [`AIError::InvalidRequest`] when the HTTP client cannot be built.
    fn build(&self, settings: &LlmSettings) -> Result<Arc<dyn AIProvider>, AIError>;
}
