//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! ## Completion Engine Ports
//!
//! - `AIProvider` - One chat completion against an OpenAI-compatible backend
//! - `AIProviderFactory` - Builds a provider from the current settings snapshot

mod ai_provider;
mod provider_factory;

pub use ai_provider::{
    AIError, AIProvider, CompletionRequest, CompletionResponse, FinishReason, Message,
    MessageRole, ProviderInfo, RequestMetadata, TokenUsage,
};
pub use provider_factory::AIProviderFactory;
