//! AI Provider Adapters.
//!
//! Implementations of the AIProvider port.
//!
//! ## Available Adapters
//!
//! - `OpenAIProvider` - Any OpenAI-compatible chat completions backend
//! - `OpenAIProviderFactory` - Builds `OpenAIProvider`s from settings snapshots
//! - `MockAIProvider` / `MockProviderFactory` - Configurable mocks for testing

mod mock_provider;
mod openai_provider;

pub use mock_provider::{BuiltWith, MockAIProvider, MockError, MockProviderFactory, MockResponse};
pub use openai_provider::{
    OpenAIConfig, OpenAIProvider, OpenAIProviderFactory, DEFAULT_OPENAI_BASE_URL,
};
