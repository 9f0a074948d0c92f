//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `ai` - Completion engine providers (OpenAI-compatible, mock)
//! - `http` - Axum REST endpoints

pub mod ai;
pub mod http;

pub use ai::{MockAIProvider, MockProviderFactory, OpenAIProvider, OpenAIProviderFactory};
pub use http::{crew_router, CrewAppState};
