//! HTTP adapters for the legal crew
//!
//! Exposes REST API endpoints for chat, classification, and engine configuration.

pub mod dto;
pub mod handlers;
pub mod routes;

pub use dto::*;
pub use handlers::CrewAppState;
pub use routes::routes;
