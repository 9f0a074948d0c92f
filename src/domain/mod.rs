//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `crew` - Roles, classification, task rendering, and pipeline contracts
//! - `llm` - Process-wide completion-engine settings and their hot-swap holder

pub mod crew;
pub mod llm;
