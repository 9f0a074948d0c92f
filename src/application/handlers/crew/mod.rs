//! Crew Command and Query Handlers
//!
//! ## Commands
//! - `RunCrew` - Route a query through one role or the full crew pipeline
//! - `ReconfigureLlm` - Replace completion engine credentials at runtime
//!
//! ## Queries
//! - `CheckLlmHealth` - Verify the completion engine answers
//! - `GetLlmConfig` - Redacted view of the current engine settings

mod check_llm_health;
mod get_llm_config;
mod reconfigure_llm;
mod run_crew;

pub use check_llm_health::{CheckLlmHealthHandler, HealthReport};
pub use get_llm_config::{GetLlmConfigHandler, LlmConfigView};
pub use reconfigure_llm::{
    ReconfigureError, ReconfigureLlmCommand, ReconfigureLlmHandler, ReconfigureLlmResult,
};
pub use run_crew::{RunCrewError, RunCrewHandler};
