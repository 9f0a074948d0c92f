//! Application handlers.
//!
//! Command and query handlers that orchestrate domain operations.

pub mod crew;

pub use crew::{
    CheckLlmHealthHandler, GetLlmConfigHandler, HealthReport, LlmConfigView, ReconfigureError,
    ReconfigureLlmCommand, ReconfigureLlmHandler, ReconfigureLlmResult, RunCrewError,
    RunCrewHandler,
};
