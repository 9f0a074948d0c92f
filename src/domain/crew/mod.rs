//! Crew Domain Module
//!
//! Pure decision logic for the legal crew: the closed role set, persona text,
//! task rendering, keyword classification, and pipeline planning.
//!
//! # Example
//!
//! ```
//! use lawyrs_crew::domain::crew::{classify, plan_full_crew, Jurisdiction, PipelineRequest, Role};
//!
//! assert_eq!(classify("Please draft a motion to compel"), Role::Drafter);
//!
//! let request = PipelineRequest::new("Assess our exposure", Jurisdiction::Kansas).full_pipeline();
//! assert_eq!(plan_full_crew(&request).len(), 3);
//! ```

pub mod classifier;
pub mod errors;
pub mod jurisdiction;
pub mod persona;
pub mod pipeline;
pub mod role;
pub mod task;

pub use classifier::{classify, score, RoleScores};
pub use errors::UnknownRole;
pub use jurisdiction::Jurisdiction;
pub use persona::Persona;
pub use pipeline::{plan_full_crew, PipelineId, PipelineRequest, PipelineResult, RunUsage};
pub use role::Role;
pub use task::{build_task, TaskSpec};
