//! HTTP adapters - REST API implementations.

pub mod crew;

pub use crew::routes as crew_router;
pub use crew::CrewAppState;
