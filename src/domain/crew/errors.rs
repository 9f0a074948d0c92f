//! Error types for the crew domain

/// A role tag outside the closed role set.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
#[error("Unknown role '{0}': expected researcher, analyst, drafter, or strategist")]
pub struct UnknownRole(pub String);
