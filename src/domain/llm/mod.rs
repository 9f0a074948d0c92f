//! Completion-engine settings shared across requests.

mod settings;

pub use settings::{LlmSettings, LlmSettingsStore, LlmSettingsUpdate};
