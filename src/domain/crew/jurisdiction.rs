//! Jurisdiction venue tags.
//!
//! A jurisdiction only changes rendered instruction text. Unknown tags are
//! carried verbatim so callers can name venues outside the lookup table.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Venue the query should be answered under.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Jurisdiction {
    Kansas,
    #[default]
    Missouri,
    Federal,
    Multistate,
    /// Unmapped tag, case preserved.
    Other(String),
}

impl Jurisdiction {
    /// Parses a tag, case-insensitive for the known venues.
    pub fn parse(raw: &str) -> Self {
        match raw.to_lowercase().as_str() {
            "kansas" => Jurisdiction::Kansas,
            "missouri" => Jurisdiction::Missouri,
            "federal" => Jurisdiction::Federal,
            "multistate" => Jurisdiction::Multistate,
            _ => Jurisdiction::Other(raw.to_string()),
        }
    }

    /// Returns the tag echoed back to callers.
    pub fn as_tag(&self) -> &str {
        match self {
            Jurisdiction::Kansas => "kansas",
            Jurisdiction::Missouri => "missouri",
            Jurisdiction::Federal => "federal",
            Jurisdiction::Multistate => "multistate",
            Jurisdiction::Other(raw) => raw,
        }
    }

    /// Returns the name rendered into task instructions.
    pub fn display_name(&self) -> &str {
        match self {
            Jurisdiction::Kansas => "Kansas",
            Jurisdiction::Missouri => "Missouri",
            Jurisdiction::Federal => "Federal",
            Jurisdiction::Multistate => "Kansas & Missouri",
            Jurisdiction::Other(raw) => raw,
        }
    }
}

impl fmt::Display for Jurisdiction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl From<String> for Jurisdiction {
    fn from(raw: String) -> Self {
        Jurisdiction::parse(&raw)
    }
}

impl From<&str> for Jurisdiction {
    fn from(raw: &str) -> Self {
        Jurisdiction::parse(raw)
    }
}

impl From<Jurisdiction> for String {
    fn from(jurisdiction: Jurisdiction) -> Self {
        jurisdiction.as_tag().to_string()
    }
}
