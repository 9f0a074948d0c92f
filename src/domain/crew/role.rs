//! Role enum representing the 4 crew specialists.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::errors::UnknownRole;
use super::persona::{self, Persona};

/// The 4 crew specialists, in canonical enumeration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Researcher,
    Analyst,
    Drafter,
    Strategist,
}

impl Role {
    /// Returns all roles in canonical order.
    ///
    /// Classification tie-breaks follow this order.
    pub fn all() -> &'static [Role] {
        &[
            Role::Researcher,
            Role::Analyst,
            Role::Drafter,
            Role::Strategist,
        ]
    }

    /// Returns the lowercase wire tag.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Researcher => "researcher",
            Role::Analyst => "analyst",
            Role::Drafter => "drafter",
            Role::Strategist => "strategist",
        }
    }

    /// Returns the persona this role runs under.
    pub fn persona(&self) -> &'static Persona {
        match self {
            Role::Researcher => &persona::RESEARCHER,
            Role::Analyst => &persona::ANALYST,
            Role::Drafter => &persona::DRAFTER,
            Role::Strategist => &persona::STRATEGIST,
        }
    }

    /// Returns the persona goal text.
    pub fn goal(&self) -> &'static str {
        self.persona().goal
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "researcher" => Ok(Role::Researcher),
            "analyst" => Ok(Role::Analyst),
            "drafter" => Ok(Role::Drafter),
            "strategist" => Ok(Role::Strategist),
            other => Err(UnknownRole(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_returns_4_roles_in_order() {
        let all = Role::all();
        assert_eq!(all.len(), 4);
        assert_eq!(all[0], Role::Researcher);
        assert_eq!(all[1], Role::Analyst);
        assert_eq!(all[2], Role::Drafter);
        assert_eq!(all[3], Role::Strategist);
    }

    #[test]
    fn from_str_round_trips_every_tag() {
        for role in Role::all() {
            assert_eq!(role.as_str().parse::<Role>().unwrap(), *role);
        }
    }

    #[test]
    fn from_str_rejects_unknown_tag() {
        let err = "paralegal".parse::<Role>().unwrap_err();
        assert_eq!(err, UnknownRole("paralegal".to_string()));
    }

    #[test]
    fn from_str_is_case_sensitive() {
        assert!("Researcher".parse::<Role>().is_err());
    }

    #[test]
    fn serializes_lowercase() {
        let json = serde_json::to_string(&Role::Strategist).unwrap();
        assert_eq!(json, "\"strategist\"");

        let role: Role = serde_json::from_str("\"drafter\"").unwrap();
        assert_eq!(role, Role::Drafter);
    }

    #[test]
    fn each_role_has_distinct_persona() {
        assert_eq!(Role::Researcher.persona().title, "Researcher Agent");
        assert_eq!(Role::Analyst.persona().title, "Analyst Agent");
        assert_eq!(Role::Drafter.persona().title, "Drafter Agent");
        assert_eq!(Role::Strategist.persona().title, "Strategist Agent");
    }
}
