//! Role domain model.
//!
//! Roles are a closed enumeration. External data (the role-assignment
//! collection stores strings) is parsed through [`Role::parse`] at the
//! boundary; unknown values never propagate inward as strings.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ChanceryError;

/// Coarse privilege label, orthogonal to world membership.
///
/// A principal may hold several roles at once (e.g. `Editor` alongside
/// `SuperAdmin`). `SuperAdmin` gates global surfaces only — it does
/// not imply access to any particular world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    SuperAdmin,
    Admin,
    Editor,
    Viewer,
}

impl Role {
    /// Parse an external role string, rejecting unknown values.
    pub fn parse(s: &str) -> Result<Role, ChanceryError> {
        match s {
            "SuperAdmin" => Ok(Role::SuperAdmin),
            "Admin" => Ok(Role::Admin),
            "Editor" => Ok(Role::Editor),
            "Viewer" => Ok(Role::Viewer),
            other => Err(ChanceryError::UnknownRole {
                value: other.to_string(),
            }),
        }
    }

    /// Stable storage representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::SuperAdmin => "SuperAdmin",
            Role::Admin => "Admin",
            Role::Editor => "Editor",
            Role::Viewer => "Viewer",
        }
    }
}

impl FromStr for Role {
    type Err = ChanceryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::parse(s)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_round_trips_known_roles() {
        for role in [Role::SuperAdmin, Role::Admin, Role::Editor, Role::Viewer] {
            assert_eq!(Role::parse(role.as_str()).unwrap(), role);
        }
    }

    #[test]
    fn unknown_role_strings_are_rejected() {
        for value in ["superadmin", "root", "", "Editor "] {
            assert!(Role::parse(value).is_err(), "{value:?} should be rejected");
        }
    }
}
