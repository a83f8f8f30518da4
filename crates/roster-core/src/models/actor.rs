//! Acting user and permission model.
//!
//! Permissions are carried explicitly by an [`Actor`] passed into commit
//! operations; the engine never reads ambient role state.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Operational role ladder, least to most privileged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Read-only operations staff
    Operator,
    /// Planning analyst; may edit assignments
    Analyst,
    /// Dispatch desk; may additionally adjust and confirm trips
    Dispatcher,
    /// Sector manager
    Manager,
    /// Operations director
    Director,
    /// System administrator
    Administrator,
}

impl Role {
    /// Rank within the ladder; higher outranks lower.
    #[must_use]
    pub const fn rank(self) -> u8 {
        match self {
            Self::Operator => 1,
            Self::Analyst => 2,
            Self::Dispatcher => 3,
            Self::Manager => 4,
            Self::Director => 5,
            Self::Administrator => 6,
        }
    }

    /// True when this role ranks at least as high as `other`.
    #[must_use]
    pub const fn outranks_or_equals(self, other: Self) -> bool {
        self.rank() >= other.rank()
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Operator => "operator",
            Self::Analyst => "analyst",
            Self::Dispatcher => "dispatcher",
            Self::Manager => "manager",
            Self::Director => "director",
            Self::Administrator => "administrator",
        };
        f.write_str(label)
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "operator" => Ok(Self::Operator),
            "analyst" => Ok(Self::Analyst),
            "dispatcher" => Ok(Self::Dispatcher),
            "manager" => Ok(Self::Manager),
            "director" => Ok(Self::Director),
            "administrator" | "admin" => Ok(Self::Administrator),
            other => Err(format!("unknown role: {other}")),
        }
    }
}

/// The two commit tracks, authorized independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EditCategory {
    /// Vehicle/crew substitutions and notes; may cascade downstream
    Propagable,
    /// Per-trip time adjustments, delay reasons, and confirmation
    Adjustment,
}

impl fmt::Display for EditCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Propagable => f.write_str("propagable"),
            Self::Adjustment => f.write_str("adjustment"),
        }
    }
}

/// The user on whose behalf a commit runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    /// Display name recorded in the audit trail
    pub name: String,
    /// Email recorded in the audit trail
    pub email: String,
    /// Operational role
    pub role: Role,
}

impl Actor {
    /// Create an actor from audit identity and role.
    pub fn new(name: impl Into<String>, email: impl Into<String>, role: Role) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            role,
        }
    }

    /// Whether this actor may submit updates in the given category.
    ///
    /// Adjustment writes require a role at least as strict as propagable
    /// ones: every role allowed to adjust is also allowed to propagate.
    #[must_use]
    pub const fn may_edit(&self, category: EditCategory) -> bool {
        match category {
            EditCategory::Propagable => self.role.outranks_or_equals(Role::Analyst),
            EditCategory::Adjustment => self.role.outranks_or_equals(Role::Dispatcher),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_ladder_is_strictly_ordered() {
        assert!(Role::Administrator.outranks_or_equals(Role::Operator));
        assert!(Role::Dispatcher.outranks_or_equals(Role::Analyst));
        assert!(!Role::Analyst.outranks_or_equals(Role::Dispatcher));
    }

    #[test]
    fn adjustment_permission_implies_propagable() {
        for role in [
            Role::Operator,
            Role::Analyst,
            Role::Dispatcher,
            Role::Manager,
            Role::Director,
            Role::Administrator,
        ] {
            let actor = Actor::new("A", "a@example.com", role);
            if actor.may_edit(EditCategory::Adjustment) {
                assert!(actor.may_edit(EditCategory::Propagable));
            }
        }
    }

    #[test]
    fn analyst_may_propagate_but_not_adjust() {
        let actor = Actor::new("A", "a@example.com", Role::Analyst);
        assert!(actor.may_edit(EditCategory::Propagable));
        assert!(!actor.may_edit(EditCategory::Adjustment));
    }

    #[test]
    fn role_parses_case_insensitively() {
        assert_eq!("Dispatcher".parse::<Role>(), Ok(Role::Dispatcher));
        assert_eq!("ADMIN".parse::<Role>(), Ok(Role::Administrator));
        assert!("supervisor".parse::<Role>().is_err());
    }
}
