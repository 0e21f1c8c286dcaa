//! User roles recognised by the platform.
//!
//! Roles travel as lowercase strings: in login responses, in the persisted
//! session file, and in the `role` field of the registration payload.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::navigation::View;

/// Role attached to an authenticated session.
///
/// `Admin` satisfies every role requirement; the other roles only satisfy
/// themselves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Learner account.
    Student,
    /// Instructor account.
    Teacher,
    /// Administrative account with access to every view.
    Admin,
}

impl Role {
    /// Wire representation of the role.
    ///
    /// # Examples
    /// ```
    /// use amep_client::domain::Role;
    ///
    /// assert_eq!(Role::Teacher.as_str(), "teacher");
    /// ```
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Student => "student",
            Self::Teacher => "teacher",
            Self::Admin => "admin",
        }
    }

    /// Whether a session holding `self` may open a view restricted to
    /// `expected`.
    #[must_use]
    pub fn satisfies(self, expected: Self) -> bool {
        self == Self::Admin || self == expected
    }

    /// Default view a user with this role lands on.
    #[must_use]
    pub const fn landing_view(self) -> View {
        match self {
            Self::Student => View::StudentDashboard,
            Self::Teacher => View::TeacherDashboard,
            Self::Admin => View::Landing,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raised when a role string is not one of the known roles.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown role '{value}'")]
pub struct RoleParseError {
    value: String,
}

impl FromStr for Role {
    type Err = RoleParseError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "student" => Ok(Self::Student),
            "teacher" => Ok(Self::Teacher),
            "admin" => Ok(Self::Admin),
            _ => Err(RoleParseError {
                value: raw.to_owned(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for role parsing and access rules.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("student", Role::Student)]
    #[case("Teacher", Role::Teacher)]
    #[case(" admin ", Role::Admin)]
    fn parses_known_roles(#[case] raw: &str, #[case] expected: Role) {
        assert_eq!(raw.parse::<Role>(), Ok(expected));
    }

    #[test]
    fn rejects_unknown_roles() {
        let err = "parent".parse::<Role>().expect_err("parent is not a role");
        assert_eq!(err.to_string(), "unknown role 'parent'");
    }

    #[rstest]
    #[case(Role::Student, Role::Student, true)]
    #[case(Role::Student, Role::Teacher, false)]
    #[case(Role::Teacher, Role::Student, false)]
    #[case(Role::Teacher, Role::Teacher, true)]
    #[case(Role::Admin, Role::Student, true)]
    #[case(Role::Admin, Role::Teacher, true)]
    fn admin_satisfies_every_role(
        #[case] held: Role,
        #[case] expected: Role,
        #[case] allowed: bool,
    ) {
        assert_eq!(held.satisfies(expected), allowed);
    }

    #[test]
    fn serialises_as_lowercase() {
        let json = serde_json::to_string(&Role::Teacher).expect("serialise role");
        assert_eq!(json, "\"teacher\"");
    }
}
