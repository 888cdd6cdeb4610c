//! User role enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Roles available to platform users.
///
/// Roles are ordered by privilege level:
/// SuperAdmin > Admin > Teacher > Student > Guest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    /// Signed up, no role granted yet.
    Guest,
    /// Enrolled learner.
    Student,
    /// Instructor; may schedule and host live sessions.
    Teacher,
    /// Platform moderator.
    Admin,
    /// Full system administrator.
    SuperAdmin,
}

impl UserRole {
    /// Return the privilege level (higher = more privileged).
    pub fn privilege_level(&self) -> u8 {
        match self {
            Self::Guest => 0,
            Self::Student => 1,
            Self::Teacher => 2,
            Self::Admin => 3,
            Self::SuperAdmin => 4,
        }
    }

    /// Check if this role has at least the given role's privileges.
    pub fn has_at_least(&self, other: &UserRole) -> bool {
        self.privilege_level() >= other.privilege_level()
    }

    /// The "no role yet" state that free enrollment promotes from.
    pub fn is_baseline(&self) -> bool {
        matches!(self, Self::Guest)
    }

    /// Whether this role may schedule and host live sessions.
    pub fn can_host_sessions(&self) -> bool {
        self.has_at_least(&Self::Teacher)
    }

    /// Whether this role may moderate enrollments and sessions it does not own.
    pub fn can_moderate(&self) -> bool {
        self.has_at_least(&Self::Admin)
    }

    /// Return the role as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Guest => "guest",
            Self::Student => "student",
            Self::Teacher => "teacher",
            Self::Admin => "admin",
            Self::SuperAdmin => "superadmin",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = classgate_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "guest" => Ok(Self::Guest),
            "student" => Ok(Self::Student),
            "teacher" => Ok(Self::Teacher),
            "admin" => Ok(Self::Admin),
            "superadmin" => Ok(Self::SuperAdmin),
            _ => Err(classgate_core::AppError::invalid_input(format!(
                "Invalid user role: '{s}'. Expected one of: guest, student, teacher, admin, superadmin"
            ))),
        }
    }
}
