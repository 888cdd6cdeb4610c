//! Enrollment status and type enumerations.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use classgate_core::AppError;

/// Status of a user's enrollment in a course.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnrollmentStatus {
    /// Awaiting moderation.
    Pending,
    /// Access granted.
    Approved,
    /// Course finished.
    Completed,
    /// Request declined or expired.
    Rejected,
}

impl EnrollmentStatus {
    /// Whether this status already grants course access.
    pub fn is_active_grant(&self) -> bool {
        matches!(self, Self::Approved | Self::Completed)
    }

    /// Return the status as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Completed => "completed",
            Self::Rejected => "rejected",
        }
    }
}

impl fmt::Display for EnrollmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EnrollmentStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "approved" => Ok(Self::Approved),
            "completed" => Ok(Self::Completed),
            "rejected" => Ok(Self::Rejected),
            other => Err(AppError::invalid_input(format!(
                "Unknown enrollment status: '{other}'"
            ))),
        }
    }
}

/// How an enrollment came to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnrollmentType {
    /// Direct grant on a free course.
    Free,
    /// Manual request reviewed by a moderator.
    Manual,
    /// Created by the payment-completion flow.
    Paid,
}

impl EnrollmentType {
    /// Return the type as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Free => "free",
            Self::Manual => "manual",
            Self::Paid => "paid",
        }
    }
}

impl fmt::Display for EnrollmentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EnrollmentType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "free" => Ok(Self::Free),
            "manual" => Ok(Self::Manual),
            "paid" => Ok(Self::Paid),
            other => Err(AppError::invalid_input(format!(
                "Unknown enrollment type: '{other}'"
            ))),
        }
    }
}
