//! Live session status and its transition table.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use classgate_core::AppError;

/// Server-held status of a live session.
///
/// Legal transitions:
/// `scheduled -> {active, cancelled}`, `active -> {ended, cancelled}`.
/// `ended` and `cancelled` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LiveSessionStatus {
    /// Created, not yet started.
    Scheduled,
    /// In progress.
    Active,
    /// Finished normally.
    Ended,
    /// Called off.
    Cancelled,
}

impl LiveSessionStatus {
    /// Check if this status is terminal (no further transitions).
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Ended | Self::Cancelled)
    }

    /// The set of states reachable in one step.
    pub fn legal_next(&self) -> &'static [LiveSessionStatus] {
        match self {
            Self::Scheduled => &[Self::Active, Self::Cancelled],
            Self::Active => &[Self::Ended, Self::Cancelled],
            Self::Ended | Self::Cancelled => &[],
        }
    }

    /// Whether moving to `next` is a legal single step.
    pub fn can_transition_to(&self, next: LiveSessionStatus) -> bool {
        self.legal_next().contains(&next)
    }

    /// Return the status as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Scheduled => "scheduled",
            Self::Active => "active",
            Self::Ended => "ended",
            Self::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for LiveSessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LiveSessionStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "scheduled" => Ok(Self::Scheduled),
            "active" => Ok(Self::Active),
            "ended" => Ok(Self::Ended),
            "cancelled" => Ok(Self::Cancelled),
            other => Err(AppError::invalid_input(format!(
                "Unknown live session status: '{other}'"
            ))),
        }
    }
}
