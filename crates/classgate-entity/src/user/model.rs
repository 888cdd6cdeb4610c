//! Local user record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use classgate_core::types::UserId;

use super::role::UserRole;

/// The local mirror of an identity-provider user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Identity-provider subject.
    pub id: UserId,
    /// Email address (optional).
    pub email: Option<String>,
    /// Human-readable display name.
    pub display_name: Option<String>,
    /// Current role.
    pub role: UserRole,
    /// When the record was created.
    pub created_at: DateTime<Utc>,
    /// When the record was last updated.
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Build a fresh record with the baseline role.
    pub fn new(id: UserId, email: Option<String>, display_name: Option<String>) -> Self {
        let now = Utc::now();
        Self {
            id,
            email,
            display_name,
            role: UserRole::Guest,
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether the user still holds the baseline role.
    pub fn is_baseline(&self) -> bool {
        self.role.is_baseline()
    }
}
