//! JWT claims carried by identity-provider access tokens.

use serde::{Deserialize, Serialize};

use classgate_core::types::UserId;
use classgate_entity::user::UserRole;

/// Access token payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the user id.
    pub sub: UserId,
    /// Role at the time of issuance.
    pub role: UserRole,
    /// Issued-at (seconds since epoch).
    pub iat: i64,
    /// Expiration (seconds since epoch).
    pub exp: i64,
}

impl Claims {
    /// The authenticated user.
    pub fn user_id(&self) -> UserId {
        self.sub
    }
}
