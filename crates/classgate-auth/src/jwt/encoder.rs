//! Access token issuance.
//!
//! Production tokens come from the identity provider; this encoder signs
//! tokens with the same shared secret for local tooling and tests.

use chrono::Utc;
use jsonwebtoken::{EncodingKey, Header, encode};

use classgate_core::config::AuthConfig;
use classgate_core::error::{AppError, ErrorKind};
use classgate_core::types::UserId;
use classgate_entity::user::UserRole;

use super::claims::Claims;

/// Signs HS256 access tokens.
#[derive(Clone)]
pub struct JwtEncoder {
    encoding_key: EncodingKey,
}

impl std::fmt::Debug for JwtEncoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtEncoder").finish_non_exhaustive()
    }
}

impl JwtEncoder {
    /// Create an encoder from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
        }
    }

    /// Sign a token for `user_id` valid for `ttl`.
    pub fn issue(
        &self,
        user_id: UserId,
        role: UserRole,
        ttl: chrono::Duration,
    ) -> Result<String, AppError> {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id,
            role,
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
        };
        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AppError::with_source(ErrorKind::Unexpected, "Failed to sign token", e))
    }
}
