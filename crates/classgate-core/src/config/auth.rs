//! Bearer token verification configuration.

use serde::{Deserialize, Serialize};

/// Settings for verifying identity-provider issued access tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Shared HMAC-SHA256 secret used to verify tokens.
    pub jwt_secret: String,
    /// Allowed clock skew in seconds.
    pub leeway_seconds: u64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: "CHANGE_ME_IN_PRODUCTION".to_string(),
            leeway_seconds: 5,
        }
    }
}
