//! Identity provider configuration.

use serde::{Deserialize, Serialize};

/// Settings for the external identity provider that mirrors user roles.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IdentityConfig {
    /// Whether role changes are pushed to the identity provider.
    pub enabled: bool,
    /// Base URL of the identity provider's admin API.
    pub base_url: String,
    /// API token sent as a bearer credential.
    pub api_token: String,
    /// Request timeout in milliseconds.
    pub timeout_ms: u64,
    /// When set, the role reconciler runs at this interval.
    pub reconcile_interval_seconds: Option<u64>,
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            base_url: String::new(),
            api_token: String::new(),
            timeout_ms: 3000,
            reconcile_interval_seconds: None,
        }
    }
}
