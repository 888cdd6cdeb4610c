//! Enrollment and enrollment rate limiting configuration.

use serde::{Deserialize, Serialize};

/// Where the enrollment rate limiter keeps its counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RateLimitBackend {
    /// Process-local counter map. Single-process deployments only.
    #[default]
    Memory,
    /// Shared counters in the configured cache provider.
    Cache,
}

/// Enrollment settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EnrollmentConfig {
    /// Length of the rate limit window in milliseconds.
    pub rate_limit_window_ms: u64,
    /// Enrollment attempts allowed per user and course within one window.
    pub rate_limit_max: u32,
    /// Counter storage for the rate limiter.
    pub rate_limit_backend: RateLimitBackend,
    /// Base URL of the external checkout flow.
    pub payment_base_url: String,
    /// Age after which pending manual requests are rejected.
    /// `None` keeps pending requests indefinitely.
    pub pending_expiry_hours: Option<u64>,
    /// How often the pending expiry sweep runs.
    pub expiry_sweep_interval_seconds: u64,
}

impl Default for EnrollmentConfig {
    fn default() -> Self {
        Self {
            rate_limit_window_ms: 60_000,
            rate_limit_max: 5,
            rate_limit_backend: RateLimitBackend::default(),
            payment_base_url: "/checkout".to_string(),
            pending_expiry_hours: None,
            expiry_sweep_interval_seconds: 900,
        }
    }
}
