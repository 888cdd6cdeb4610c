//! Rate limiter contract.

use std::time::Duration;

use async_trait::async_trait;

use classgate_core::result::AppResult;

/// Outcome of a rate limit check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateDecision {
    /// Whether the call may proceed.
    pub allowed: bool,
    /// Time until the current window closes, when denied.
    pub retry_after: Option<Duration>,
}

impl RateDecision {
    /// An allowed decision.
    pub fn allow() -> Self {
        Self {
            allowed: true,
            retry_after: None,
        }
    }

    /// A denied decision.
    pub fn deny(retry_after: Option<Duration>) -> Self {
        Self {
            allowed: false,
            retry_after,
        }
    }
}

/// Counts calls per key within a fixed window.
///
/// Exactly `max` calls per key are allowed in each window; later calls
/// in the same window are denied. The first call after the window has
/// elapsed opens a new one.
#[async_trait]
pub trait RateLimiter: Send + Sync + std::fmt::Debug + 'static {
    /// Record an attempt for `key` and decide whether it may proceed.
    async fn allow(&self, key: &str, window: Duration, max: u32) -> AppResult<RateDecision>;
}
