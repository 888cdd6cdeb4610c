//! Rate limiter backed by a shared cache provider.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use classgate_core::result::AppResult;
use classgate_core::traits::cache::CacheProvider;

use super::limiter::{RateDecision, RateLimiter};

const KEY_PREFIX: &str = "ratelimit:";

/// Fixed-window counters shared by every process using the same cache.
///
/// The first increment in a window arms the key's expiry in the same
/// cache operation; the window closes when the key expires.
#[derive(Debug, Clone)]
pub struct CacheRateLimiter {
    cache: Arc<dyn CacheProvider>,
}

impl CacheRateLimiter {
    /// Create a limiter over `cache`.
    pub fn new(cache: Arc<dyn CacheProvider>) -> Self {
        Self { cache }
    }
}

#[async_trait]
impl RateLimiter for CacheRateLimiter {
    async fn allow(&self, key: &str, window: Duration, max: u32) -> AppResult<RateDecision> {
        let key = format!("{KEY_PREFIX}{key}");
        let count = self.cache.incr_window(&key, window).await?;

        if count > i64::from(max) {
            debug!(key = %key, count, "Rate limit exceeded");
            return Ok(RateDecision::deny(None));
        }
        Ok(RateDecision::allow())
    }
}
