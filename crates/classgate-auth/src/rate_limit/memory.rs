//! In-process rate limiter.

use std::time::Duration;

use async_trait::async_trait;
use dashmap::DashMap;
use tokio::time::Instant;

use classgate_core::result::AppResult;

use super::limiter::{RateDecision, RateLimiter};

#[derive(Debug, Clone, Copy)]
struct Window {
    started: Instant,
    count: u32,
}

/// Process-local fixed-window counters.
///
/// Entries are never evicted; the map grows with the number of distinct
/// keys seen by this process.
#[derive(Debug, Default)]
pub struct MemoryRateLimiter {
    windows: DashMap<String, Window>,
}

impl MemoryRateLimiter {
    /// Create an empty limiter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys currently tracked.
    pub fn tracked_keys(&self) -> usize {
        self.windows.len()
    }
}

#[async_trait]
impl RateLimiter for MemoryRateLimiter {
    async fn allow(&self, key: &str, window: Duration, max: u32) -> AppResult<RateDecision> {
        let now = Instant::now();
        let mut entry = self.windows.entry(key.to_string()).or_insert(Window {
            started: now,
            count: 0,
        });

        if now.duration_since(entry.started) >= window {
            entry.started = now;
            entry.count = 0;
        }

        if entry.count >= max {
            let retry_after = window.saturating_sub(now.duration_since(entry.started));
            return Ok(RateDecision::deny(Some(retry_after)));
        }

        entry.count += 1;
        Ok(RateDecision::allow())
    }
}
