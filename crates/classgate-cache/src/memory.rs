//! In-memory cache provider.
//!
//! Expiry is tracked with `tokio::time::Instant`, so a paused test clock
//! drives it deterministically.

use std::time::Duration;

use async_trait::async_trait;
use dashmap::DashMap;
use tokio::time::Instant;

use classgate_core::error::AppError;
use classgate_core::result::AppResult;
use classgate_core::traits::cache::CacheProvider;

#[derive(Debug, Clone)]
struct Slot {
    value: String,
    expires_at: Option<Instant>,
}

impl Slot {
    fn is_live(&self, now: Instant) -> bool {
        self.expires_at.is_none_or(|at| now < at)
    }
}

/// Process-local cache provider.
#[derive(Debug, Default)]
pub struct MemoryCacheProvider {
    entries: DashMap<String, Slot>,
}

impl MemoryCacheProvider {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CacheProvider for MemoryCacheProvider {
    async fn get(&self, key: &str) -> AppResult<Option<String>> {
        let now = Instant::now();
        Ok(self
            .entries
            .get(key)
            .filter(|slot| slot.is_live(now))
            .map(|slot| slot.value.clone()))
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> AppResult<()> {
        self.entries.insert(
            key.to_string(),
            Slot {
                value: value.to_string(),
                expires_at: Some(Instant::now() + ttl),
            },
        );
        Ok(())
    }

    async fn delete(&self, key: &str) -> AppResult<()> {
        self.entries.remove(key);
        Ok(())
    }

    async fn incr_window(&self, key: &str, window: Duration) -> AppResult<i64> {
        let now = Instant::now();
        let mut slot = self.entries.entry(key.to_string()).or_insert(Slot {
            value: "0".to_string(),
            expires_at: None,
        });
        if !slot.is_live(now) {
            slot.value = "0".to_string();
            slot.expires_at = None;
        }
        let current: i64 = slot.value.parse().map_err(|_| {
            AppError::cache(format!("Value at '{key}' is not an integer"))
        })?;
        let next = current + 1;
        slot.value = next.to_string();
        if slot.expires_at.is_none() {
            slot.expires_at = Some(now + window);
        }
        Ok(next)
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(true)
    }
}
