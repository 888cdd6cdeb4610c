//! Redis cache provider.

use std::time::Duration;

use async_trait::async_trait;
use redis::AsyncCommands;
use redis::aio::ConnectionManager;
use tracing::info;

use classgate_core::config::RedisCacheConfig;
use classgate_core::error::{AppError, ErrorKind};
use classgate_core::result::AppResult;
use classgate_core::traits::cache::CacheProvider;

/// INCR and arm the expiry in one step. A key left without a TTL
/// (PTTL -1) is re-armed rather than counting forever.
const INCR_WINDOW_SCRIPT: &str = r#"
    local count = redis.call('INCR', KEYS[1])
    if redis.call('PTTL', KEYS[1]) < 0 then
        redis.call('PEXPIRE', KEYS[1], ARGV[1])
    end
    return count
"#;

/// Redis-backed cache provider. Every key is namespaced by `key_prefix`.
#[derive(Clone)]
pub struct RedisCacheProvider {
    conn: ConnectionManager,
    key_prefix: String,
}

impl std::fmt::Debug for RedisCacheProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisCacheProvider")
            .field("key_prefix", &self.key_prefix)
            .finish()
    }
}

impl RedisCacheProvider {
    /// Open a managed, auto-reconnecting connection.
    pub async fn connect(config: &RedisCacheConfig) -> AppResult<Self> {
        info!(prefix = %config.key_prefix, "Connecting to Redis");

        let client = redis::Client::open(config.url.as_str()).map_err(|e| {
            AppError::with_source(ErrorKind::Cache, "Failed to create Redis client", e)
        })?;
        let conn = ConnectionManager::new(client).await.map_err(|e| {
            AppError::with_source(ErrorKind::Cache, "Failed to connect to Redis", e)
        })?;

        Ok(Self {
            conn,
            key_prefix: config.key_prefix.clone(),
        })
    }

    fn key(&self, key: &str) -> String {
        format!("{}{key}", self.key_prefix)
    }

    fn map_err(e: redis::RedisError) -> AppError {
        AppError::with_source(ErrorKind::Cache, format!("Redis error: {e}"), e)
    }
}

#[async_trait]
impl CacheProvider for RedisCacheProvider {
    async fn get(&self, key: &str) -> AppResult<Option<String>> {
        let mut conn = self.conn.clone();
        conn.get(self.key(key)).await.map_err(Self::map_err)
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> AppResult<()> {
        let mut conn = self.conn.clone();
        let _: () = conn
            .pset_ex(self.key(key), value, ttl.as_millis() as u64)
            .await
            .map_err(Self::map_err)?;
        Ok(())
    }

    async fn delete(&self, key: &str) -> AppResult<()> {
        let mut conn = self.conn.clone();
        let _: () = conn.del(self.key(key)).await.map_err(Self::map_err)?;
        Ok(())
    }

    async fn incr_window(&self, key: &str, window: Duration) -> AppResult<i64> {
        let mut conn = self.conn.clone();
        redis::Script::new(INCR_WINDOW_SCRIPT)
            .key(self.key(key))
            .arg(window.as_millis() as u64)
            .invoke_async(&mut conn)
            .await
            .map_err(Self::map_err)
    }

    async fn health_check(&self) -> AppResult<bool> {
        let mut conn = self.conn.clone();
        let pong: String = redis::cmd("PING")
            .query_async(&mut conn)
            .await
            .map_err(Self::map_err)?;
        Ok(pong == "PONG")
    }
}
