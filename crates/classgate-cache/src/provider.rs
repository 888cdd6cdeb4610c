//! Provider selection.

use std::sync::Arc;

use tracing::info;

use classgate_core::config::CacheConfig;
use classgate_core::error::AppError;
use classgate_core::result::AppResult;
use classgate_core::traits::cache::CacheProvider;

/// Build the provider named by `config.provider`.
pub async fn connect(config: &CacheConfig) -> AppResult<Arc<dyn CacheProvider>> {
    match config.provider.as_str() {
        #[cfg(feature = "redis-backend")]
        "redis" => {
            info!("Initializing Redis cache provider");
            let provider = crate::redis::RedisCacheProvider::connect(&config.redis).await?;
            Ok(Arc::new(provider))
        }
        #[cfg(feature = "memory")]
        "memory" => {
            info!("Initializing in-memory cache provider");
            Ok(Arc::new(crate::memory::MemoryCacheProvider::new()))
        }
        other => Err(AppError::configuration(format!(
            "Unknown cache provider: '{other}'. Supported: memory, redis"
        ))),
    }
}
