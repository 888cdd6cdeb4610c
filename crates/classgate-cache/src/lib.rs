//! # classgate-cache
//!
//! Cache provider implementations for Classgate:
//!
//! - **memory**: process-local map with per-key expiry
//! - **redis**: shared Redis instance, used when several server processes
//!   must agree on counters (the cache-backed rate limiter)
//!
//! The provider is selected at runtime by `cache.provider`.

#[cfg(feature = "memory")]
pub mod memory;
pub mod provider;
#[cfg(feature = "redis-backend")]
pub mod redis;

pub use provider::connect;
