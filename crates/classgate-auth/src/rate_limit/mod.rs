//! Fixed-window rate limiting for enrollment mutations.
//!
//! Provides two counter stores behind one contract:
//! - process-local map (single-node deployments)
//! - shared cache provider with atomic increment and expiry (multi-node)

pub mod cache;
pub mod limiter;
pub mod memory;

pub use cache::CacheRateLimiter;
pub use limiter::{RateDecision, RateLimiter};
pub use memory::MemoryRateLimiter;

use classgate_core::types::UserId;

/// Counter key scoping enrollment attempts to one user and one course reference.
pub fn enrollment_key(user_id: UserId, course_ref: &str) -> String {
    format!("enroll:{user_id}:{course_ref}")
}
