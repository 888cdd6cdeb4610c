//! # classgate-auth
//!
//! Authentication and abuse protection for Classgate.
//!
//! ## Modules
//!
//! - `jwt`: verification (and, for tooling and tests, issuance) of the
//!   identity provider's bearer tokens
//! - `rate_limit`: fixed-window limiter guarding enrollment mutations
//! - `identity`: role writes against the external identity provider

pub mod identity;
pub mod jwt;
pub mod rate_limit;

pub use identity::{DisabledIdentityProvider, HttpIdentityProvider, IdentityProvider};
pub use jwt::{Claims, JwtDecoder, JwtEncoder};
pub use rate_limit::{CacheRateLimiter, MemoryRateLimiter, RateDecision, RateLimiter};
