//! Core traits defined in `classgate-core` and implemented by other crates.

pub mod cache;

pub use cache::CacheProvider;
