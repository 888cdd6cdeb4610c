//! # classgate-api
//!
//! HTTP API layer for Classgate built on Axum.
//!
//! Provides the enrollment and live session endpoints, the bearer token
//! extractor, request DTOs with validation, CORS and request logging
//! middleware, and the mapping from [`AppError`] to HTTP responses.
//!
//! [`AppError`]: classgate_core::error::AppError

pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use error::ApiError;
pub use router::build_router;
pub use state::AppState;
