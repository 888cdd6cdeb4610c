//! # classgate-core
//!
//! Core crate for Classgate, the enrollment gate and live session
//! service. Contains the unified error system, configuration schemas,
//! typed identifiers, and the traits implemented by the infrastructure
//! crates.
//!
//! This crate has **no** internal dependencies on other Classgate crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;
pub mod types;

pub use error::{AppError, ErrorKind};
pub use result::AppResult;
