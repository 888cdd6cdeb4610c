//! Convenience result type alias for Classgate.

use crate::error::AppError;

/// A specialized `Result` type for Classgate operations.
pub type AppResult<T> = Result<T, AppError>;
