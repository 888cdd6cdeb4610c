//! PostgreSQL implementations of the store contracts.

pub mod completion;
pub mod course;
pub mod enrollment;
pub mod live_session;
pub mod user;

pub use completion::CompletionRepository;
pub use course::CourseRepository;
pub use enrollment::EnrollmentRepository;
pub use live_session::LiveSessionRepository;
pub use user::UserRepository;

use std::str::FromStr;

use classgate_core::error::{AppError, ErrorKind};
use classgate_core::result::AppResult;

/// Parse a text column into a closed enum, failing loudly on unknown values.
pub(crate) fn decode_column<T>(table: &str, column: &str, raw: &str) -> AppResult<T>
where
    T: FromStr<Err = AppError>,
{
    raw.parse::<T>().map_err(|_| {
        AppError::new(
            ErrorKind::Database,
            format!("Unrecognised value '{raw}' in {table}.{column}"),
        )
    })
}

/// Wrap a sqlx error with context.
pub(crate) fn db_err(context: &'static str) -> impl FnOnce(sqlx::Error) -> AppError {
    move |e| AppError::with_source(ErrorKind::Database, context, e)
}
