//! Typed path parameter helpers.

use classgate_core::error::AppError;
use classgate_core::types::{EnrollmentId, RoomId};

/// Parses a room identifier from a path segment.
pub fn parse_room_id(raw: &str) -> Result<RoomId, AppError> {
    RoomId::parse(raw)
}

/// Parses an enrollment identifier from a path segment.
pub fn parse_enrollment_id(raw: &str) -> Result<EnrollmentId, AppError> {
    EnrollmentId::parse(raw)
}
