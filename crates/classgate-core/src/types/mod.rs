//! Shared value types.

pub mod id;

pub use id::{CourseId, EnrollmentId, RoomId, UserId};
