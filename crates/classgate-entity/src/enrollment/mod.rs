//! Enrollment domain entities.

pub mod model;
pub mod status;

pub use model::{Enrollment, EnrollmentUpsert, HistoryEntry};
pub use status::{EnrollmentStatus, EnrollmentType};
