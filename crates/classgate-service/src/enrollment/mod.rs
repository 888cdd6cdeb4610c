//! Enrollment gate: enroll, moderate, expire.

pub mod course_ref;
pub mod expiry;
pub mod moderation;
pub mod outcome;
pub mod service;

pub use course_ref::CourseRef;
pub use expiry::PendingExpirySweep;
pub use moderation::EnrollmentModerationService;
pub use outcome::EnrollmentOutcome;
pub use service::EnrollmentService;
