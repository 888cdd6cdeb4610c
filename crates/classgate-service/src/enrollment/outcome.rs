//! Result of an enrollment attempt.

use classgate_core::types::CourseId;
use classgate_entity::enrollment::Enrollment;

/// What an enroll call decided.
#[derive(Debug, Clone)]
pub enum EnrollmentOutcome {
    /// The caller already held an approved or completed enrollment.
    AlreadyEnrolled(Enrollment),
    /// Free course: access granted now.
    Granted(Enrollment),
    /// Paid course, manual request recorded as pending.
    Requested(Enrollment),
    /// Paid course: checkout needed. Nothing was written.
    PaymentRequired {
        /// Course being purchased.
        course_id: CourseId,
        /// Price in minor units of `currency` (4900 is 49.00 USD).
        amount: i64,
        /// ISO 4217 currency code.
        currency: String,
        /// Where to send the caller.
        payment_url: String,
    },
}

impl EnrollmentOutcome {
    /// Whether the caller now has access.
    pub fn is_enrolled(&self) -> bool {
        matches!(self, Self::AlreadyEnrolled(_) | Self::Granted(_))
    }
}
