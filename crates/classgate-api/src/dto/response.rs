//! Response DTOs.

use serde::Serialize;

use classgate_core::types::CourseId;
use classgate_entity::enrollment::{Enrollment, EnrollmentStatus};
use classgate_service::EnrollmentOutcome;

/// Standard success response wrapper.
#[derive(Debug, Clone, Serialize)]
pub struct ApiResponse<T: Serialize> {
    /// Whether the request was successful.
    pub success: bool,
    /// Response data.
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    /// Creates a successful response.
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// Body of `POST /enrollments/enroll`.
///
/// Flat rather than wrapped in `data`; which fields are present depends
/// on the outcome.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrollResponse {
    /// Always `true` for a decided outcome.
    pub success: bool,
    /// Whether the caller now has access.
    pub enrolled: bool,
    /// Human-readable summary.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Status of the enrollment record, when one exists.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<EnrollmentStatus>,
    /// The granting enrollment.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enrollment: Option<Enrollment>,
    /// Set when checkout is needed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requires_payment: Option<bool>,
    /// Course to purchase.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub course_id: Option<CourseId>,
    /// Price in minor units of `currency` (4900 is 49.00 USD).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<i64>,
    /// Same value as `amount`, named for its unit.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount_minor: Option<i64>,
    /// ISO 4217 currency code.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    /// Checkout location.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_url: Option<String>,
}

impl EnrollResponse {
    fn empty(enrolled: bool) -> Self {
        Self {
            success: true,
            enrolled,
            message: None,
            status: None,
            enrollment: None,
            requires_payment: None,
            course_id: None,
            amount: None,
            amount_minor: None,
            currency: None,
            payment_url: None,
        }
    }
}

impl From<EnrollmentOutcome> for EnrollResponse {
    fn from(outcome: EnrollmentOutcome) -> Self {
        match outcome {
            EnrollmentOutcome::AlreadyEnrolled(enrollment) => Self {
                message: Some("Already enrolled in this course".to_string()),
                status: Some(enrollment.status),
                enrollment: Some(enrollment),
                ..Self::empty(true)
            },
            EnrollmentOutcome::Granted(enrollment) => Self {
                message: Some("Enrolled successfully".to_string()),
                status: Some(enrollment.status),
                enrollment: Some(enrollment),
                ..Self::empty(true)
            },
            EnrollmentOutcome::Requested(enrollment) => Self {
                message: Some("Enrollment request submitted for approval".to_string()),
                status: Some(enrollment.status),
                ..Self::empty(false)
            },
            EnrollmentOutcome::PaymentRequired {
                course_id,
                amount,
                currency,
                payment_url,
            } => Self {
                requires_payment: Some(true),
                course_id: Some(course_id),
                amount: Some(amount),
                amount_minor: Some(amount),
                currency: Some(currency),
                payment_url: Some(payment_url),
                ..Self::empty(false)
            },
        }
    }
}

/// Health check payload.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    /// `ok` or `degraded`.
    pub status: String,
    /// Crate version.
    pub version: String,
    /// Seconds since start.
    pub uptime_seconds: u64,
    /// Store backend state.
    pub database: String,
    /// Cache provider state.
    pub cache: String,
}
