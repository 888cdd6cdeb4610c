//! Request DTOs with validation.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Enroll request body.
///
/// Exactly one of `course_id` and `course_slug` must be present.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct EnrollRequest {
    /// Course primary key.
    pub course_id: Option<String>,
    /// Course URL slug.
    #[validate(length(min = 1, max = 128, message = "courseSlug must be 1-128 characters"))]
    pub course_slug: Option<String>,
    /// Request manual approval for a paid course instead of checkout.
    #[serde(default)]
    pub manual_enrollment: bool,
}

/// Approve or reject body.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct ReviewRequest {
    /// Recorded in the enrollment history.
    #[validate(length(max = 500, message = "note must be at most 500 characters"))]
    pub note: Option<String>,
}

/// `GET /live/status` query.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LiveStatusQuery {
    /// Room to read.
    #[validate(length(min = 1, message = "roomId is required"))]
    pub room_id: String,
}

/// `POST /live/status` body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SetStatusRequest {
    /// Room to transition.
    #[validate(length(min = 1, message = "roomId is required"))]
    pub room_id: String,
    /// `active` or `ended`.
    #[validate(length(min = 1, message = "status is required"))]
    pub status: String,
}

/// Schedule a live session.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleRequest {
    /// Display title.
    #[validate(length(max = 200, message = "title must be at most 200 characters"))]
    pub title: Option<String>,
    /// Meeting backend, e.g. `jitsi` or `zoom`.
    #[validate(length(min = 1, max = 64, message = "provider is required"))]
    pub provider: String,
    /// Room name; generated when absent.
    pub room_name: Option<String>,
    /// Link for externally hosted providers.
    #[validate(length(max = 2048))]
    pub meeting_link: Option<String>,
    /// Course whose enrollment gates access.
    pub course_id: Option<String>,
}
