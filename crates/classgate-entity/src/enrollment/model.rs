//! Enrollment entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use classgate_core::types::{CourseId, EnrollmentId, UserId};

use super::status::{EnrollmentStatus, EnrollmentType};

/// One entry of the append-only status log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    /// Status entered.
    pub status: EnrollmentStatus,
    /// Free-form note.
    pub note: String,
    /// When the change happened.
    pub at: DateTime<Utc>,
}

/// A user's enrollment in a course. At most one exists per (user, course).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Enrollment {
    /// Record identifier.
    pub id: EnrollmentId,
    /// Enrolled user.
    pub user_id: UserId,
    /// Target course.
    pub course_id: CourseId,
    /// Current status.
    pub status: EnrollmentStatus,
    /// How the enrollment was obtained.
    pub enrollment_type: EnrollmentType,
    /// When the first request was made.
    pub requested_at: DateTime<Utc>,
    /// When access was granted.
    pub approved_at: Option<DateTime<Utc>>,
    /// Last modification time.
    pub updated_at: DateTime<Utc>,
    /// Status change log.
    pub history: Vec<HistoryEntry>,
}

/// Write command for the (user, course) upsert.
///
/// Creates the record on the first attempt and updates it in place on
/// every later one, appending `note` to the history either way.
#[derive(Debug, Clone)]
pub struct EnrollmentUpsert {
    /// Enrolled user.
    pub user_id: UserId,
    /// Target course.
    pub course_id: CourseId,
    /// Status to set.
    pub status: EnrollmentStatus,
    /// Enrollment type to set.
    pub enrollment_type: EnrollmentType,
    /// History note.
    pub note: String,
    /// Time of the write.
    pub at: DateTime<Utc>,
}

impl Enrollment {
    /// Build the record created by the first upsert for a pair.
    pub fn from_upsert(cmd: &EnrollmentUpsert) -> Self {
        let mut enrollment = Self {
            id: EnrollmentId::new(),
            user_id: cmd.user_id,
            course_id: cmd.course_id,
            status: cmd.status,
            enrollment_type: cmd.enrollment_type,
            requested_at: cmd.at,
            approved_at: None,
            updated_at: cmd.at,
            history: Vec::new(),
        };
        enrollment.transition(cmd.status, cmd.note.clone(), cmd.at);
        enrollment
    }

    /// Apply a later upsert to an existing record.
    ///
    /// Re-entering `pending` starts a new request, so `requested_at` moves
    /// to the time of the write.
    pub fn apply_upsert(&mut self, cmd: &EnrollmentUpsert) {
        if cmd.status == EnrollmentStatus::Pending && self.status != EnrollmentStatus::Pending {
            self.requested_at = cmd.at;
        }
        self.enrollment_type = cmd.enrollment_type;
        self.transition(cmd.status, cmd.note.clone(), cmd.at);
    }

    /// Move to `status`, stamping `approved_at` on grant and appending history.
    pub fn transition(&mut self, status: EnrollmentStatus, note: impl Into<String>, at: DateTime<Utc>) {
        self.status = status;
        if status == EnrollmentStatus::Approved && self.approved_at.is_none() {
            self.approved_at = Some(at);
        }
        self.updated_at = at;
        self.history.push(HistoryEntry {
            status,
            note: note.into(),
            at,
        });
    }
}
