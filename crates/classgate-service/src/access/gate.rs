//! Access gate: who may view a live session.
//!
//! Evaluated in order, short-circuiting:
//! 1. the session owner is always authorized;
//! 2. for a course-linked session, an approved enrollment or a completion
//!    record for that course authorizes;
//! 3. everyone else is denied.
//!
//! The gate only reads. Decisions are never cached.

use std::sync::Arc;

use tracing::debug;

use classgate_core::result::AppResult;
use classgate_core::types::UserId;
use classgate_database::store::{CompletionStore, EnrollmentStore};
use classgate_entity::enrollment::EnrollmentStatus;
use classgate_entity::live::LiveSession;

/// Authorization predicate for viewing live sessions.
#[derive(Debug, Clone)]
pub struct AccessGate {
    enrollments: Arc<dyn EnrollmentStore>,
    completions: Arc<dyn CompletionStore>,
}

impl AccessGate {
    /// Creates a new access gate.
    pub fn new(enrollments: Arc<dyn EnrollmentStore>, completions: Arc<dyn CompletionStore>) -> Self {
        Self {
            enrollments,
            completions,
        }
    }

    /// Decide whether `requester` may view `session`.
    pub async fn can_view(&self, requester: UserId, session: &LiveSession) -> AppResult<bool> {
        if session.is_owner(requester) {
            return Ok(true);
        }

        let Some(course_id) = session.course_id else {
            debug!(room_id = %session.room_id, user_id = %requester, "No linked course, denying non-owner");
            return Ok(false);
        };

        if let Some(enrollment) = self.enrollments.find_by_pair(requester, course_id).await? {
            // A completed enrollment carries the same right as a completion record.
            if matches!(
                enrollment.status,
                EnrollmentStatus::Approved | EnrollmentStatus::Completed
            ) {
                return Ok(true);
            }
        }

        self.completions.exists(requester, course_id).await
    }
}
