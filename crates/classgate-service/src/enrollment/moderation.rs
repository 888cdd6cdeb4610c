//! Moderation of manual enrollment requests.

use std::sync::Arc;

use tracing::info;

use classgate_core::error::AppError;
use classgate_core::result::AppResult;
use classgate_core::types::EnrollmentId;
use classgate_database::store::{CourseStore, EnrollmentStore};
use classgate_entity::enrollment::{Enrollment, EnrollmentStatus};

use crate::context::RequestContext;
use crate::role::RolePromotion;

/// Approves or rejects pending enrollment requests.
///
/// Allowed for the course instructor and for moderators.
#[derive(Debug, Clone)]
pub struct EnrollmentModerationService {
    courses: Arc<dyn CourseStore>,
    enrollments: Arc<dyn EnrollmentStore>,
    promotion: RolePromotion,
}

impl EnrollmentModerationService {
    /// Creates a new moderation service.
    pub fn new(
        courses: Arc<dyn CourseStore>,
        enrollments: Arc<dyn EnrollmentStore>,
        promotion: RolePromotion,
    ) -> Self {
        Self {
            courses,
            enrollments,
            promotion,
        }
    }

    /// Approve a pending request and promote the learner if still at baseline.
    pub async fn approve(
        &self,
        ctx: &RequestContext,
        id: EnrollmentId,
        note: Option<&str>,
    ) -> AppResult<Enrollment> {
        let enrollment = self
            .decide(ctx, id, EnrollmentStatus::Approved, note.unwrap_or("approved by moderator"))
            .await?;
        self.promotion
            .promote_if_baseline(enrollment.user_id, None)
            .await;
        Ok(enrollment)
    }

    /// Reject a pending request.
    pub async fn reject(
        &self,
        ctx: &RequestContext,
        id: EnrollmentId,
        note: Option<&str>,
    ) -> AppResult<Enrollment> {
        self.decide(ctx, id, EnrollmentStatus::Rejected, note.unwrap_or("rejected by moderator"))
            .await
    }

    async fn decide(
        &self,
        ctx: &RequestContext,
        id: EnrollmentId,
        next: EnrollmentStatus,
        note: &str,
    ) -> AppResult<Enrollment> {
        let enrollment = self
            .enrollments
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Enrollment {id} not found")))?;

        let course = self
            .courses
            .find_by_id(enrollment.course_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Course {} not found", enrollment.course_id)))?;

        if course.instructor_id != ctx.user_id && !ctx.is_moderator() {
            return Err(AppError::forbidden(
                "Only the course instructor or a moderator can review enrollment requests",
            ));
        }

        if enrollment.status != EnrollmentStatus::Pending {
            return Err(AppError::conflict(format!(
                "Enrollment is {}, only pending requests can be reviewed",
                enrollment.status
            )));
        }

        let updated = self
            .enrollments
            .transition(id, EnrollmentStatus::Pending, next, note, ctx.request_time)
            .await?
            .ok_or_else(|| AppError::conflict("Enrollment was reviewed concurrently"))?;

        info!(
            enrollment_id = %id,
            moderator_id = %ctx.user_id,
            status = %next,
            "Enrollment request reviewed"
        );
        Ok(updated)
    }
}
