//! Enrollment service.
//!
//! Decides the outcome of an enroll call for one (user, course) pair:
//! an existing grant short-circuits, free courses are granted directly,
//! paid courses either record a pending manual request or hand back a
//! checkout descriptor without writing anything.

use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use classgate_auth::rate_limit::{RateLimiter, enrollment_key};
use classgate_core::config::EnrollmentConfig;
use classgate_core::error::AppError;
use classgate_core::result::AppResult;
use classgate_database::store::{CourseStore, EnrollmentStore};
use classgate_entity::course::Course;
use classgate_entity::enrollment::{Enrollment, EnrollmentStatus, EnrollmentType, EnrollmentUpsert};

use super::course_ref::CourseRef;
use super::outcome::EnrollmentOutcome;
use crate::context::RequestContext;
use crate::role::RolePromotion;

/// Handles enrollment requests.
#[derive(Debug, Clone)]
pub struct EnrollmentService {
    courses: Arc<dyn CourseStore>,
    enrollments: Arc<dyn EnrollmentStore>,
    rate_limiter: Arc<dyn RateLimiter>,
    promotion: RolePromotion,
    config: EnrollmentConfig,
}

impl EnrollmentService {
    /// Creates a new enrollment service.
    pub fn new(
        courses: Arc<dyn CourseStore>,
        enrollments: Arc<dyn EnrollmentStore>,
        rate_limiter: Arc<dyn RateLimiter>,
        promotion: RolePromotion,
        config: EnrollmentConfig,
    ) -> Self {
        Self {
            courses,
            enrollments,
            rate_limiter,
            promotion,
            config,
        }
    }

    /// Enroll the caller in `course_ref`.
    pub async fn enroll(
        &self,
        ctx: &RequestContext,
        course_ref: &CourseRef,
        manual: bool,
    ) -> AppResult<EnrollmentOutcome> {
        let key = enrollment_key(ctx.user_id, &course_ref.to_string());
        let decision = self
            .rate_limiter
            .allow(
                &key,
                Duration::from_millis(self.config.rate_limit_window_ms),
                self.config.rate_limit_max,
            )
            .await?;
        if !decision.allowed {
            warn!(user_id = %ctx.user_id, course = %course_ref, "Enrollment rate limit exceeded");
            return Err(AppError::rate_limited(
                "Too many enrollment attempts. Please wait and try again",
            ));
        }

        let course = self.resolve(course_ref).await?;

        let existing = self.enrollments.find_by_pair(ctx.user_id, course.id).await?;
        if let Some(existing) = existing.filter(|e| e.status.is_active_grant()) {
            return Ok(EnrollmentOutcome::AlreadyEnrolled(existing));
        }

        if course.is_free() {
            let enrollment = self
                .write(ctx, &course, EnrollmentStatus::Approved, EnrollmentType::Free, "free enrollment granted")
                .await?;
            info!(user_id = %ctx.user_id, course_id = %course.id, "Free enrollment granted");
            self.promotion
                .promote_if_baseline(ctx.user_id, Some(ctx.role))
                .await;
            return Ok(EnrollmentOutcome::Granted(enrollment));
        }

        if manual {
            self.promotion.mirror_user(ctx.user_id, ctx.role).await;
            let enrollment = self
                .write(ctx, &course, EnrollmentStatus::Pending, EnrollmentType::Manual, "manual enrollment requested")
                .await?;
            info!(user_id = %ctx.user_id, course_id = %course.id, "Manual enrollment requested");
            return Ok(EnrollmentOutcome::Requested(enrollment));
        }

        let (amount, currency) = course
            .price
            .as_ref()
            .map(|p| (p.amount, p.currency.clone()))
            .unwrap_or_default();
        Ok(EnrollmentOutcome::PaymentRequired {
            course_id: course.id,
            amount,
            currency,
            payment_url: format!("{}?course={}", self.config.payment_base_url, course.id),
        })
    }

    /// Every enrollment the caller holds.
    pub async fn list_mine(&self, ctx: &RequestContext) -> AppResult<Vec<Enrollment>> {
        self.enrollments.list_for_user(ctx.user_id).await
    }

    async fn resolve(&self, course_ref: &CourseRef) -> AppResult<Course> {
        let found = match course_ref {
            CourseRef::Id(id) => self.courses.find_by_id(*id).await?,
            CourseRef::Slug(slug) => self.courses.find_by_slug(slug).await?,
        };
        found.ok_or_else(|| AppError::not_found(format!("Course '{course_ref}' not found")))
    }

    async fn write(
        &self,
        ctx: &RequestContext,
        course: &Course,
        status: EnrollmentStatus,
        enrollment_type: EnrollmentType,
        note: &str,
    ) -> AppResult<Enrollment> {
        self.enrollments
            .upsert(&EnrollmentUpsert {
                user_id: ctx.user_id,
                course_id: course.id,
                status,
                enrollment_type,
                note: note.to_string(),
                at: ctx.request_time,
            })
            .await
    }
}
