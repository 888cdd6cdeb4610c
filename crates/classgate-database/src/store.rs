//! Store contracts.
//!
//! Each aggregate is owned by exactly one store. Reads are strongly
//! consistent with the same backend's prior writes. Status columns are
//! normalized to closed enums at the read boundary.

use std::fmt::Debug;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use classgate_core::result::AppResult;
use classgate_core::types::{CourseId, EnrollmentId, RoomId, UserId};
use classgate_entity::course::{Course, CourseCompletion};
use classgate_entity::enrollment::{Enrollment, EnrollmentStatus, EnrollmentUpsert};
use classgate_entity::live::{LiveSession, LiveSessionStatus, NewLiveSession};
use classgate_entity::user::{User, UserRole};

/// Local user records.
#[async_trait]
pub trait UserStore: Send + Sync + Debug + 'static {
    /// Find a user by id.
    async fn find_by_id(&self, id: UserId) -> AppResult<Option<User>>;

    /// Insert or replace a user record.
    async fn save(&self, user: &User) -> AppResult<()>;

    /// Set a user's role, creating a minimal record if none exists.
    async fn set_role(&self, id: UserId, role: UserRole, at: DateTime<Utc>) -> AppResult<()>;

    /// List users currently holding `role`.
    async fn list_by_role(&self, role: UserRole) -> AppResult<Vec<User>>;
}

/// Course catalog (read-mostly).
#[async_trait]
pub trait CourseStore: Send + Sync + Debug + 'static {
    /// Find a course by id.
    async fn find_by_id(&self, id: CourseId) -> AppResult<Option<Course>>;

    /// Find a course by slug.
    async fn find_by_slug(&self, slug: &str) -> AppResult<Option<Course>>;

    /// Insert a course.
    async fn insert(&self, course: &Course) -> AppResult<()>;
}

/// Enrollment records, at most one per (user, course).
#[async_trait]
pub trait EnrollmentStore: Send + Sync + Debug + 'static {
    /// Find an enrollment by record id.
    async fn find_by_id(&self, id: EnrollmentId) -> AppResult<Option<Enrollment>>;

    /// Find the enrollment for a (user, course) pair.
    async fn find_by_pair(&self, user_id: UserId, course_id: CourseId)
    -> AppResult<Option<Enrollment>>;

    /// Create or update the record for the command's pair in one atomic step.
    async fn upsert(&self, cmd: &EnrollmentUpsert) -> AppResult<Enrollment>;

    /// Move an enrollment from `expected` to `next`, appending a history note.
    ///
    /// Returns `None` when the record is missing or no longer in `expected`.
    async fn transition(
        &self,
        id: EnrollmentId,
        expected: EnrollmentStatus,
        next: EnrollmentStatus,
        note: &str,
        at: DateTime<Utc>,
    ) -> AppResult<Option<Enrollment>>;

    /// Every enrollment held by a user.
    async fn list_for_user(&self, user_id: UserId) -> AppResult<Vec<Enrollment>>;

    /// Pending requests made before `cutoff`.
    async fn list_pending_before(&self, cutoff: DateTime<Utc>) -> AppResult<Vec<Enrollment>>;

    /// Whether the user holds at least one approved or completed enrollment.
    async fn has_active_grant(&self, user_id: UserId) -> AppResult<bool>;
}

/// Course completion records.
#[async_trait]
pub trait CompletionStore: Send + Sync + Debug + 'static {
    /// Whether a completion exists for the pair.
    async fn exists(&self, user_id: UserId, course_id: CourseId) -> AppResult<bool>;

    /// Record a completion. Recording twice is a no-op.
    async fn record(&self, completion: &CourseCompletion) -> AppResult<()>;
}

/// Live session records.
#[async_trait]
pub trait LiveSessionStore: Send + Sync + Debug + 'static {
    /// Insert a newly scheduled session.
    async fn create(&self, session: NewLiveSession) -> AppResult<LiveSession>;

    /// Find a session by room id.
    async fn find_by_room_id(&self, room_id: &RoomId) -> AppResult<Option<LiveSession>>;

    /// Compare-and-set the status. Returns `false` if the stored status
    /// was not `expected` (or the room is gone).
    async fn compare_and_set_status(
        &self,
        room_id: &RoomId,
        expected: LiveSessionStatus,
        next: LiveSessionStatus,
        at: DateTime<Utc>,
    ) -> AppResult<bool>;
}
