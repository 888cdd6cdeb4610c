//! In-memory store backend.
//!
//! Implements every store contract on `dashmap`. Enrollment writes take
//! the per-pair entry lock, giving the same at-most-one-record guarantee
//! as the PostgreSQL unique constraint. Used by single-process
//! deployments and by the test suites.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::mapref::entry::Entry;
use dashmap::{DashMap, DashSet};

use classgate_core::error::AppError;
use classgate_core::result::AppResult;
use classgate_core::types::{CourseId, EnrollmentId, RoomId, UserId};
use classgate_entity::course::{Course, CourseCompletion};
use classgate_entity::enrollment::{Enrollment, EnrollmentStatus, EnrollmentUpsert};
use classgate_entity::live::{LiveSession, LiveSessionStatus, NewLiveSession};
use classgate_entity::user::{User, UserRole};

use crate::store::{CompletionStore, CourseStore, EnrollmentStore, LiveSessionStore, UserStore};

/// In-memory implementation of every store contract.
#[derive(Debug, Default)]
pub struct MemoryStore {
    users: DashMap<UserId, User>,
    courses: DashMap<CourseId, Course>,
    slugs: DashMap<String, CourseId>,
    enrollments: DashMap<(UserId, CourseId), Enrollment>,
    enrollment_keys: DashMap<EnrollmentId, (UserId, CourseId)>,
    completions: DashSet<(UserId, CourseId)>,
    sessions: DashMap<RoomId, LiveSession>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of enrollment records held for a pair (0 or 1).
    pub fn enrollment_count(&self, user_id: UserId, course_id: CourseId) -> usize {
        usize::from(self.enrollments.contains_key(&(user_id, course_id)))
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn find_by_id(&self, id: UserId) -> AppResult<Option<User>> {
        Ok(self.users.get(&id).map(|u| u.clone()))
    }

    async fn save(&self, user: &User) -> AppResult<()> {
        self.users.insert(user.id, user.clone());
        Ok(())
    }

    async fn set_role(&self, id: UserId, role: UserRole, at: DateTime<Utc>) -> AppResult<()> {
        let mut user = self
            .users
            .entry(id)
            .or_insert_with(|| User::new(id, None, None));
        user.role = role;
        user.updated_at = at;
        Ok(())
    }

    async fn list_by_role(&self, role: UserRole) -> AppResult<Vec<User>> {
        Ok(self
            .users
            .iter()
            .filter(|u| u.role == role)
            .map(|u| u.clone())
            .collect())
    }
}

#[async_trait]
impl CourseStore for MemoryStore {
    async fn find_by_id(&self, id: CourseId) -> AppResult<Option<Course>> {
        Ok(self.courses.get(&id).map(|c| c.clone()))
    }

    async fn find_by_slug(&self, slug: &str) -> AppResult<Option<Course>> {
        let Some(id) = self.slugs.get(slug).map(|id| *id) else {
            return Ok(None);
        };
        Ok(self.courses.get(&id).map(|c| c.clone()))
    }

    async fn insert(&self, course: &Course) -> AppResult<()> {
        match self.slugs.entry(course.slug.clone()) {
            Entry::Occupied(_) => Err(AppError::conflict(format!(
                "Course slug '{}' already exists",
                course.slug
            ))),
            Entry::Vacant(slot) => {
                slot.insert(course.id);
                self.courses.insert(course.id, course.clone());
                Ok(())
            }
        }
    }
}

#[async_trait]
impl EnrollmentStore for MemoryStore {
    async fn find_by_id(&self, id: EnrollmentId) -> AppResult<Option<Enrollment>> {
        let Some(key) = self.enrollment_keys.get(&id).map(|k| *k) else {
            return Ok(None);
        };
        Ok(self.enrollments.get(&key).map(|e| e.clone()))
    }

    async fn find_by_pair(
        &self,
        user_id: UserId,
        course_id: CourseId,
    ) -> AppResult<Option<Enrollment>> {
        Ok(self.enrollments.get(&(user_id, course_id)).map(|e| e.clone()))
    }

    async fn upsert(&self, cmd: &EnrollmentUpsert) -> AppResult<Enrollment> {
        let enrollment = match self.enrollments.entry((cmd.user_id, cmd.course_id)) {
            Entry::Occupied(mut slot) => {
                slot.get_mut().apply_upsert(cmd);
                slot.get().clone()
            }
            Entry::Vacant(slot) => {
                let enrollment = Enrollment::from_upsert(cmd);
                self.enrollment_keys
                    .insert(enrollment.id, (cmd.user_id, cmd.course_id));
                slot.insert(enrollment).clone()
            }
        };
        Ok(enrollment)
    }

    async fn transition(
        &self,
        id: EnrollmentId,
        expected: EnrollmentStatus,
        next: EnrollmentStatus,
        note: &str,
        at: DateTime<Utc>,
    ) -> AppResult<Option<Enrollment>> {
        let Some(key) = self.enrollment_keys.get(&id).map(|k| *k) else {
            return Ok(None);
        };
        let Some(mut enrollment) = self.enrollments.get_mut(&key) else {
            return Ok(None);
        };
        if enrollment.status != expected {
            return Ok(None);
        }
        enrollment.transition(next, note, at);
        Ok(Some(enrollment.clone()))
    }

    async fn list_for_user(&self, user_id: UserId) -> AppResult<Vec<Enrollment>> {
        let mut list: Vec<Enrollment> = self
            .enrollments
            .iter()
            .filter(|e| e.user_id == user_id)
            .map(|e| e.clone())
            .collect();
        list.sort_by(|a, b| b.requested_at.cmp(&a.requested_at));
        Ok(list)
    }

    async fn list_pending_before(&self, cutoff: DateTime<Utc>) -> AppResult<Vec<Enrollment>> {
        let mut list: Vec<Enrollment> = self
            .enrollments
            .iter()
            .filter(|e| e.status == EnrollmentStatus::Pending && e.requested_at < cutoff)
            .map(|e| e.clone())
            .collect();
        list.sort_by_key(|e| e.requested_at);
        Ok(list)
    }

    async fn has_active_grant(&self, user_id: UserId) -> AppResult<bool> {
        Ok(self
            .enrollments
            .iter()
            .any(|e| e.user_id == user_id && e.status.is_active_grant()))
    }
}

#[async_trait]
impl CompletionStore for MemoryStore {
    async fn exists(&self, user_id: UserId, course_id: CourseId) -> AppResult<bool> {
        Ok(self.completions.contains(&(user_id, course_id)))
    }

    async fn record(&self, completion: &CourseCompletion) -> AppResult<()> {
        self.completions
            .insert((completion.user_id, completion.course_id));
        Ok(())
    }
}

#[async_trait]
impl LiveSessionStore for MemoryStore {
    async fn create(&self, session: NewLiveSession) -> AppResult<LiveSession> {
        let session = session.into_session(Utc::now());
        match self.sessions.entry(session.room_id.clone()) {
            Entry::Occupied(_) => Err(AppError::conflict(format!(
                "Room '{}' already exists",
                session.room_id
            ))),
            Entry::Vacant(slot) => Ok(slot.insert(session).clone()),
        }
    }

    async fn find_by_room_id(&self, room_id: &RoomId) -> AppResult<Option<LiveSession>> {
        Ok(self.sessions.get(room_id).map(|s| s.clone()))
    }

    async fn compare_and_set_status(
        &self,
        room_id: &RoomId,
        expected: LiveSessionStatus,
        next: LiveSessionStatus,
        at: DateTime<Utc>,
    ) -> AppResult<bool> {
        let Some(mut session) = self.sessions.get_mut(room_id) else {
            return Ok(false);
        };
        if session.status != expected {
            return Ok(false);
        }
        session.status = next;
        session.updated_at = at;
        Ok(true)
    }
}
