//! Enrollment repository implementation.
//!
//! Every write is a single statement, so the `(user_id, course_id)`
//! unique constraint alone keeps at most one record per pair.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use sqlx::types::Json;
use uuid::Uuid;

use classgate_core::result::AppResult;
use classgate_core::types::{CourseId, EnrollmentId, UserId};
use classgate_entity::enrollment::{
    Enrollment, EnrollmentStatus, EnrollmentUpsert, HistoryEntry,
};

use super::{db_err, decode_column};
use crate::store::EnrollmentStore;

#[derive(Debug, sqlx::FromRow)]
struct EnrollmentRow {
    id: Uuid,
    user_id: Uuid,
    course_id: Uuid,
    status: String,
    enrollment_type: String,
    requested_at: DateTime<Utc>,
    approved_at: Option<DateTime<Utc>>,
    updated_at: DateTime<Utc>,
    history: Json<Vec<HistoryEntry>>,
}

impl TryFrom<EnrollmentRow> for Enrollment {
    type Error = classgate_core::AppError;

    fn try_from(row: EnrollmentRow) -> Result<Self, Self::Error> {
        Ok(Enrollment {
            id: EnrollmentId::from_uuid(row.id),
            user_id: UserId::from_uuid(row.user_id),
            course_id: CourseId::from_uuid(row.course_id),
            status: decode_column("enrollments", "status", &row.status)?,
            enrollment_type: decode_column("enrollments", "enrollment_type", &row.enrollment_type)?,
            requested_at: row.requested_at,
            approved_at: row.approved_at,
            updated_at: row.updated_at,
            history: row.history.0,
        })
    }
}

fn decode_all(rows: Vec<EnrollmentRow>) -> AppResult<Vec<Enrollment>> {
    rows.into_iter().map(Enrollment::try_from).collect()
}

/// PostgreSQL-backed [`EnrollmentStore`].
#[derive(Debug, Clone)]
pub struct EnrollmentRepository {
    pool: PgPool,
}

impl EnrollmentRepository {
    /// Create a new enrollment repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EnrollmentStore for EnrollmentRepository {
    async fn find_by_id(&self, id: EnrollmentId) -> AppResult<Option<Enrollment>> {
        sqlx::query_as::<_, EnrollmentRow>("SELECT * FROM enrollments WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err("Failed to find enrollment by id"))?
            .map(Enrollment::try_from)
            .transpose()
    }

    async fn find_by_pair(
        &self,
        user_id: UserId,
        course_id: CourseId,
    ) -> AppResult<Option<Enrollment>> {
        sqlx::query_as::<_, EnrollmentRow>(
            "SELECT * FROM enrollments WHERE user_id = $1 AND course_id = $2",
        )
        .bind(user_id)
        .bind(course_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err("Failed to find enrollment"))?
        .map(Enrollment::try_from)
        .transpose()
    }

    async fn upsert(&self, cmd: &EnrollmentUpsert) -> AppResult<Enrollment> {
        let entry = HistoryEntry {
            status: cmd.status,
            note: cmd.note.clone(),
            at: cmd.at,
        };
        let approved_at = (cmd.status == EnrollmentStatus::Approved).then_some(cmd.at);

        let row = sqlx::query_as::<_, EnrollmentRow>(
            "INSERT INTO enrollments \
                (id, user_id, course_id, status, enrollment_type, requested_at, approved_at, updated_at, history) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $6, $8) \
             ON CONFLICT (user_id, course_id) DO UPDATE SET \
                status = EXCLUDED.status, \
                enrollment_type = EXCLUDED.enrollment_type, \
                requested_at = CASE \
                    WHEN enrollments.status <> 'pending' AND EXCLUDED.status = 'pending' \
                    THEN EXCLUDED.requested_at \
                    ELSE enrollments.requested_at \
                END, \
                approved_at = COALESCE(enrollments.approved_at, EXCLUDED.approved_at), \
                updated_at = EXCLUDED.updated_at, \
                history = enrollments.history || EXCLUDED.history \
             RETURNING *",
        )
        .bind(EnrollmentId::new())
        .bind(cmd.user_id)
        .bind(cmd.course_id)
        .bind(cmd.status.as_str())
        .bind(cmd.enrollment_type.as_str())
        .bind(cmd.at)
        .bind(approved_at)
        .bind(Json(vec![entry]))
        .fetch_one(&self.pool)
        .await
        .map_err(db_err("Failed to upsert enrollment"))?;

        Enrollment::try_from(row)
    }

    async fn transition(
        &self,
        id: EnrollmentId,
        expected: EnrollmentStatus,
        next: EnrollmentStatus,
        note: &str,
        at: DateTime<Utc>,
    ) -> AppResult<Option<Enrollment>> {
        let entry = HistoryEntry {
            status: next,
            note: note.to_string(),
            at,
        };
        let approved_at = (next == EnrollmentStatus::Approved).then_some(at);

        sqlx::query_as::<_, EnrollmentRow>(
            "UPDATE enrollments SET \
                status = $3, \
                approved_at = COALESCE(approved_at, $4), \
                updated_at = $5, \
                history = history || $6 \
             WHERE id = $1 AND status = $2 \
             RETURNING *",
        )
        .bind(id)
        .bind(expected.as_str())
        .bind(next.as_str())
        .bind(approved_at)
        .bind(at)
        .bind(Json(vec![entry]))
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err("Failed to update enrollment status"))?
        .map(Enrollment::try_from)
        .transpose()
    }

    async fn list_for_user(&self, user_id: UserId) -> AppResult<Vec<Enrollment>> {
        let rows = sqlx::query_as::<_, EnrollmentRow>(
            "SELECT * FROM enrollments WHERE user_id = $1 ORDER BY requested_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_err("Failed to list enrollments for user"))?;
        decode_all(rows)
    }

    async fn list_pending_before(&self, cutoff: DateTime<Utc>) -> AppResult<Vec<Enrollment>> {
        let rows = sqlx::query_as::<_, EnrollmentRow>(
            "SELECT * FROM enrollments WHERE status = 'pending' AND requested_at < $1 \
             ORDER BY requested_at",
        )
        .bind(cutoff)
        .fetch_all(&self.pool)
        .await
        .map_err(db_err("Failed to list pending enrollments"))?;
        decode_all(rows)
    }

    async fn has_active_grant(&self, user_id: UserId) -> AppResult<bool> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM enrollments \
             WHERE user_id = $1 AND status IN ('approved', 'completed'))",
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
        .map_err(db_err("Failed to check enrollment grants"))
    }
}
