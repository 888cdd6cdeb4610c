//! Live session repository implementation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use classgate_core::result::AppResult;
use classgate_core::types::{CourseId, RoomId, UserId};
use classgate_entity::live::{LiveSession, LiveSessionStatus, MeetingProvider, NewLiveSession};

use super::{db_err, decode_column};
use crate::store::LiveSessionStore;

#[derive(Debug, sqlx::FromRow)]
struct LiveSessionRow {
    room_id: String,
    title: String,
    status: String,
    provider: String,
    room_name: String,
    meeting_link: Option<String>,
    created_by: Uuid,
    course_id: Option<Uuid>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<LiveSessionRow> for LiveSession {
    type Error = classgate_core::AppError;

    fn try_from(row: LiveSessionRow) -> Result<Self, Self::Error> {
        Ok(LiveSession {
            room_id: RoomId::parse(&row.room_id)?,
            title: row.title,
            status: decode_column("live_sessions", "status", &row.status)?,
            provider: MeetingProvider::from(row.provider),
            room_name: row.room_name,
            meeting_link: row.meeting_link,
            created_by: UserId::from_uuid(row.created_by),
            course_id: row.course_id.map(CourseId::from_uuid),
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// PostgreSQL-backed [`LiveSessionStore`].
#[derive(Debug, Clone)]
pub struct LiveSessionRepository {
    pool: PgPool,
}

impl LiveSessionRepository {
    /// Create a new live session repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LiveSessionStore for LiveSessionRepository {
    async fn create(&self, session: NewLiveSession) -> AppResult<LiveSession> {
        let session = session.into_session(Utc::now());
        sqlx::query(
            "INSERT INTO live_sessions \
                (room_id, title, status, provider, room_name, meeting_link, created_by, course_id, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $9)",
        )
        .bind(session.room_id.as_str())
        .bind(&session.title)
        .bind(session.status.as_str())
        .bind(session.provider.as_str())
        .bind(&session.room_name)
        .bind(&session.meeting_link)
        .bind(session.created_by)
        .bind(session.course_id)
        .bind(session.created_at)
        .execute(&self.pool)
        .await
        .map_err(db_err("Failed to create live session"))?;
        Ok(session)
    }

    async fn find_by_room_id(&self, room_id: &RoomId) -> AppResult<Option<LiveSession>> {
        sqlx::query_as::<_, LiveSessionRow>("SELECT * FROM live_sessions WHERE room_id = $1")
            .bind(room_id.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err("Failed to find live session"))?
            .map(LiveSession::try_from)
            .transpose()
    }

    async fn compare_and_set_status(
        &self,
        room_id: &RoomId,
        expected: LiveSessionStatus,
        next: LiveSessionStatus,
        at: DateTime<Utc>,
    ) -> AppResult<bool> {
        let result = sqlx::query(
            "UPDATE live_sessions SET status = $3, updated_at = $4 \
             WHERE room_id = $1 AND status = $2",
        )
        .bind(room_id.as_str())
        .bind(expected.as_str())
        .bind(next.as_str())
        .bind(at)
        .execute(&self.pool)
        .await
        .map_err(db_err("Failed to update live session status"))?;
        Ok(result.rows_affected() == 1)
    }
}
