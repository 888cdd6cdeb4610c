//! Course completion repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;

use classgate_core::result::AppResult;
use classgate_core::types::{CourseId, UserId};
use classgate_entity::course::CourseCompletion;

use super::db_err;
use crate::store::CompletionStore;

/// PostgreSQL-backed [`CompletionStore`].
#[derive(Debug, Clone)]
pub struct CompletionRepository {
    pool: PgPool,
}

impl CompletionRepository {
    /// Create a new completion repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CompletionStore for CompletionRepository {
    async fn exists(&self, user_id: UserId, course_id: CourseId) -> AppResult<bool> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM course_completions WHERE user_id = $1 AND course_id = $2)",
        )
        .bind(user_id)
        .bind(course_id)
        .fetch_one(&self.pool)
        .await
        .map_err(db_err("Failed to check course completion"))
    }

    async fn record(&self, completion: &CourseCompletion) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO course_completions (user_id, course_id, completed_at) VALUES ($1, $2, $3) \
             ON CONFLICT (user_id, course_id) DO NOTHING",
        )
        .bind(completion.user_id)
        .bind(completion.course_id)
        .bind(completion.completed_at)
        .execute(&self.pool)
        .await
        .map_err(db_err("Failed to record course completion"))?;
        Ok(())
    }
}
