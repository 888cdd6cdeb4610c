//! Course repository implementation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use classgate_core::result::AppResult;
use classgate_core::types::{CourseId, UserId};
use classgate_entity::course::{Course, Price};

use super::db_err;
use crate::store::CourseStore;

#[derive(Debug, sqlx::FromRow)]
struct CourseRow {
    id: Uuid,
    slug: String,
    title: String,
    instructor_id: Uuid,
    price_amount: Option<i64>,
    price_currency: Option<String>,
    created_at: DateTime<Utc>,
}

impl From<CourseRow> for Course {
    fn from(row: CourseRow) -> Self {
        let price = match (row.price_amount, row.price_currency) {
            (Some(amount), Some(currency)) => Some(Price { amount, currency }),
            _ => None,
        };
        Course {
            id: CourseId::from_uuid(row.id),
            slug: row.slug,
            title: row.title,
            instructor_id: UserId::from_uuid(row.instructor_id),
            price,
            created_at: row.created_at,
        }
    }
}

/// PostgreSQL-backed [`CourseStore`].
#[derive(Debug, Clone)]
pub struct CourseRepository {
    pool: PgPool,
}

impl CourseRepository {
    /// Create a new course repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CourseStore for CourseRepository {
    async fn find_by_id(&self, id: CourseId) -> AppResult<Option<Course>> {
        let row = sqlx::query_as::<_, CourseRow>("SELECT * FROM courses WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err("Failed to find course by id"))?;
        Ok(row.map(Course::from))
    }

    async fn find_by_slug(&self, slug: &str) -> AppResult<Option<Course>> {
        let row = sqlx::query_as::<_, CourseRow>("SELECT * FROM courses WHERE slug = $1")
            .bind(slug)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err("Failed to find course by slug"))?;
        Ok(row.map(Course::from))
    }

    async fn insert(&self, course: &Course) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO courses (id, slug, title, instructor_id, price_amount, price_currency, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7)",
        )
        .bind(course.id)
        .bind(&course.slug)
        .bind(&course.title)
        .bind(course.instructor_id)
        .bind(course.price.as_ref().map(|p| p.amount))
        .bind(course.price.as_ref().map(|p| p.currency.as_str()))
        .bind(course.created_at)
        .execute(&self.pool)
        .await
        .map_err(db_err("Failed to insert course"))?;
        Ok(())
    }
}
