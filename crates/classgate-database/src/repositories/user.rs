//! User repository implementation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use classgate_core::result::AppResult;
use classgate_core::types::UserId;
use classgate_entity::user::{User, UserRole};

use super::{db_err, decode_column};
use crate::store::UserStore;

#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: Uuid,
    email: Option<String>,
    display_name: Option<String>,
    role: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = classgate_core::AppError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        Ok(User {
            id: UserId::from_uuid(row.id),
            email: row.email,
            display_name: row.display_name,
            role: decode_column("users", "role", &row.role)?,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// PostgreSQL-backed [`UserStore`].
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    /// Create a new user repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for UserRepository {
    async fn find_by_id(&self, id: UserId) -> AppResult<Option<User>> {
        sqlx::query_as::<_, UserRow>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err("Failed to find user by id"))?
            .map(User::try_from)
            .transpose()
    }

    async fn save(&self, user: &User) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO users (id, email, display_name, role, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             ON CONFLICT (id) DO UPDATE SET \
                email = EXCLUDED.email, \
                display_name = EXCLUDED.display_name, \
                role = EXCLUDED.role, \
                updated_at = EXCLUDED.updated_at",
        )
        .bind(user.id)
        .bind(&user.email)
        .bind(&user.display_name)
        .bind(user.role.as_str())
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await
        .map_err(db_err("Failed to save user"))?;
        Ok(())
    }

    async fn set_role(&self, id: UserId, role: UserRole, at: DateTime<Utc>) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO users (id, role, created_at, updated_at) VALUES ($1, $2, $3, $3) \
             ON CONFLICT (id) DO UPDATE SET role = EXCLUDED.role, updated_at = EXCLUDED.updated_at",
        )
        .bind(id)
        .bind(role.as_str())
        .bind(at)
        .execute(&self.pool)
        .await
        .map_err(db_err("Failed to update user role"))?;
        Ok(())
    }

    async fn list_by_role(&self, role: UserRole) -> AppResult<Vec<User>> {
        sqlx::query_as::<_, UserRow>("SELECT * FROM users WHERE role = $1 ORDER BY created_at")
            .bind(role.as_str())
            .fetch_all(&self.pool)
            .await
            .map_err(db_err("Failed to list users by role"))?
            .into_iter()
            .map(User::try_from)
            .collect()
    }
}
