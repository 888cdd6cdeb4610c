//! Store bundle handed to the service layer.

use std::sync::Arc;

use tracing::info;

use classgate_core::config::{DatabaseBackend, DatabaseConfig};
use classgate_core::result::AppResult;

use crate::connection::DatabasePool;
use crate::memory::MemoryStore;
use crate::repositories::{
    CompletionRepository, CourseRepository, EnrollmentRepository, LiveSessionRepository,
    UserRepository,
};
use crate::store::{CompletionStore, CourseStore, EnrollmentStore, LiveSessionStore, UserStore};

/// One handle per store contract, all backed by the same backend.
#[derive(Debug, Clone)]
pub struct Stores {
    /// Local user records.
    pub users: Arc<dyn UserStore>,
    /// Course catalog.
    pub courses: Arc<dyn CourseStore>,
    /// Enrollment records.
    pub enrollments: Arc<dyn EnrollmentStore>,
    /// Completion records.
    pub completions: Arc<dyn CompletionStore>,
    /// Live sessions.
    pub live_sessions: Arc<dyn LiveSessionStore>,
    pool: Option<DatabasePool>,
}

impl Stores {
    /// Build the bundle selected by `config.backend`.
    pub async fn from_config(config: &DatabaseConfig) -> AppResult<Self> {
        match config.backend {
            DatabaseBackend::Postgres => {
                let pool = DatabasePool::connect(config).await?;
                Ok(Self::postgres(pool))
            }
            DatabaseBackend::Memory => {
                info!("Using in-memory store backend");
                Ok(Self::in_memory(Arc::new(MemoryStore::new())))
            }
        }
    }

    /// PostgreSQL repositories sharing one pool.
    pub fn postgres(pool: DatabasePool) -> Self {
        let pg = pool.pool().clone();
        Self {
            users: Arc::new(UserRepository::new(pg.clone())),
            courses: Arc::new(CourseRepository::new(pg.clone())),
            enrollments: Arc::new(EnrollmentRepository::new(pg.clone())),
            completions: Arc::new(CompletionRepository::new(pg.clone())),
            live_sessions: Arc::new(LiveSessionRepository::new(pg)),
            pool: Some(pool),
        }
    }

    /// Every contract served by one in-memory store.
    pub fn in_memory(store: Arc<MemoryStore>) -> Self {
        Self {
            users: store.clone(),
            courses: store.clone(),
            enrollments: store.clone(),
            completions: store.clone(),
            live_sessions: store,
            pool: None,
        }
    }

    /// Backend health; the in-memory backend is always healthy.
    pub async fn health_check(&self) -> AppResult<bool> {
        match &self.pool {
            Some(pool) => pool.health_check().await,
            None => Ok(true),
        }
    }

    /// Release backend resources.
    pub async fn close(&self) {
        if let Some(pool) = &self.pool {
            pool.close().await;
        }
    }
}
