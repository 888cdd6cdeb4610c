//! Fixtures shared by the unit tests in this crate.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::Utc;

use classgate_auth::identity::IdentityProvider;
use classgate_core::error::AppError;
use classgate_core::result::AppResult;
use classgate_core::types::{CourseId, UserId};
use classgate_database::{MemoryStore, Stores};
use classgate_entity::course::{Course, Price};
use classgate_entity::user::UserRole;

/// Identity provider that counts calls and optionally fails them.
#[derive(Debug, Default)]
pub struct RecordingIdentity {
    pub fail: bool,
    pub calls: AtomicUsize,
}

impl RecordingIdentity {
    pub fn failing() -> Self {
        Self {
            fail: true,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl IdentityProvider for RecordingIdentity {
    async fn set_role(&self, _user_id: UserId, _role: UserRole) -> AppResult<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            Err(AppError::upstream_partial_failure("identity provider unavailable"))
        } else {
            Ok(())
        }
    }
}

pub fn stores() -> (Stores, Arc<MemoryStore>) {
    let memory = Arc::new(MemoryStore::new());
    (Stores::in_memory(memory.clone()), memory)
}

pub async fn seed_course(stores: &Stores, slug: &str, price: Option<i64>) -> Course {
    let course = Course {
        id: CourseId::new(),
        slug: slug.to_string(),
        title: slug.replace('-', " "),
        instructor_id: UserId::new(),
        price: price.map(|amount| Price {
            amount,
            currency: "USD".to_string(),
        }),
        created_at: Utc::now(),
    };
    stores.courses.insert(&course).await.unwrap();
    course
}
