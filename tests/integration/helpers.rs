//! Shared test helpers for integration tests.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use chrono::Utc;
use serde_json::Value;
use tower::ServiceExt;

use classgate_api::{AppState, build_router};
use classgate_auth::identity::IdentityProvider;
use classgate_auth::jwt::JwtEncoder;
use classgate_cache::memory::MemoryCacheProvider;
use classgate_core::config::AppConfig;
use classgate_core::error::AppError;
use classgate_core::result::AppResult;
use classgate_core::types::{CourseId, UserId};
use classgate_database::{MemoryStore, Stores};
use classgate_entity::course::{Course, CourseCompletion, Price};
use classgate_entity::user::{User, UserRole};

/// Identity provider double recording every role write.
#[derive(Debug, Default)]
pub struct RecordingIdentity {
    pub fail: Mutex<bool>,
    pub writes: Mutex<Vec<(UserId, UserRole)>>,
}

impl RecordingIdentity {
    pub fn set_failing(&self, fail: bool) {
        *self.fail.lock().unwrap() = fail;
    }

    pub fn writes_for(&self, user_id: UserId) -> Vec<UserRole> {
        self.writes
            .lock()
            .unwrap()
            .iter()
            .filter(|(id, _)| *id == user_id)
            .map(|(_, role)| *role)
            .collect()
    }
}

#[async_trait]
impl IdentityProvider for RecordingIdentity {
    async fn set_role(&self, user_id: UserId, role: UserRole) -> AppResult<()> {
        if *self.fail.lock().unwrap() {
            return Err(AppError::upstream_partial_failure("identity provider unavailable"));
        }
        self.writes.lock().unwrap().push((user_id, role));
        Ok(())
    }
}

/// A seeded user and a bearer token for them.
#[derive(Debug, Clone)]
pub struct TestUser {
    pub id: UserId,
    pub role: UserRole,
    pub token: String,
}

/// Test application context
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// Shared state, for building extra routers or background jobs
    pub state: AppState,
    /// Backing store, for direct inspection
    pub memory: Arc<MemoryStore>,
    /// Identity provider double
    pub identity: Arc<RecordingIdentity>,
    /// Application config
    pub config: AppConfig,
    encoder: JwtEncoder,
}

impl std::fmt::Debug for TestApp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TestApp").finish_non_exhaustive()
    }
}

impl TestApp {
    /// Create a new test application on the in-memory backend
    pub fn new() -> Self {
        Self::with_config(test_config())
    }

    /// Create a test application with custom configuration
    pub fn with_config(config: AppConfig) -> Self {
        let memory = Arc::new(MemoryStore::new());
        let stores = Stores::in_memory(memory.clone());
        let identity = Arc::new(RecordingIdentity::default());
        let state = AppState::new(
            config.clone(),
            stores,
            Arc::new(MemoryCacheProvider::new()),
            identity.clone(),
        );

        Self {
            router: build_router(state.clone()),
            state,
            memory,
            identity,
            encoder: JwtEncoder::new(&config.auth),
            config,
        }
    }

    /// Mint a bearer token
    pub fn token(&self, user_id: UserId, role: UserRole) -> String {
        self.encoder
            .issue(user_id, role, chrono::Duration::hours(1))
            .expect("Failed to sign token")
    }

    /// Create a local user record and a token carrying the same role
    pub async fn create_user(&self, role: UserRole) -> TestUser {
        let id = UserId::new();
        let mut user = User::new(id, None, None);
        user.role = role;
        self.state
            .stores
            .users
            .save(&user)
            .await
            .expect("Failed to save user");
        TestUser {
            id,
            role,
            token: self.token(id, role),
        }
    }

    /// A caller known only through the token (no local record yet)
    pub fn token_only_user(&self, role: UserRole) -> TestUser {
        let id = UserId::new();
        TestUser {
            id,
            role,
            token: self.token(id, role),
        }
    }

    /// Current local role of a user
    pub async fn local_role(&self, user_id: UserId) -> Option<UserRole> {
        self.state
            .stores
            .users
            .find_by_id(user_id)
            .await
            .expect("Failed to read user")
            .map(|u| u.role)
    }

    /// Seed a course; `price` in minor units of USD
    pub async fn create_course(
        &self,
        slug: &str,
        price: Option<i64>,
        instructor_id: UserId,
    ) -> Course {
        let course = Course {
            id: CourseId::new(),
            slug: slug.to_string(),
            title: slug.replace('-', " "),
            instructor_id,
            price: price.map(|amount| Price {
                amount,
                currency: "USD".to_string(),
            }),
            created_at: Utc::now(),
        };
        self.state
            .stores
            .courses
            .insert(&course)
            .await
            .expect("Failed to insert course");
        course
    }

    /// Record that a user finished a course
    pub async fn complete_course(&self, user_id: UserId, course_id: CourseId) {
        self.state
            .stores
            .completions
            .record(&CourseCompletion {
                user_id,
                course_id,
                completed_at: Utc::now(),
            })
            .await
            .expect("Failed to record completion");
    }

    /// Enroll through the API and return the response
    pub async fn enroll(&self, user: &TestUser, course: &Course, manual: bool) -> TestResponse {
        self.request(
            "POST",
            "/enrollments/enroll",
            Some(serde_json::json!({
                "courseId": course.id,
                "manualEnrollment": manual,
            })),
            Some(&user.token),
        )
        .await
    }

    /// Schedule a Jitsi session through the API and return its room id
    pub async fn schedule_session(&self, owner: &TestUser, course_id: Option<CourseId>) -> String {
        let response = self
            .request(
                "POST",
                "/live/rooms",
                Some(serde_json::json!({
                    "title": "Cell biology Q&A",
                    "provider": "jitsi",
                    "courseId": course_id,
                })),
                Some(&owner.token),
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "{:?}", response.body);
        response.body["data"]["roomId"]
            .as_str()
            .expect("No roomId in schedule response")
            .to_string()
    }

    /// Drive a session through `POST /live/status`
    pub async fn set_status(&self, user: &TestUser, room_id: &str, status: &str) -> TestResponse {
        self.request(
            "POST",
            "/live/status",
            Some(serde_json::json!({ "roomId": room_id, "status": status })),
            Some(&user.token),
        )
        .await
    }

    /// Read `GET /live/status`
    pub async fn get_status(&self, user: &TestUser, room_id: &str) -> TestResponse {
        self.request(
            "GET",
            &format!("/live/status?roomId={room_id}"),
            None,
            Some(&user.token),
        )
        .await
    }

    /// Read `GET /live/rooms/{room_id}/view`
    pub async fn view(&self, user: &TestUser, room_id: &str) -> TestResponse {
        self.request(
            "GET",
            &format!("/live/rooms/{room_id}/view"),
            None,
            Some(&user.token),
        )
        .await
    }

    /// Make an HTTP request to the test app
    pub async fn request(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> TestResponse {
        let body_str = body
            .map(|b| serde_json::to_string(&b).expect("Failed to serialize body"))
            .unwrap_or_default();

        let mut req = Request::builder()
            .method(method)
            .uri(path)
            .header("Content-Type", "application/json");

        if let Some(token) = token {
            req = req.header("Authorization", format!("Bearer {token}"));
        }

        let req = req
            .body(Body::from(body_str))
            .expect("Failed to build request");

        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("Failed to read body");

        let body: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

        TestResponse { status, body }
    }
}

/// Configuration used by every integration test
pub fn test_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.auth.jwt_secret = "integration-test-secret".to_string();
    config.logging.format = "pretty".to_string();
    config
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Parsed JSON body
    pub body: Value,
}
