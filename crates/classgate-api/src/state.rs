//! Application state shared across all handlers and middleware.

use std::sync::Arc;
use std::time::Instant;

use classgate_auth::identity::IdentityProvider;
use classgate_auth::jwt::JwtDecoder;
use classgate_auth::rate_limit::{CacheRateLimiter, MemoryRateLimiter, RateLimiter};
use classgate_core::config::{AppConfig, RateLimitBackend};
use classgate_core::traits::cache::CacheProvider;
use classgate_database::Stores;
use classgate_service::{
    AccessGate, EnrollmentModerationService, EnrollmentService, LiveSessionService,
    PendingExpirySweep, ProviderAdapter, RolePromotion, RoleReconciler, SessionViewGate,
};

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
#[derive(Debug, Clone)]
pub struct AppState {
    // ── Configuration ────────────────────────────────────────
    /// Application configuration
    pub config: Arc<AppConfig>,

    // ── Infrastructure ───────────────────────────────────────
    /// Store bundle (PostgreSQL or in-memory)
    pub stores: Stores,
    /// Cache provider (Redis or in-memory)
    pub cache: Arc<dyn CacheProvider>,

    // ── Auth ─────────────────────────────────────────────────
    /// Bearer token verifier
    pub jwt_decoder: Arc<JwtDecoder>,

    // ── Services ─────────────────────────────────────────────
    /// Enroll and list enrollments
    pub enrollment_service: Arc<EnrollmentService>,
    /// Approve and reject pending requests
    pub moderation_service: Arc<EnrollmentModerationService>,
    /// Live session state machine
    pub live_service: Arc<LiveSessionService>,
    /// Room page presentation
    pub view_gate: Arc<SessionViewGate>,
    /// Role promotion hook, shared with the background reconciler
    pub promotion: RolePromotion,

    /// Process start, for health reporting
    pub started_at: Instant,
}

impl AppState {
    /// Wire every service from configuration and infrastructure handles.
    pub fn new(
        config: AppConfig,
        stores: Stores,
        cache: Arc<dyn CacheProvider>,
        identity: Arc<dyn IdentityProvider>,
    ) -> Self {
        let rate_limiter: Arc<dyn RateLimiter> = match config.enrollment.rate_limit_backend {
            RateLimitBackend::Memory => Arc::new(MemoryRateLimiter::new()),
            RateLimitBackend::Cache => Arc::new(CacheRateLimiter::new(cache.clone())),
        };

        let promotion = RolePromotion::new(stores.users.clone(), identity);
        let gate = AccessGate::new(stores.enrollments.clone(), stores.completions.clone());
        let adapter = ProviderAdapter::new(config.live.embed_base_url.clone());

        let enrollment_service = EnrollmentService::new(
            stores.courses.clone(),
            stores.enrollments.clone(),
            rate_limiter,
            promotion.clone(),
            config.enrollment.clone(),
        );
        let moderation_service = EnrollmentModerationService::new(
            stores.courses.clone(),
            stores.enrollments.clone(),
            promotion.clone(),
        );
        let live_service = LiveSessionService::new(
            stores.live_sessions.clone(),
            stores.courses.clone(),
            gate.clone(),
            adapter.clone(),
        );
        let view_gate = SessionViewGate::new(
            stores.live_sessions.clone(),
            stores.courses.clone(),
            gate,
            adapter,
            config.live.clone(),
        );

        Self {
            jwt_decoder: Arc::new(JwtDecoder::new(&config.auth)),
            config: Arc::new(config),
            stores,
            cache,
            enrollment_service: Arc::new(enrollment_service),
            moderation_service: Arc::new(moderation_service),
            live_service: Arc::new(live_service),
            view_gate: Arc::new(view_gate),
            promotion,
            started_at: Instant::now(),
        }
    }

    /// Reconciler repairing roles from enrollment state.
    pub fn role_reconciler(&self) -> RoleReconciler {
        RoleReconciler::new(
            self.stores.users.clone(),
            self.stores.enrollments.clone(),
            self.promotion.clone(),
        )
    }

    /// Sweep rejecting pending requests older than `max_age_hours`.
    pub fn expiry_sweep(&self, max_age_hours: u64) -> PendingExpirySweep {
        PendingExpirySweep::new(self.stores.enrollments.clone(), max_age_hours)
    }
}
