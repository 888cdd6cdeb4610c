//! Route definitions for the Classgate HTTP API.
//!
//! The router receives `AppState` and passes it to all handlers via
//! Axum's `State` extractor.

use axum::{
    Router, middleware as axum_middleware,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::middleware;
use crate::middleware::cors::build_cors_layer;
use crate::state::AppState;

/// Build the complete Axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = build_cors_layer(&state.config.server.cors);

    Router::new()
        .merge(enrollment_routes())
        .merge(live_routes())
        .merge(health_routes())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(axum_middleware::from_fn(
            middleware::logging::request_logging,
        ))
        .with_state(state)
}

/// Enroll, list own enrollments, moderate requests
fn enrollment_routes() -> Router<AppState> {
    Router::new()
        .route("/enrollments/enroll", post(handlers::enrollment::enroll))
        .route("/enrollments/me", get(handlers::enrollment::list_mine))
        .route(
            "/enrollments/{enrollment_id}/approve",
            post(handlers::enrollment::approve),
        )
        .route(
            "/enrollments/{enrollment_id}/reject",
            post(handlers::enrollment::reject),
        )
}

/// Live session status, scheduling, cancellation, room view
fn live_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/live/status",
            get(handlers::live::get_status).post(handlers::live::set_status),
        )
        .route("/live/rooms", post(handlers::live::schedule))
        .route("/live/rooms/{room_id}/cancel", post(handlers::live::cancel))
        .route("/live/rooms/{room_id}/view", get(handlers::live::view))
}

fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health::health))
}
