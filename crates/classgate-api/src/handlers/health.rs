//! Health check handler.

use axum::Json;
use axum::extract::State;

use crate::dto::response::{ApiResponse, HealthResponse};
use crate::state::AppState;

/// GET /health
pub async fn health(State(state): State<AppState>) -> Json<ApiResponse<HealthResponse>> {
    let database_ok = state.stores.health_check().await.unwrap_or(false);
    let cache_ok = state.cache.health_check().await.unwrap_or(false);

    if !database_ok || !cache_ok {
        tracing::warn!(database_ok, cache_ok, "Health check degraded");
    }

    Json(ApiResponse::ok(HealthResponse {
        status: if database_ok && cache_ok { "ok" } else { "degraded" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.started_at.elapsed().as_secs(),
        database: if database_ok { "connected" } else { "unavailable" }.to_string(),
        cache: if cache_ok { "connected" } else { "unavailable" }.to_string(),
    }))
}
