//! Health check handlers
//!
//! Endpoints for liveness and readiness probes.

use agora_service::{HealthResponse, ReadinessResponse};
use axum::{extract::State, http::StatusCode, Json};

use crate::state::AppState;

/// GET /health
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}

/// GET /health/ready
///
/// Unconfigured dependencies report as disabled and do not fail readiness.
pub async fn readiness_check(
    State(state): State<AppState>,
) -> (StatusCode, Json<ReadinessResponse>) {
    let ctx = state.service_context();

    let database = match ctx.pool() {
        Some(pool) => Some(pool.acquire().await.is_ok()),
        None => None,
    };
    let cache = match ctx.cache() {
        Some(cache) => Some(cache.ping().await),
        None => None,
    };

    let response = ReadinessResponse::ready(database, cache);
    let status = if response.is_ready() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status, Json(response))
}
