//! Health check handlers
//!
//! Endpoints for liveness and readiness probes.

use axum::{extract::State, http::StatusCode, Json};
use reaction_service::dto::{HealthResponse, ReadinessResponse};

use crate::state::AppState;

/// Basic health check (liveness probe)
///
/// GET /health
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}

/// Readiness check that pings the storage backend
///
/// GET /health/ready
pub async fn readiness_check(State(state): State<AppState>) -> (StatusCode, Json<ReadinessResponse>) {
    let reactions = state.reactions();

    let storage_healthy = match reactions.health_check().await {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(backend = reactions.backend_name(), error = %e, "Storage health check failed");
            false
        }
    };

    let response = ReadinessResponse::ready(reactions.backend_name(), storage_healthy);
    let status = if storage_healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status, Json(response))
}
