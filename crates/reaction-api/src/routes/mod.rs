//! Route definitions
//!
//! API routes are mounted under /api/v1; health routes sit at the root.

use axum::{
    routing::{get, post},
    Router,
};

use crate::handlers::{health, reactions};
use crate::state::AppState;

/// Create the main API router (excluding health for separate middleware handling)
pub fn create_router() -> Router<AppState> {
    Router::new().nest("/api/v1", api_v1_routes())
}

/// Health check routes (exported separately so they skip CORS)
pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
}

/// API v1 routes
fn api_v1_routes() -> Router<AppState> {
    Router::new().merge(post_routes())
}

/// Post reaction routes
fn post_routes() -> Router<AppState> {
    Router::new()
        .route("/posts/:post_id/react", post(reactions::react))
        .route("/posts/:post_id/reactions", get(reactions::get_reactions))
}
