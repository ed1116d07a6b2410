//! Reaction handlers
//!
//! Endpoints for liking and disliking posts.

use axum::{
    extract::{Path, State},
    Json,
};
use reaction_core::{ItemId, UserId};
use reaction_service::dto::{ReactionRequest, ReactionResponse};
use tracing::error;

use crate::extractors::{AuthUser, JsonBody, PostIdPath};
use crate::response::{ApiError, ApiResult};
use crate::state::AppState;

/// Log server-side failures with the pair they concern
fn log_failure(err: ApiError, user_id: UserId, post_id: ItemId) -> ApiError {
    if err.is_server_error() {
        error!(%user_id, %post_id, error = %err, code = err.error_code(), "Reaction request failed");
    }
    err
}

/// Like, dislike, or toggle off the caller's reaction
///
/// POST /posts/{post_id}/react
pub async fn react(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(path): Path<PostIdPath>,
    JsonBody(req): JsonBody<ReactionRequest>,
) -> ApiResult<Json<ReactionResponse>> {
    let post_id = path.post_id()?;

    let response = state
        .reactions()
        .react(auth.user_id, post_id, &req.reaction)
        .await
        .map_err(|e| log_failure(e.into(), auth.user_id, post_id))?;

    Ok(Json(response))
}

/// Current counters and the caller's reaction
///
/// GET /posts/{post_id}/reactions
pub async fn get_reactions(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(path): Path<PostIdPath>,
) -> ApiResult<Json<ReactionResponse>> {
    let post_id = path.post_id()?;

    let response = state
        .reactions()
        .reaction_state(auth.user_id, post_id)
        .await
        .map_err(|e| log_failure(e.into(), auth.user_id, post_id))?;

    Ok(Json(response))
}
