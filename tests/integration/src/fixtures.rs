//! Test fixtures and data generators
//!
//! Provides reusable request and response bodies for integration tests.

use reaction_common::JwtService;
use reaction_core::UserId;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicI64, Ordering};

/// Secret shared by the test server and token fixtures
pub const TEST_JWT_SECRET: &str = "integration-test-secret";

/// Counter for unique user ids
static USER_COUNTER: AtomicI64 = AtomicI64::new(1_000);

/// Get a user id not used by any other test in this process
pub fn unique_user_id() -> UserId {
    UserId::new(USER_COUNTER.fetch_add(1, Ordering::SeqCst))
}

/// Access token for a user, signed with the test secret
pub fn access_token(user_id: UserId) -> String {
    JwtService::new(TEST_JWT_SECRET)
        .issue_access_token(user_id, Some(format!("user{user_id}")), Some("user".to_string()))
        .unwrap_or_default()
}

/// Reaction request body
#[derive(Debug, Serialize)]
pub struct ReactRequest {
    pub reaction: String,
}

impl ReactRequest {
    pub fn like() -> Self {
        Self::raw("like")
    }

    pub fn dislike() -> Self {
        Self::raw("dislike")
    }

    pub fn raw(reaction: &str) -> Self {
        Self {
            reaction: reaction.to_string(),
        }
    }
}

/// Reaction response body
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ReactionBody {
    pub likes_count: i64,
    pub dislikes_count: i64,
    pub user_reaction: String,
}

impl ReactionBody {
    pub fn new(likes_count: i64, dislikes_count: i64, user_reaction: &str) -> Self {
        Self {
            likes_count,
            dislikes_count,
            user_reaction: user_reaction.to_string(),
        }
    }
}

/// Readiness response body
#[derive(Debug, Deserialize)]
pub struct ReadinessBody {
    pub status: String,
    pub checks: ReadinessChecks,
}

#[derive(Debug, Deserialize)]
pub struct ReadinessChecks {
    pub backend: String,
    pub storage: String,
}

/// Error response
#[derive(Debug, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}
