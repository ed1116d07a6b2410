//! Response DTOs

use chrono::{DateTime, Utc};
use reaction_core::ReactionOutcome;
use serde::{Deserialize, Serialize};

/// Counters and the caller's reaction after (or without) a change
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReactionResponse {
    pub likes_count: i64,
    pub dislikes_count: i64,
    /// `"like"`, `"dislike"`, or `""` when the caller holds no reaction
    pub user_reaction: String,
}

impl From<ReactionOutcome> for ReactionResponse {
    fn from(outcome: ReactionOutcome) -> Self {
        Self {
            likes_count: outcome.likes_count,
            dislikes_count: outcome.dislikes_count,
            user_reaction: outcome.user_reaction_str().to_string(),
        }
    }
}

/// Health check response
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
}

impl HealthResponse {
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: Utc::now(),
        }
    }
}

/// Readiness check response
#[derive(Debug, Clone, Serialize)]
pub struct ReadinessResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub checks: HealthChecks,
}

/// Health check status of the storage backend
#[derive(Debug, Clone, Serialize)]
pub struct HealthChecks {
    pub backend: String,
    pub storage: String,
}

impl ReadinessResponse {
    pub fn ready(backend: &str, storage_healthy: bool) -> Self {
        Self {
            status: if storage_healthy { "ready" } else { "not_ready" }.to_string(),
            timestamp: Utc::now(),
            checks: HealthChecks {
                backend: backend.to_string(),
                storage: if storage_healthy { "healthy" } else { "unhealthy" }.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reaction_core::ReactionKind;

    #[test]
    fn test_reaction_response_wire_form() {
        let response = ReactionResponse::from(ReactionOutcome {
            likes_count: 1,
            dislikes_count: 0,
            user_reaction: Some(ReactionKind::Like),
        });
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"likes_count": 1, "dislikes_count": 0, "user_reaction": "like"})
        );
    }

    #[test]
    fn test_cleared_reaction_is_empty_string() {
        let response = ReactionResponse::from(ReactionOutcome {
            likes_count: 0,
            dislikes_count: 0,
            user_reaction: None,
        });
        assert_eq!(response.user_reaction, "");
    }

    #[test]
    fn test_health_response() {
        let health = HealthResponse::healthy();
        assert_eq!(health.status, "healthy");
    }

    #[test]
    fn test_readiness_response() {
        let ready = ReadinessResponse::ready("memory", true);
        assert_eq!(ready.status, "ready");
        assert_eq!(ready.checks.backend, "memory");
        assert_eq!(ready.checks.storage, "healthy");

        let not_ready = ReadinessResponse::ready("postgres", false);
        assert_eq!(not_ready.status, "not_ready");
        assert_eq!(not_ready.checks.storage, "unhealthy");
    }
}
