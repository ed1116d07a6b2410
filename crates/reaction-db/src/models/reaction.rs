//! Reaction database models

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for the post_reactions table
#[derive(Debug, Clone, FromRow)]
pub struct ReactionModel {
    pub user_id: i64,
    pub post_id: i64,
    pub reaction: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Counter columns of a locked post row
#[derive(Debug, Clone, Copy, FromRow)]
pub struct PostCountersModel {
    pub likes_count: i64,
    pub dislikes_count: i64,
}

/// Post counters joined with one user's reaction
#[derive(Debug, Clone, FromRow)]
pub struct ReactionViewModel {
    pub likes_count: i64,
    pub dislikes_count: i64,
    pub reaction: Option<String>,
}

/// Aggregated reaction count (from query)
#[derive(Debug, Clone, FromRow)]
pub struct ReactionCountModel {
    pub reaction: String,
    pub count: i64,
}
