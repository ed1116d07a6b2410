//! Reaction entity - one identity's like or dislike on one content item

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::DomainError;
use crate::value_objects::{ItemId, UserId};

/// The two reaction kinds a record may hold.
///
/// There is no "none" kind: the absence of a [`ReactionRecord`] means the
/// identity has no reaction on the item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReactionKind {
    Like,
    Dislike,
}

impl ReactionKind {
    pub const LIKE: &'static str = "like";
    pub const DISLIKE: &'static str = "dislike";

    /// Wire and storage representation
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Like => Self::LIKE,
            Self::Dislike => Self::DISLIKE,
        }
    }
}

impl fmt::Display for ReactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// Exact match only: "Like" or " like" are rejected.
impl std::str::FromStr for ReactionKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            Self::LIKE => Ok(Self::Like),
            Self::DISLIKE => Ok(Self::Dislike),
            other => Err(DomainError::InvalidReaction(other.to_string())),
        }
    }
}

/// Stored reaction of one identity on one item
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReactionRecord {
    pub user_id: UserId,
    pub item_id: ItemId,
    pub kind: ReactionKind,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ReactionRecord {
    /// Create a new ReactionRecord
    pub fn new(user_id: UserId, item_id: ItemId, kind: ReactionKind) -> Self {
        let now = Utc::now();
        Self {
            user_id,
            item_id,
            kind,
            created_at: now,
            updated_at: now,
        }
    }

    /// Switch the stored kind in place
    pub fn switch_to(&mut self, kind: ReactionKind) {
        self.kind = kind;
        self.updated_at = Utc::now();
    }
}

/// Result of a committed reaction change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReactionOutcome {
    pub likes_count: i64,
    pub dislikes_count: i64,
    /// The caller's reaction after the change, `None` once cleared
    pub user_reaction: Option<ReactionKind>,
}

impl ReactionOutcome {
    /// User reaction as rendered on the wire (`""` when cleared)
    #[must_use]
    pub fn user_reaction_str(&self) -> &'static str {
        self.user_reaction.map_or("", ReactionKind::as_str)
    }
}
