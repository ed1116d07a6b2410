//! Domain errors - error types for the domain layer

use thiserror::Error;

use crate::value_objects::ItemId;

/// Domain layer errors
#[derive(Debug, Error)]
pub enum DomainError {
    // =========================================================================
    // Validation Errors
    // =========================================================================
    #[error("Invalid reaction: {0:?} (expected \"like\" or \"dislike\")")]
    InvalidReaction(String),

    // =========================================================================
    // Not Found Errors
    // =========================================================================
    #[error("Item not found: {0}")]
    ItemNotFound(ItemId),

    // =========================================================================
    // Conflict Errors
    // =========================================================================
    /// A single attempt lost a race with a concurrent writer
    #[error("Storage conflict: {0}")]
    StorageConflict(String),

    /// Conflicts persisted across the whole retry budget
    #[error("Storage conflict persisted after {attempts} attempts")]
    TransientStorageConflict { attempts: u32 },

    // =========================================================================
    // Infrastructure Errors (wrapped)
    // =========================================================================
    #[error("Storage failure: {0}")]
    StorageFailure(String),
}

impl DomainError {
    /// Get an error code string for API responses
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidReaction(_) => "INVALID_REACTION",
            Self::ItemNotFound(_) => "UNKNOWN_ITEM",
            Self::StorageConflict(_) => "STORAGE_CONFLICT",
            Self::TransientStorageConflict { .. } => "TRANSIENT_STORAGE_CONFLICT",
            Self::StorageFailure(_) => "STORAGE_FAILURE",
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::ItemNotFound(_))
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::InvalidReaction(_))
    }

    /// Check if this is a storage conflict, retried or not
    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            Self::StorageConflict(_) | Self::TransientStorageConflict { .. }
        )
    }

    /// Check if the whole atomic unit may be re-run
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::StorageConflict(_))
    }

    /// Create a conflict error
    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::StorageConflict(msg.into())
    }

    /// Create a storage failure error
    pub fn storage(msg: impl Into<String>) -> Self {
        Self::StorageFailure(msg.into())
    }
}
