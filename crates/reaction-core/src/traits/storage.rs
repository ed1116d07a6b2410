//! Transactional storage boundary for reactions
//!
//! A backend hands out one [`ReactionUnit`] per attempt. The unit is an atomic
//! unit of work scoped to a single (identity, item) pair: everything read and
//! written through it commits together or not at all. Backends differ in how
//! they isolate units (row locks, optimistic version checks), but all of them
//! must satisfy the same contract:
//!
//! - `load_counters` and `load_reaction` observe a state that no concurrent
//!   unit on the same item can change before this unit commits, or `commit`
//!   fails with [`DomainError::StorageConflict`].
//! - At most one reaction per pair is ever stored, enforced by the backend.
//! - Dropping a unit without `commit` leaves storage untouched.

use async_trait::async_trait;

use crate::entities::{ItemCounters, ReactionKind, ReactionOutcome};
use crate::error::DomainError;
use crate::policy::Transition;
use crate::value_objects::{ItemId, UserId};

/// Result type for storage operations
pub type RepoResult<T> = Result<T, DomainError>;

#[async_trait]
pub trait ReactionBackend: Send + Sync {
    /// Atomic unit type handed out by this backend
    type Unit: ReactionUnit;

    /// Open an atomic unit for one (identity, item) pair
    async fn begin(&self, user_id: UserId, item_id: ItemId) -> RepoResult<Self::Unit>;

    /// Read committed counters and the identity's reaction without writing.
    /// Returns `None` when the item does not exist.
    async fn read(&self, user_id: UserId, item_id: ItemId) -> RepoResult<Option<ReactionOutcome>>;

    /// Count stored records per kind for an item (full record scan)
    async fn count_reactions(&self, item_id: ItemId) -> RepoResult<ItemCounters>;

    /// Check the backend is reachable
    async fn health_check(&self) -> RepoResult<()>;

    /// Backend name for logs and health output
    fn name(&self) -> &'static str;
}

#[async_trait]
pub trait ReactionUnit: Send {
    /// Load the item's counters, `None` if the item does not exist
    async fn load_counters(&mut self) -> RepoResult<Option<ItemCounters>>;

    /// Load the identity's current reaction on the item
    async fn load_reaction(&mut self) -> RepoResult<Option<ReactionKind>>;

    /// Stage the record mutation for `transition` and the new counter values
    async fn write(&mut self, transition: &Transition, counters: ItemCounters) -> RepoResult<()>;

    /// Commit everything staged in this unit
    async fn commit(self) -> RepoResult<()>;

    /// Abort the unit, discarding staged writes
    async fn rollback(self) -> RepoResult<()>;
}
