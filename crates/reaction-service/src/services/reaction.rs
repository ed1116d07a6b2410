//! Reaction store
//!
//! Runs each reaction request as one atomic unit on the configured backend:
//! load the item's counters, load the caller's reaction, [`decide`], write the
//! record change together with the clamped counters, commit. Lost races are
//! rolled back and re-run under a bounded [`RetryPolicy`].

use async_trait::async_trait;
use tracing::{error, info, instrument, warn};

use reaction_core::{
    decide, DomainError, ItemCounters, ItemId, ReactionBackend, ReactionKind, ReactionOutcome,
    ReactionUnit, RepoResult, Transition, UserId,
};

use crate::dto::ReactionResponse;

use super::error::{ServiceError, ServiceResult};
use super::retry::RetryPolicy;

/// Transactional reaction store over a storage backend
#[derive(Debug, Clone)]
pub struct ReactionStore<B> {
    backend: B,
    retry: RetryPolicy,
}

impl<B: ReactionBackend> ReactionStore<B> {
    /// Create a store with the default retry policy
    pub fn new(backend: B) -> Self {
        Self::with_retry(backend, RetryPolicy::default())
    }

    pub fn with_retry(backend: B, retry: RetryPolicy) -> Self {
        Self { backend, retry }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry
    }

    /// Apply `requested` for `user_id` on `item_id`.
    ///
    /// The kind is validated before any storage access. Every error return
    /// leaves storage unchanged.
    #[instrument(skip(self), fields(backend = self.backend.name()))]
    pub async fn set_reaction(
        &self,
        user_id: UserId,
        item_id: ItemId,
        requested: &str,
    ) -> RepoResult<ReactionOutcome> {
        let kind: ReactionKind = requested.parse()?;
        self.set_kind(user_id, item_id, kind).await
    }

    /// Apply an already-validated reaction kind
    pub async fn set_kind(
        &self,
        user_id: UserId,
        item_id: ItemId,
        kind: ReactionKind,
    ) -> RepoResult<ReactionOutcome> {
        let mut attempts = 0;

        loop {
            attempts += 1;

            match self.attempt(user_id, item_id, kind).await {
                Ok((outcome, transition)) => {
                    info!(
                        %user_id,
                        %item_id,
                        transition = transition.name(),
                        likes_count = outcome.likes_count,
                        dislikes_count = outcome.dislikes_count,
                        attempts,
                        "Reaction committed"
                    );
                    return Ok(outcome);
                }
                Err(e) if e.is_retryable() => {
                    if !self.retry.should_retry(attempts) {
                        warn!(%user_id, %item_id, attempts, "Reaction retry budget exhausted");
                        return Err(DomainError::TransientStorageConflict { attempts });
                    }
                    let delay = self.retry.delay_for_attempt(attempts - 1);
                    warn!(
                        %user_id,
                        %item_id,
                        attempts,
                        ?delay,
                        error = %e,
                        "Reaction conflict, retrying"
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(e) => {
                    if matches!(e, DomainError::StorageFailure(_)) {
                        error!(%user_id, %item_id, error = %e, "Reaction storage failure");
                    }
                    return Err(e);
                }
            }
        }
    }

    /// One attempt: a unit that either commits or is rolled back
    async fn attempt(
        &self,
        user_id: UserId,
        item_id: ItemId,
        kind: ReactionKind,
    ) -> RepoResult<(ReactionOutcome, Transition)> {
        let mut unit = self.backend.begin(user_id, item_id).await?;

        match Self::apply(&mut unit, item_id, kind).await {
            Ok(result) => {
                unit.commit().await?;
                Ok(result)
            }
            Err(e) => {
                if let Err(rollback_err) = unit.rollback().await {
                    warn!(%user_id, %item_id, error = %rollback_err, "Rollback failed");
                }
                Err(e)
            }
        }
    }

    async fn apply(
        unit: &mut B::Unit,
        item_id: ItemId,
        kind: ReactionKind,
    ) -> RepoResult<(ReactionOutcome, Transition)> {
        let counters = unit
            .load_counters()
            .await?
            .ok_or(DomainError::ItemNotFound(item_id))?;
        let existing = unit.load_reaction().await?;

        let transition = decide(existing, kind);
        let next = counters.apply(transition.delta());
        unit.write(&transition, next).await?;

        let outcome = ReactionOutcome {
            likes_count: next.likes_count,
            dislikes_count: next.dislikes_count,
            user_reaction: transition.resulting_reaction(),
        };
        Ok((outcome, transition))
    }

    /// Current counters and the caller's reaction, without writing
    #[instrument(skip(self))]
    pub async fn get_reaction(&self, user_id: UserId, item_id: ItemId) -> RepoResult<ReactionOutcome> {
        self.backend
            .read(user_id, item_id)
            .await?
            .ok_or(DomainError::ItemNotFound(item_id))
    }

    /// Counters recomputed from a full scan of the item's records
    pub async fn count_reactions(&self, item_id: ItemId) -> RepoResult<ItemCounters> {
        self.backend.count_reactions(item_id).await
    }
}

/// Object-safe reaction operations for the transport layer
#[async_trait]
pub trait ReactionService: Send + Sync {
    /// Apply a raw reaction string and return the wire response
    async fn react(
        &self,
        user_id: UserId,
        item_id: ItemId,
        reaction: &str,
    ) -> ServiceResult<ReactionResponse>;

    /// Read counters and the caller's reaction
    async fn reaction_state(&self, user_id: UserId, item_id: ItemId) -> ServiceResult<ReactionResponse>;

    async fn health_check(&self) -> ServiceResult<()>;

    fn backend_name(&self) -> &'static str;
}

#[async_trait]
impl<B> ReactionService for ReactionStore<B>
where
    B: ReactionBackend + 'static,
{
    async fn react(
        &self,
        user_id: UserId,
        item_id: ItemId,
        reaction: &str,
    ) -> ServiceResult<ReactionResponse> {
        if item_id.into_inner() <= 0 {
            return Err(ServiceError::validation("Invalid post id"));
        }
        let outcome = self.set_reaction(user_id, item_id, reaction).await?;
        Ok(outcome.into())
    }

    async fn reaction_state(&self, user_id: UserId, item_id: ItemId) -> ServiceResult<ReactionResponse> {
        if item_id.into_inner() <= 0 {
            return Err(ServiceError::validation("Invalid post id"));
        }
        let outcome = self.get_reaction(user_id, item_id).await?;
        Ok(outcome.into())
    }

    async fn health_check(&self) -> ServiceResult<()> {
        self.backend.health_check().await?;
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        self.backend.name()
    }
}
