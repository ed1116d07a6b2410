//! PostgreSQL implementation of ReactionBackend
//!
//! Each unit is one transaction. `load_counters` takes `SELECT ... FOR UPDATE`
//! on the post row, so every writer on the same post queues behind that lock
//! and the reaction read that follows cannot go stale before commit. The
//! `(user_id, post_id)` primary key backs up the at-most-one-record rule.

use std::time::Duration;

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Transaction};
use tracing::{debug, instrument};

use reaction_core::entities::{ItemCounters, ReactionKind, ReactionOutcome, ReactionRecord};
use reaction_core::policy::{RecordChange, Transition};
use reaction_core::traits::{ReactionBackend, ReactionUnit, RepoResult};
use reaction_core::value_objects::{ItemId, UserId};

use crate::mappers::parse_stored_kind;
use crate::models::{PostCountersModel, ReactionCountModel, ReactionModel, ReactionViewModel};

use super::error::{item_not_found, map_db_error};

/// `lock_timeout` value for `set_config`. Postgres reads `0` as no limit,
/// so anything under a millisecond is raised to one.
fn lock_timeout_setting(timeout: Duration) -> String {
    format!("{}ms", timeout.as_millis().max(1))
}

/// PostgreSQL implementation of ReactionBackend
#[derive(Clone)]
pub struct PgReactionBackend {
    pool: PgPool,
    lock_timeout: Duration,
}

impl PgReactionBackend {
    /// Create a new PgReactionBackend
    pub fn new(pool: PgPool, lock_timeout: Duration) -> Self {
        Self { pool, lock_timeout }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Fetch the stored record for a pair
    #[instrument(skip(self))]
    pub async fn find_record(
        &self,
        user_id: UserId,
        item_id: ItemId,
    ) -> RepoResult<Option<ReactionRecord>> {
        let result = sqlx::query_as::<_, ReactionModel>(
            r#"
            SELECT user_id, post_id, reaction, created_at, updated_at
            FROM post_reactions
            WHERE user_id = $1 AND post_id = $2
            "#,
        )
        .bind(user_id.into_inner())
        .bind(item_id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        result.map(ReactionRecord::try_from).transpose()
    }

    /// Insert a post with zeroed counters and return its id
    #[instrument(skip(self))]
    pub async fn create_item(&self, title: &str) -> RepoResult<ItemId> {
        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO posts (title)
            VALUES ($1)
            RETURNING id
            "#,
        )
        .bind(title)
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(ItemId::new(id))
    }
}

impl std::fmt::Debug for PgReactionBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PgReactionBackend")
            .field("lock_timeout", &self.lock_timeout)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl ReactionBackend for PgReactionBackend {
    type Unit = PgReactionUnit;

    #[instrument(skip(self))]
    async fn begin(&self, user_id: UserId, item_id: ItemId) -> RepoResult<PgReactionUnit> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        // Scoped to this transaction; a lock wait past this raises 55P03
        sqlx::query("SELECT set_config('lock_timeout', $1, true)")
            .bind(lock_timeout_setting(self.lock_timeout))
            .execute(&mut *tx)
            .await
            .map_err(map_db_error)?;

        Ok(PgReactionUnit {
            tx,
            user_id,
            item_id,
        })
    }

    #[instrument(skip(self))]
    async fn read(&self, user_id: UserId, item_id: ItemId) -> RepoResult<Option<ReactionOutcome>> {
        let result = sqlx::query_as::<_, ReactionViewModel>(
            r#"
            SELECT p.likes_count, p.dislikes_count, r.reaction
            FROM posts p
            LEFT JOIN post_reactions r ON r.post_id = p.id AND r.user_id = $2
            WHERE p.id = $1
            "#,
        )
        .bind(item_id.into_inner())
        .bind(user_id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        result.map(ReactionOutcome::try_from).transpose()
    }

    #[instrument(skip(self))]
    async fn count_reactions(&self, item_id: ItemId) -> RepoResult<ItemCounters> {
        let rows = sqlx::query_as::<_, ReactionCountModel>(
            r#"
            SELECT reaction, COUNT(*) as count
            FROM post_reactions
            WHERE post_id = $1
            GROUP BY reaction
            "#,
        )
        .bind(item_id.into_inner())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        let mut counters = ItemCounters::default();
        for row in rows {
            match parse_stored_kind(&row.reaction)? {
                ReactionKind::Like => counters.likes_count = row.count,
                ReactionKind::Dislike => counters.dislikes_count = row.count,
            }
        }
        Ok(counters)
    }

    async fn health_check(&self) -> RepoResult<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;
        Ok(())
    }

    fn name(&self) -> &'static str {
        "postgres"
    }
}

/// One reaction transaction on a (user, post) pair
pub struct PgReactionUnit {
    tx: Transaction<'static, Postgres>,
    user_id: UserId,
    item_id: ItemId,
}

#[async_trait]
impl ReactionUnit for PgReactionUnit {
    async fn load_counters(&mut self) -> RepoResult<Option<ItemCounters>> {
        let result = sqlx::query_as::<_, PostCountersModel>(
            r#"
            SELECT likes_count, dislikes_count
            FROM posts
            WHERE id = $1
            FOR UPDATE
            "#,
        )
        .bind(self.item_id.into_inner())
        .fetch_optional(&mut *self.tx)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(ItemCounters::from))
    }

    async fn load_reaction(&mut self) -> RepoResult<Option<ReactionKind>> {
        let stored: Option<String> = sqlx::query_scalar(
            r#"
            SELECT reaction
            FROM post_reactions
            WHERE user_id = $1 AND post_id = $2
            "#,
        )
        .bind(self.user_id.into_inner())
        .bind(self.item_id.into_inner())
        .fetch_optional(&mut *self.tx)
        .await
        .map_err(map_db_error)?;

        stored.as_deref().map(parse_stored_kind).transpose()
    }

    async fn write(&mut self, transition: &Transition, counters: ItemCounters) -> RepoResult<()> {
        let user_id = self.user_id.into_inner();
        let post_id = self.item_id.into_inner();

        let affected = match transition.record_change() {
            RecordChange::Insert(kind) => sqlx::query(
                r#"
                INSERT INTO post_reactions (user_id, post_id, reaction)
                VALUES ($1, $2, $3)
                "#,
            )
            .bind(user_id)
            .bind(post_id)
            .bind(kind.as_str())
            .execute(&mut *self.tx)
            .await,
            RecordChange::Delete => sqlx::query(
                r#"
                DELETE FROM post_reactions
                WHERE user_id = $1 AND post_id = $2
                "#,
            )
            .bind(user_id)
            .bind(post_id)
            .execute(&mut *self.tx)
            .await,
            RecordChange::Update { to, .. } => sqlx::query(
                r#"
                UPDATE post_reactions
                SET reaction = $3, updated_at = NOW()
                WHERE user_id = $1 AND post_id = $2
                "#,
            )
            .bind(user_id)
            .bind(post_id)
            .bind(to.as_str())
            .execute(&mut *self.tx)
            .await,
        }
        .map_err(map_db_error)?
        .rows_affected();

        // The row read under the post lock is gone or changed: let the caller retry
        if affected != 1 {
            return Err(reaction_core::DomainError::conflict(format!(
                "{} touched {affected} reaction rows",
                transition.name()
            )));
        }

        let updated = sqlx::query(
            r#"
            UPDATE posts
            SET likes_count = $2, dislikes_count = $3, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(post_id)
        .bind(counters.likes_count)
        .bind(counters.dislikes_count)
        .execute(&mut *self.tx)
        .await
        .map_err(map_db_error)?;

        if updated.rows_affected() == 0 {
            return Err(item_not_found(self.item_id));
        }

        debug!(
            user_id = %self.user_id,
            item_id = %self.item_id,
            transition = transition.name(),
            "Staged reaction write"
        );
        Ok(())
    }

    async fn commit(self) -> RepoResult<()> {
        self.tx.commit().await.map_err(map_db_error)
    }

    async fn rollback(self) -> RepoResult<()> {
        self.tx.rollback().await.map_err(map_db_error)
    }
}
