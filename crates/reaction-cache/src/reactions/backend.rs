//! Redis implementation of ReactionBackend.
//!
//! Units are optimistic: `begin` WATCHes the post hash and the pair's reaction
//! key on a dedicated pooled connection, reads happen after WATCH, and
//! `commit` sends the staged writes as one MULTI/EXEC. A nil EXEC reply means
//! another writer touched a watched key first.

use async_trait::async_trait;
use deadpool_redis::Connection;
use redis::AsyncCommands;
use tracing::{debug, instrument, warn};

use reaction_core::{
    DomainError, ItemCounters, ItemId, ReactionBackend, ReactionKind, ReactionOutcome,
    ReactionUnit, RecordChange, RepoResult, Transition, UserId,
};

use super::keys::{
    post_key, reaction_key, reaction_pattern, DISLIKES_FIELD, LIKES_FIELD, POST_ID_SEQUENCE,
};
use crate::pool::RedisPool;

const SCAN_BATCH: usize = 500;

fn map_redis_error(e: redis::RedisError) -> DomainError {
    DomainError::storage(e.to_string())
}

fn parse_stored_kind(value: &str) -> RepoResult<ReactionKind> {
    value
        .parse()
        .map_err(|_| DomainError::storage(format!("unexpected stored reaction {value:?}")))
}

fn counters_from(fields: (Option<i64>, Option<i64>)) -> Option<ItemCounters> {
    match fields {
        (None, None) => None,
        (likes, dislikes) => Some(ItemCounters::new(
            likes.unwrap_or_default(),
            dislikes.unwrap_or_default(),
        )),
    }
}

/// Close a connection instead of returning it to the pool.
///
/// A connection abandoned mid-unit may still hold WATCHed keys.
fn discard(conn: Connection) {
    drop(Connection::take(conn));
}

/// Redis implementation of ReactionBackend
#[derive(Debug, Clone)]
pub struct RedisReactionBackend {
    pool: RedisPool,
}

impl RedisReactionBackend {
    pub fn new(pool: RedisPool) -> Self {
        Self { pool }
    }

    /// Allocate a post id and store zeroed counters for it
    #[instrument(skip(self))]
    pub async fn create_item(&self) -> RepoResult<ItemId> {
        let mut conn = self.pool.get().await?;
        let id: i64 = conn.incr(POST_ID_SEQUENCE, 1).await.map_err(map_redis_error)?;
        let item_id = ItemId::new(id);

        let _: () = conn
            .hset_multiple(&post_key(item_id), &[(LIKES_FIELD, 0_i64), (DISLIKES_FIELD, 0_i64)])
            .await
            .map_err(map_redis_error)?;

        Ok(item_id)
    }
}

#[async_trait]
impl ReactionBackend for RedisReactionBackend {
    type Unit = RedisReactionUnit;

    #[instrument(skip(self))]
    async fn begin(&self, user_id: UserId, item_id: ItemId) -> RepoResult<RedisReactionUnit> {
        let mut conn = self.pool.get().await?;
        let item_key = post_key(item_id);
        let reaction_key = reaction_key(user_id, item_id);

        if let Err(e) = redis::cmd("WATCH")
            .arg(&item_key)
            .arg(&reaction_key)
            .query_async::<()>(&mut conn)
            .await
        {
            discard(conn);
            return Err(map_redis_error(e));
        }

        Ok(RedisReactionUnit {
            conn: Some(conn),
            user_id,
            item_id,
            item_key,
            reaction_key,
            staged: None,
        })
    }

    #[instrument(skip(self))]
    async fn read(&self, user_id: UserId, item_id: ItemId) -> RepoResult<Option<ReactionOutcome>> {
        let mut conn = self.pool.get().await?;

        let (fields, stored): ((Option<i64>, Option<i64>), Option<String>) = redis::pipe()
            .atomic()
            .cmd("HMGET")
            .arg(post_key(item_id))
            .arg(LIKES_FIELD)
            .arg(DISLIKES_FIELD)
            .cmd("GET")
            .arg(reaction_key(user_id, item_id))
            .query_async(&mut conn)
            .await
            .map_err(map_redis_error)?;

        let Some(counters) = counters_from(fields) else {
            return Ok(None);
        };

        Ok(Some(ReactionOutcome {
            likes_count: counters.likes_count,
            dislikes_count: counters.dislikes_count,
            user_reaction: stored.as_deref().map(parse_stored_kind).transpose()?,
        }))
    }

    #[instrument(skip(self))]
    async fn count_reactions(&self, item_id: ItemId) -> RepoResult<ItemCounters> {
        let keys = self.pool.scan_keys(&reaction_pattern(item_id), SCAN_BATCH).await?;
        if keys.is_empty() {
            return Ok(ItemCounters::default());
        }

        let mut conn = self.pool.get().await?;
        let values: Vec<Option<String>> = redis::cmd("MGET")
            .arg(&keys)
            .query_async(&mut conn)
            .await
            .map_err(map_redis_error)?;

        let mut counters = ItemCounters::default();
        // Keys deleted between SCAN and MGET come back nil
        for value in values.iter().flatten() {
            match parse_stored_kind(value)? {
                ReactionKind::Like => counters.likes_count += 1,
                ReactionKind::Dislike => counters.dislikes_count += 1,
            }
        }
        Ok(counters)
    }

    async fn health_check(&self) -> RepoResult<()> {
        self.pool.health_check().await?;
        Ok(())
    }

    fn name(&self) -> &'static str {
        "redis"
    }
}

/// One optimistic transaction on a (user, post) pair
pub struct RedisReactionUnit {
    conn: Option<Connection>,
    user_id: UserId,
    item_id: ItemId,
    item_key: String,
    reaction_key: String,
    staged: Option<redis::Pipeline>,
}

impl RedisReactionUnit {
    fn conn(&mut self) -> RepoResult<&mut Connection> {
        self.conn
            .as_mut()
            .ok_or_else(|| DomainError::storage("reaction unit already finished"))
    }

    fn take_conn(&mut self) -> RepoResult<Connection> {
        self.conn
            .take()
            .ok_or_else(|| DomainError::storage("reaction unit already finished"))
    }
}

#[async_trait]
impl ReactionUnit for RedisReactionUnit {
    async fn load_counters(&mut self) -> RepoResult<Option<ItemCounters>> {
        let key = self.item_key.clone();
        let fields: (Option<i64>, Option<i64>) = redis::cmd("HMGET")
            .arg(&key)
            .arg(LIKES_FIELD)
            .arg(DISLIKES_FIELD)
            .query_async(self.conn()?)
            .await
            .map_err(map_redis_error)?;

        Ok(counters_from(fields))
    }

    async fn load_reaction(&mut self) -> RepoResult<Option<ReactionKind>> {
        let key = self.reaction_key.clone();
        let stored: Option<String> = self.conn()?.get(&key).await.map_err(map_redis_error)?;

        stored.as_deref().map(parse_stored_kind).transpose()
    }

    async fn write(&mut self, transition: &Transition, counters: ItemCounters) -> RepoResult<()> {
        let mut pipe = redis::pipe();
        pipe.atomic();

        match transition.record_change() {
            RecordChange::Insert(kind) | RecordChange::Update { to: kind, .. } => {
                pipe.set(&self.reaction_key, kind.as_str());
            }
            RecordChange::Delete => {
                pipe.del(&self.reaction_key);
            }
        }
        pipe.hset_multiple(
            &self.item_key,
            &[
                (LIKES_FIELD, counters.likes_count),
                (DISLIKES_FIELD, counters.dislikes_count),
            ],
        );

        debug!(
            user_id = %self.user_id,
            item_id = %self.item_id,
            transition = transition.name(),
            "Staged reaction write"
        );
        self.staged = Some(pipe);
        Ok(())
    }

    async fn commit(mut self) -> RepoResult<()> {
        let mut conn = self.take_conn()?;

        let Some(pipe) = self.staged.take() else {
            return match redis::cmd("UNWATCH").query_async::<()>(&mut conn).await {
                Ok(()) => Ok(()),
                Err(e) => {
                    discard(conn);
                    Err(map_redis_error(e))
                }
            };
        };

        // EXEC clears WATCH whether or not it runs the transaction
        let reply: Option<redis::Value> = match pipe.query_async(&mut conn).await {
            Ok(reply) => reply,
            Err(e) => {
                discard(conn);
                return Err(map_redis_error(e));
            }
        };

        match reply {
            Some(_) => Ok(()),
            None => {
                warn!(
                    user_id = %self.user_id,
                    item_id = %self.item_id,
                    "Watched reaction keys changed before EXEC"
                );
                Err(DomainError::conflict(format!(
                    "concurrent write on {}",
                    self.item_key
                )))
            }
        }
    }

    async fn rollback(mut self) -> RepoResult<()> {
        let mut conn = self.take_conn()?;
        self.staged = None;

        if let Err(e) = redis::cmd("UNWATCH").query_async::<()>(&mut conn).await {
            discard(conn);
            return Err(map_redis_error(e));
        }
        Ok(())
    }
}

impl Drop for RedisReactionUnit {
    fn drop(&mut self) {
        if let Some(conn) = self.conn.take() {
            discard(conn);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters_from_fields() {
        assert_eq!(counters_from((None, None)), None);
        assert_eq!(
            counters_from((Some(3), None)),
            Some(ItemCounters::new(3, 0))
        );
        assert_eq!(
            counters_from((Some(-2), Some(5))),
            Some(ItemCounters::new(0, 5))
        );
    }

    #[test]
    fn test_parse_stored_kind() {
        assert_eq!(parse_stored_kind("like").unwrap(), ReactionKind::Like);
        assert!(matches!(
            parse_stored_kind("LIKE"),
            Err(DomainError::StorageFailure(_))
        ));
    }
}
