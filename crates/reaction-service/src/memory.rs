//! In-process reaction backend.
//!
//! Each item is a versioned document holding its counters and reactions. A
//! unit remembers the version it read and `commit` applies its staged write
//! only if the version is unchanged, otherwise it reports a conflict. This
//! gives the same optimistic semantics as the Redis backend without a server.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;

use reaction_core::{
    DomainError, ItemCounters, ItemId, ReactionBackend, ReactionKind, ReactionOutcome,
    ReactionRecord, ReactionUnit, RecordChange, RepoResult, Transition, UserId,
};

#[derive(Debug, Default)]
struct ItemDoc {
    version: u64,
    counters: ItemCounters,
    reactions: HashMap<UserId, ReactionRecord>,
}

#[derive(Debug, Default)]
struct MemoryState {
    items: HashMap<ItemId, ItemDoc>,
    next_id: i64,
    /// Commits to fail with a conflict before any succeeds
    injected_conflicts: u32,
    /// Error returned by the next commit
    injected_failure: Option<String>,
}

/// In-memory implementation of ReactionBackend
#[derive(Debug, Clone, Default)]
pub struct MemoryReactionBackend {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryReactionBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an item with zeroed counters and a fresh id
    pub fn create_item(&self) -> ItemId {
        let mut state = self.state.lock();
        let id = loop {
            state.next_id += 1;
            let candidate = ItemId::new(state.next_id);
            if !state.items.contains_key(&candidate) {
                break candidate;
            }
        };
        state.items.insert(id, ItemDoc::default());
        id
    }

    /// Create an item with a known id. Existing items are left untouched.
    pub fn insert_item(&self, item_id: ItemId) {
        self.state.lock().items.entry(item_id).or_default();
    }

    pub fn contains_item(&self, item_id: ItemId) -> bool {
        self.state.lock().items.contains_key(&item_id)
    }

    /// Stored record for a pair
    pub fn record(&self, user_id: UserId, item_id: ItemId) -> Option<ReactionRecord> {
        self.state
            .lock()
            .items
            .get(&item_id)
            .and_then(|doc| doc.reactions.get(&user_id).cloned())
    }

    /// Make the next `count` commits fail with a conflict
    pub fn inject_conflicts(&self, count: u32) {
        self.state.lock().injected_conflicts = count;
    }

    /// Make the next commit fail with a storage error
    pub fn inject_failure(&self, message: impl Into<String>) {
        self.state.lock().injected_failure = Some(message.into());
    }
}

#[async_trait]
impl ReactionBackend for MemoryReactionBackend {
    type Unit = MemoryReactionUnit;

    async fn begin(&self, user_id: UserId, item_id: ItemId) -> RepoResult<MemoryReactionUnit> {
        Ok(MemoryReactionUnit {
            state: Arc::clone(&self.state),
            user_id,
            item_id,
            read_version: None,
            staged: None,
        })
    }

    async fn read(&self, user_id: UserId, item_id: ItemId) -> RepoResult<Option<ReactionOutcome>> {
        let state = self.state.lock();
        Ok(state.items.get(&item_id).map(|doc| ReactionOutcome {
            likes_count: doc.counters.likes_count,
            dislikes_count: doc.counters.dislikes_count,
            user_reaction: doc.reactions.get(&user_id).map(|r| r.kind),
        }))
    }

    async fn count_reactions(&self, item_id: ItemId) -> RepoResult<ItemCounters> {
        let state = self.state.lock();
        let mut counters = ItemCounters::default();
        if let Some(doc) = state.items.get(&item_id) {
            for record in doc.reactions.values() {
                match record.kind {
                    ReactionKind::Like => counters.likes_count += 1,
                    ReactionKind::Dislike => counters.dislikes_count += 1,
                }
            }
        }
        Ok(counters)
    }

    async fn health_check(&self) -> RepoResult<()> {
        Ok(())
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}

/// One optimistic unit against the in-memory store
pub struct MemoryReactionUnit {
    state: Arc<Mutex<MemoryState>>,
    user_id: UserId,
    item_id: ItemId,
    read_version: Option<u64>,
    staged: Option<(RecordChange, ItemCounters)>,
}

impl MemoryReactionUnit {
    /// Remember the first version observed by this unit
    fn observe(&mut self, version: u64) {
        self.read_version.get_or_insert(version);
    }
}

#[async_trait]
impl ReactionUnit for MemoryReactionUnit {
    async fn load_counters(&mut self) -> RepoResult<Option<ItemCounters>> {
        let observed = {
            let state = self.state.lock();
            state
                .items
                .get(&self.item_id)
                .map(|doc| (doc.version, doc.counters))
        };

        Ok(observed.map(|(version, counters)| {
            self.observe(version);
            counters
        }))
    }

    async fn load_reaction(&mut self) -> RepoResult<Option<ReactionKind>> {
        let observed = {
            let state = self.state.lock();
            state.items.get(&self.item_id).map(|doc| {
                (
                    doc.version,
                    doc.reactions.get(&self.user_id).map(|r| r.kind),
                )
            })
        };

        Ok(observed.and_then(|(version, kind)| {
            self.observe(version);
            kind
        }))
    }

    async fn write(&mut self, transition: &Transition, counters: ItemCounters) -> RepoResult<()> {
        self.staged = Some((transition.record_change(), counters));
        Ok(())
    }

    async fn commit(self) -> RepoResult<()> {
        let Some((change, counters)) = self.staged else {
            return Ok(());
        };

        let mut state = self.state.lock();

        if let Some(message) = state.injected_failure.take() {
            return Err(DomainError::storage(message));
        }
        if state.injected_conflicts > 0 {
            state.injected_conflicts -= 1;
            return Err(DomainError::conflict("injected conflict"));
        }

        let doc = state
            .items
            .get_mut(&self.item_id)
            .ok_or(DomainError::ItemNotFound(self.item_id))?;

        if Some(doc.version) != self.read_version {
            return Err(DomainError::conflict(format!(
                "item {} changed since read",
                self.item_id
            )));
        }

        match change {
            RecordChange::Insert(kind) => {
                if doc.reactions.contains_key(&self.user_id) {
                    return Err(DomainError::conflict("reaction already exists"));
                }
                doc.reactions
                    .insert(self.user_id, ReactionRecord::new(self.user_id, self.item_id, kind));
            }
            RecordChange::Delete => {
                if doc.reactions.remove(&self.user_id).is_none() {
                    return Err(DomainError::conflict("reaction already removed"));
                }
            }
            RecordChange::Update { to, .. } => match doc.reactions.get_mut(&self.user_id) {
                Some(record) => record.switch_to(to),
                None => return Err(DomainError::conflict("reaction already removed")),
            },
        }

        doc.counters = counters;
        doc.version += 1;
        Ok(())
    }

    async fn rollback(self) -> RepoResult<()> {
        Ok(())
    }
}
