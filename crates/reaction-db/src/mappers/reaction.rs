//! Reaction entity <-> model mapper

use reaction_core::{DomainError, ItemCounters, ItemId, ReactionKind, ReactionOutcome, ReactionRecord, UserId};

use crate::models::{PostCountersModel, ReactionModel, ReactionViewModel};

/// Parse a stored reaction column.
///
/// The column is constrained by a CHECK, so an unknown value means the row
/// was written outside this service.
pub fn parse_stored_kind(value: &str) -> Result<ReactionKind, DomainError> {
    value
        .parse()
        .map_err(|_| DomainError::storage(format!("unexpected stored reaction {value:?}")))
}

impl From<PostCountersModel> for ItemCounters {
    fn from(model: PostCountersModel) -> Self {
        ItemCounters::new(model.likes_count, model.dislikes_count)
    }
}

impl TryFrom<ReactionModel> for ReactionRecord {
    type Error = DomainError;

    fn try_from(model: ReactionModel) -> Result<Self, Self::Error> {
        Ok(ReactionRecord {
            user_id: UserId::new(model.user_id),
            item_id: ItemId::new(model.post_id),
            kind: parse_stored_kind(&model.reaction)?,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}

impl TryFrom<ReactionViewModel> for ReactionOutcome {
    type Error = DomainError;

    fn try_from(model: ReactionViewModel) -> Result<Self, Self::Error> {
        Ok(ReactionOutcome {
            likes_count: model.likes_count,
            dislikes_count: model.dislikes_count,
            user_reaction: model.reaction.as_deref().map(parse_stored_kind).transpose()?,
        })
    }
}
