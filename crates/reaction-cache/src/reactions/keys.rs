//! Redis key layout for reactions.

use reaction_core::{ItemId, UserId};

/// Hash holding `likes_count` and `dislikes_count` of a post
pub const POST_PREFIX: &str = "post:";
/// String holding one user's reaction kind on one post
pub const REACTION_PREFIX: &str = "post_reaction:";
/// Counter used to allocate post ids
pub const POST_ID_SEQUENCE: &str = "post:next_id";

pub const LIKES_FIELD: &str = "likes_count";
pub const DISLIKES_FIELD: &str = "dislikes_count";

#[must_use]
pub fn post_key(item_id: ItemId) -> String {
    format!("{POST_PREFIX}{item_id}")
}

/// One document per (user, post) pair
#[must_use]
pub fn reaction_key(user_id: UserId, item_id: ItemId) -> String {
    format!("{REACTION_PREFIX}{user_id}_{item_id}")
}

/// SCAN pattern matching every reaction on a post
#[must_use]
pub fn reaction_pattern(item_id: ItemId) -> String {
    format!("{REACTION_PREFIX}*_{item_id}")
}
