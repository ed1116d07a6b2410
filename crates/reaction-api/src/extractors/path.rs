//! Path parameter extractors
//!
//! Type-safe extraction of post ids from path parameters.

use reaction_core::ItemId;
use serde::Deserialize;

use crate::response::ApiError;

/// Path parameters with post_id
#[derive(Debug, Deserialize)]
pub struct PostIdPath {
    pub post_id: String,
}

impl PostIdPath {
    /// Parse post_id as a positive ItemId
    pub fn post_id(&self) -> Result<ItemId, ApiError> {
        parse_post_id(&self.post_id)
    }
}

fn parse_post_id(raw: &str) -> Result<ItemId, ApiError> {
    ItemId::parse(raw)
        .ok()
        .filter(|id| id.into_inner() > 0)
        .ok_or_else(|| ApiError::invalid_path("Invalid post_id format"))
}
