//! Reaction storage in Redis.

mod backend;
pub mod keys;

pub use backend::{RedisReactionBackend, RedisReactionUnit};
