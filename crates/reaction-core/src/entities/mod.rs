//! Domain entities - core business objects

mod counters;
mod reaction;

pub use counters::ItemCounters;
pub use reaction::{ReactionKind, ReactionOutcome, ReactionRecord};
