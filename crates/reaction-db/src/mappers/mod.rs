//! Model to entity mappers
//!
//! Conversions from database rows to domain objects (reaction-core).

mod reaction;

pub use reaction::parse_stored_kind;
