//! # reaction-core
//!
//! Domain layer for reaction accounting: entities, value objects, the pure
//! reaction policy, and the storage boundary traits.
//! This crate has zero dependencies on infrastructure (database, web framework, etc.).

pub mod entities;
pub mod error;
pub mod policy;
pub mod traits;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use entities::{ItemCounters, ReactionKind, ReactionOutcome, ReactionRecord};
pub use error::DomainError;
pub use policy::{decide, CounterDelta, RecordChange, Transition};
pub use traits::{ReactionBackend, ReactionUnit, RepoResult};
pub use value_objects::{IdParseError, ItemId, UserId};
