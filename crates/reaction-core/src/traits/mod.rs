//! Storage traits (ports) - define the interface for reaction persistence
//!
//! The domain layer defines what it needs, and the infrastructure layer
//! provides the implementation.

mod storage;

pub use storage::{ReactionBackend, ReactionUnit, RepoResult};
