//! # reaction-service
//!
//! Application layer: the transactional reaction store, its retry policy,
//! an in-memory backend, and the DTOs exchanged with the API.

pub mod dto;
pub mod memory;
pub mod services;

pub use memory::{MemoryReactionBackend, MemoryReactionUnit};
pub use services::{ReactionService, ReactionStore, RetryPolicy, ServiceError, ServiceResult};
