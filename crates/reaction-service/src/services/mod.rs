//! Business logic services
//!
//! The reaction store and the retry policy that drives it.

pub mod error;
pub mod reaction;
pub mod retry;

pub use error::{ServiceError, ServiceResult};
pub use reaction::{ReactionService, ReactionStore};
pub use retry::RetryPolicy;
