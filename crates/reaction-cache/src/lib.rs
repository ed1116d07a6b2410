//! # reaction-cache
//!
//! Redis backend for reaction accounting.
//!
//! ## Features
//!
//! - **Connection Pool**: Managed Redis connection pool with deadpool
//! - **Reactions**: Per-pair reaction documents and per-post counter hashes,
//!   updated together through WATCH/MULTI/EXEC
//!
//! ## Example
//!
//! ```ignore
//! use reaction_cache::{RedisPool, RedisPoolConfig, RedisReactionBackend};
//!
//! let pool = RedisPool::new(RedisPoolConfig::default())?;
//! let backend = RedisReactionBackend::new(pool);
//! let post = backend.create_item().await?;
//! ```

pub mod pool;
pub mod reactions;

// Re-export pool types
pub use pool::{RedisPool, RedisPoolConfig, RedisPoolError, RedisResult};

// Re-export reaction types
pub use reactions::{RedisReactionBackend, RedisReactionUnit};
