//! # reaction-db
//!
//! PostgreSQL backend for reaction accounting via SQLx.
//!
//! ## Overview
//!
//! This crate implements the `ReactionBackend` boundary from `reaction-core`.
//! It handles:
//!
//! - Connection pool management and schema setup
//! - Database models with SQLx `FromRow` derives
//! - Model → entity mappers
//! - Row-locked reaction transactions
//!
//! ## Usage
//!
//! ```rust,ignore
//! use reaction_db::pool::{create_pool, run_migrations, DatabaseConfig};
//! use reaction_db::PgReactionBackend;
//!
//! async fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = DatabaseConfig::default();
//!     let pool = create_pool(&config).await?;
//!     run_migrations(&pool).await?;
//!     let backend = PgReactionBackend::new(pool, config.lock_timeout);
//!
//!     // Hand the backend to a ReactionStore...
//!     Ok(())
//! }
//! ```

pub mod mappers;
pub mod models;
pub mod pool;
pub mod repositories;

// Re-export commonly used types
pub use pool::{create_pool, run_migrations, DatabaseConfig, PgPool};
pub use repositories::{PgReactionBackend, PgReactionUnit};
