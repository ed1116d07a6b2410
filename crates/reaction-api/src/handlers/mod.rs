//! Route handlers
//!
//! All HTTP request handlers organized by domain.

pub mod health;
pub mod reactions;
