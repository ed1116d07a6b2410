//! Backend implementations
//!
//! PostgreSQL implementation of the reaction storage boundary defined in reaction-core.

mod error;
mod reaction;

pub use error::{is_conflict, map_db_error};
pub use reaction::{PgReactionBackend, PgReactionUnit};
