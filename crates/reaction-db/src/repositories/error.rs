//! Error handling utilities for repositories

use reaction_core::error::DomainError;
use reaction_core::value_objects::ItemId;
use sqlx::Error as SqlxError;

/// SQLSTATE codes that mean another transaction won the race:
/// serialization_failure, deadlock_detected, unique_violation, lock_not_available.
const CONFLICT_SQLSTATES: [&str; 4] = ["40001", "40P01", "23505", "55P03"];

/// Convert SQLx error to DomainError
///
/// Lost races become [`DomainError::StorageConflict`] so the caller can re-run
/// the whole unit; everything else is a storage failure.
pub fn map_db_error(e: SqlxError) -> DomainError {
    if is_conflict(&e) {
        return DomainError::conflict(e.to_string());
    }
    DomainError::StorageFailure(e.to_string())
}

/// Check whether the error is a retryable concurrency conflict
pub fn is_conflict(e: &SqlxError) -> bool {
    e.as_database_error()
        .and_then(|db_err| db_err.code())
        .is_some_and(|code| CONFLICT_SQLSTATES.contains(&code.as_ref()))
}

/// Create an "item not found" error
pub fn item_not_found(id: ItemId) -> DomainError {
    DomainError::ItemNotFound(id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_database_errors_are_failures() {
        let err = map_db_error(SqlxError::RowNotFound);
        assert!(matches!(err, DomainError::StorageFailure(_)));

        let err = map_db_error(SqlxError::PoolTimedOut);
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_conflict_codes() {
        assert!(CONFLICT_SQLSTATES.contains(&"40001"));
        assert!(CONFLICT_SQLSTATES.contains(&"55P03"));
        assert!(!CONFLICT_SQLSTATES.contains(&"23503"));
    }
}
