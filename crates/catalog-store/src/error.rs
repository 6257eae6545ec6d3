//! Mapping from `sqlx` failures to domain errors.

use catalog_core::error::DomainError;

/// Classifies a read failure.
pub(crate) fn read_error(err: &sqlx::Error) -> DomainError {
    DomainError::Infrastructure(format!("database read failed: {err}"))
}

/// Classifies a write failure; the unique index on `name` becomes a conflict.
pub(crate) fn write_error(err: &sqlx::Error, name: &str) -> DomainError {
    match err {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            DomainError::CollectionNameAlreadyExists(name.to_owned())
        }
        other => DomainError::Infrastructure(format!("database write failed: {other}")),
    }
}
