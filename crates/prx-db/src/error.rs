//! Database error types for prx-db.

use thiserror::Error;

/// Errors from database operations.
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// Referenced content/lesson/enrollment does not exist.
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// Caller passed an out-of-contract value (e.g. order index out of range).
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Lesson completion attempted without an active enrollment.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// A SQL query failed.
    #[error("Query failed: {0}")]
    Query(String),

    /// Schema migration failed.
    #[error("Migration failed: {0}")]
    Migration(String),

    /// Expected a result row but none was returned.
    #[error("No result returned")]
    NoResult,

    /// Underlying libSQL error. Covers transaction conflicts, which are not
    /// retried here; the caller may re-issue the whole logical operation.
    #[error("libSQL error: {0}")]
    LibSql(#[from] libsql::Error),

    /// Catch-all for unexpected errors.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
