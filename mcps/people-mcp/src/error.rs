//! Store error type

use thiserror::Error;

/// Why a store operation did not complete
#[derive(Debug, Error)]
pub enum StoreError {
    /// Anything the SQLite engine reports: constraint violations, I/O
    /// failures, a locked database, malformed statements.
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// `update` was called without any field to set.
    #[error("no fields to update")]
    EmptyPatch,

    /// A write statement was passed to `read` under the read-only policy.
    #[error("statement would modify the database; only read statements are allowed")]
    WriteRejected,
}

impl StoreError {
    /// Whether the caller caused the error, as opposed to the engine
    pub fn is_caller_error(&self) -> bool {
        matches!(self, StoreError::EmptyPatch | StoreError::WriteRejected)
    }
}

pub type StoreResult<T> = Result<T, StoreError>;
