//! Error types raised by repository implementations.

use thiserror::Error;

/// Errors surfaced by the store and the repositories built on it.
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("store lock was poisoned")]
    LockPoisoned,

    #[error("store has been closed")]
    StoreClosed,

    #[error("table '{0}' does not exist")]
    MissingTable(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(String),

    #[error("corrupted data: {0}")]
    CorruptedData(String),
}

pub type Result<T> = std::result::Result<T, RepositoryError>;
