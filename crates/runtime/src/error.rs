//! Error type surfaced by the service layer.
//!
//! Wraps failures from repositories, record validation and the spirit root
//! engine so the controller can translate them into one response envelope.

use cultivation_core::{PlayerId, SpiritRootError, ValidationError};
use thiserror::Error;

pub use crate::repository::RepositoryError;

pub type Result<T> = std::result::Result<T, ServiceError>;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("player {id} not found")]
    NotFound { id: PlayerId },

    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    SpiritRoot(#[from] SpiritRootError),
}

impl ServiceError {
    /// True for store-level failures, as opposed to bad input or missing rows.
    pub fn is_system(&self) -> bool {
        matches!(self, ServiceError::Repository(_))
    }
}
