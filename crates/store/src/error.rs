//! Store error types.

use domain::DomainError;
use thiserror::Error;

/// Errors that can occur during store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Database error.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A stored row does not map back onto the domain model.
    #[error("corrupt row: {0}")]
    Corrupt(#[from] DomainError),
}
