use thiserror::Error;

use pantry_store::StoreError;

/// Errors from service operations, reported per item for batch adds.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ServiceError {
    /// The item failed validation; the store was never contacted for it.
    #[error("invalid item format: {0}")]
    InvalidFormat(String),

    /// The store rejected the operation (duplicate or missing code).
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The caller's cancellation signal fired before the outcome was
    /// observed. The underlying store operation may still have completed.
    #[error("operation cancelled before completion")]
    Cancelled,

    /// Orchestration bookkeeping failed: a worker died without reporting,
    /// or the batch deadline expired.
    #[error("an unexpected error occurred: {0}")]
    Internal(String),
}

/// Result alias for service operations.
pub type ServiceResult<T> = Result<T, ServiceError>;
