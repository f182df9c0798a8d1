use thiserror::Error;

/// Errors from produce store operations.
///
/// Both variants carry the offending code so callers can pattern-match and
/// report per-record failures without string inspection.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// An add found a record already present under the same code.
    #[error("item with code '{0}' already exists")]
    AlreadyExists(String),

    /// A delete found no record under the given code.
    #[error("no item with code '{0}'")]
    NotFound(String),
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
