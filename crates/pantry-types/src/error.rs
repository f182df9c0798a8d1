use thiserror::Error;

/// Errors produced by type operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TypeError {
    /// The text is not a recognizable USD amount.
    #[error("invalid USD format: '{0}'")]
    InvalidUsd(String),
}
