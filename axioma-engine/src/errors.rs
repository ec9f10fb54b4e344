//! Error types returned by the engines.
use axioma_repository::RepositoryError;
use thiserror::Error;

/// Errors returned by every engine operation.
///
/// The HTTP layer maps `NotFound` to 404, `InvalidArgument` and `LimitExceeded`
/// to 400 and `Repository` to 500.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The requested resource has no data.
    #[error("Not found: {0}")]
    NotFound(String),

    /// A request parameter is missing or malformed.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The requested result count exceeds the configured maximum.
    #[error("Limit {provided} exceeds maximum {max}")]
    LimitExceeded { provided: usize, max: usize },

    /// The store failed. Never retried by the engines.
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),
}

impl EngineError {
    /// Create a not found error.
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Create an invalid argument error.
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }
}
