use thiserror::Error;

use crate::forms::FormError;
use crate::repository::errors::RepositoryError;

/// Text shown when a failure carries no message from the backend.
pub const GENERIC_FAILURE: &str = "Something went wrong. Please try again.";

/// Errors surfaced by the customer flows.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("form error: {0}")]
    Form(#[from] FormError),

    #[error("not found")]
    NotFound,

    #[error("type constraint violation: {0}")]
    TypeConstraint(String),

    #[error("repository error: {0}")]
    Repository(RepositoryError),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

impl From<RepositoryError> for ServiceError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound => ServiceError::NotFound,
            other => ServiceError::Repository(other),
        }
    }
}

impl ServiceError {
    /// Whether the failure was caught locally before any request was sent.
    pub fn is_validation(&self) -> bool {
        matches!(self, ServiceError::Form(_) | ServiceError::TypeConstraint(_))
    }

    /// Text for the transient notification shown after a failed request.
    pub fn notification(&self) -> String {
        match self {
            ServiceError::Repository(err) => err
                .server_message()
                .unwrap_or(GENERIC_FAILURE)
                .to_string(),
            ServiceError::NotFound => "Customer not found".to_string(),
            ServiceError::Form(_) => "Please fix the highlighted fields".to_string(),
            ServiceError::TypeConstraint(message) => format!("Invalid input: {message}"),
        }
    }
}
