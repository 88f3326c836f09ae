//! Errors surfaced by task API adapters.

use tasklist_tasks::{TaskError, TitleError};
use thiserror::Error;

/// Errors from a [`TaskApi`](crate::api::TaskApi) call
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ApiError {
    /// Rejected input (client-side or HTTP 400)
    #[error("{0}")]
    Validation(String),

    /// No task with this id (HTTP 404)
    #[error("task {0} not found")]
    NotFound(String),

    /// The service could not be reached
    #[error("network error: {0}")]
    Network(String),

    /// Any other non-success response
    #[error("server error ({status}): {message}")]
    Server {
        /// HTTP status code
        status: u16,
        /// Message from the error body, or the raw body
        message: String,
    },

    /// A success response whose body could not be decoded
    #[error("unexpected response: {0}")]
    Decode(String),
}

impl From<TitleError> for ApiError {
    fn from(error: TitleError) -> Self {
        Self::Validation(error.to_string())
    }
}

impl From<TaskError> for ApiError {
    fn from(error: TaskError) -> Self {
        match error {
            TaskError::Validation(message) => Self::Validation(message),
            TaskError::NotFound(id) => Self::NotFound(id.to_string()),
            TaskError::Storage(source) => Self::Server {
                status: 500,
                message: source.to_string(),
            },
        }
    }
}
