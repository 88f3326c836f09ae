//! Error types for the task store and service.

use crate::types::{TaskId, MAX_TITLE_CHARS};
use thiserror::Error;

/// Why a title was rejected
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TitleError {
    /// Nothing left after trimming
    #[error("title required")]
    Empty,

    /// Longer than the limit (character count attached)
    #[error("title too long ({0} characters, max {MAX_TITLE_CHARS})")]
    TooLong(usize),
}

/// Errors from a [`TaskStore`](crate::store::TaskStore) backend
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The backend could not be reached or failed the operation
    #[error("storage backend error: {0}")]
    Backend(String),

    /// A task with this id is already stored
    #[error("task {0} already exists")]
    Duplicate(TaskId),
}

/// Errors from [`TaskService`](crate::service::TaskService) operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TaskError {
    /// Input rejected before touching the store
    #[error("{0}")]
    Validation(String),

    /// No task with this id
    #[error("task {0} not found")]
    NotFound(TaskId),

    /// The store failed
    #[error(transparent)]
    Storage(#[from] StoreError),
}

impl From<TitleError> for TaskError {
    fn from(error: TitleError) -> Self {
        Self::Validation(error.to_string())
    }
}
