//! Task records, the task store contract and the task service.
//!
//! - [`types`]: `Task`, `TaskId`, `Filter` and title validation
//! - [`store`]: the `TaskStore` contract plus `InMemoryTaskStore`
//! - [`service`]: `TaskService`, the CRUD rules the HTTP layer exposes
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use tasklist_tasks::{InMemoryTaskStore, TaskEnvironment, TaskService};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let service = TaskService::new(Arc::new(InMemoryTaskStore::new()), TaskEnvironment::system());
//!
//! let task = service.create("Buy milk").await?;
//! service.toggle(&task.id).await?;
//! let removed = service.clear_completed().await?;
//! assert_eq!(removed, 1);
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod service;
pub mod store;
pub mod types;

// Re-export commonly used types
pub use error::{StoreError, TaskError, TitleError};
pub use service::{TaskEnvironment, TaskService};
pub use store::{InMemoryTaskStore, TaskStore};
pub use types::{validate_title, Filter, Task, TaskId, MAX_TITLE_CHARS};
