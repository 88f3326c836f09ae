//! Client side of tasklist: API adapters, the task list controller and its
//! plain-text view.
//!
//! The controller is a reducer run in a runtime [`Store`](tasklist_runtime::Store):
//!
//! ```no_run
//! use std::sync::Arc;
//! use tasklist_client::{HttpTaskApi, TaskListAction, TaskListEnvironment, TaskListReducer, TaskListState};
//! use tasklist_core::environment::{SystemClock, UuidGenerator};
//! use tasklist_runtime::Store;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let env = TaskListEnvironment::new(
//!     Arc::new(HttpTaskApi::new("http://localhost:3000")),
//!     Arc::new(SystemClock),
//!     Arc::new(UuidGenerator),
//! );
//! let store = Store::new(TaskListState::default(), TaskListReducer::new(), env);
//!
//! store.send(TaskListAction::Load).await?.wait().await;
//! store.send(TaskListAction::Create { title: "Buy milk".into() }).await?;
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod api;
pub mod command;
pub mod config;
pub mod controller;
pub mod error;
pub mod view;

pub use api::{load_tasks, FailingTaskApi, HttpTaskApi, InProcessTaskApi, Operation, TaskApi};
pub use config::ClientConfig;
pub use controller::{
    Phase, TaskListAction, TaskListEnvironment, TaskListReducer, TaskListState,
    DISMISS_ERROR_EFFECT,
};
pub use error::ApiError;
pub use tasklist_tasks::validate_title;
pub use view::TaskListView;
