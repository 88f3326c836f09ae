//! HTTP surface of the tasklist task service.
//!
//! Thin imperative shell around [`TaskService`](tasklist_tasks::TaskService):
//! handlers parse requests, call the service, and map its errors to JSON
//! responses. Middleware adds correlation IDs, CORS, request tracing and an
//! optional API key check.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use tasklist_tasks::{InMemoryTaskStore, TaskEnvironment, TaskService};
//! use tasklist_web::{router, AppState};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let service = TaskService::new(Arc::new(InMemoryTaskStore::new()), TaskEnvironment::system());
//! let app = router(AppState::new(service));
//!
//! let listener = tokio::net::TcpListener::bind("127.0.0.1:3000").await?;
//! axum::serve(listener, app).await?;
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

// Re-export key types for convenience
pub use config::ServerConfig;
pub use error::AppError;
pub use middleware::{correlation_id_layer, CorrelationId, CORRELATION_ID_HEADER};
pub use router::router;
pub use state::AppState;
