//! HTTP request handlers.

pub mod health;
pub mod tasks;

// Re-export common handler utilities
pub use health::{health_check, metrics, readiness};
