//! Prometheus metrics for observability and monitoring.
//!
//! Covers the Store runtime (actions, reducer time, effects) and the task
//! service (created, toggled, removed, cleared). The server renders the
//! recorder's output on `GET /metrics`.
//!
//! # Example
//!
//! ```rust,no_run
//! use tasklist_runtime::metrics::install_recorder;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let handle = install_recorder()?;
//! if let Some(handle) = handle {
//!     println!("{}", handle.render());
//! }
//! # Ok(())
//! # }
//! ```

use metrics::{describe_counter, describe_histogram};
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder, PrometheusHandle};
use thiserror::Error;

/// Errors from metrics operations.
#[derive(Error, Debug)]
pub enum MetricsError {
    /// Failed to build metrics exporter
    #[error("Failed to build metrics exporter: {0}")]
    Build(String),
    /// Failed to install metrics exporter
    #[error("Failed to install metrics exporter: {0}")]
    Install(String),
}

/// Install the global Prometheus recorder and describe every metric.
///
/// Returns `Ok(None)` when a recorder is already installed (e.g. a second
/// server in the same test binary); metrics still flow to the first one.
///
/// # Errors
///
/// Returns error if the exporter cannot be built or installed.
pub fn install_recorder() -> Result<Option<PrometheusHandle>, MetricsError> {
    let builder = PrometheusBuilder::new()
        .set_buckets_for_metric(
            Matcher::Suffix("duration_seconds".to_string()),
            &[0.0001, 0.0005, 0.001, 0.005, 0.01, 0.05, 0.1, 0.5, 1.0],
        )
        .map_err(|e| MetricsError::Build(e.to_string()))?;

    match builder.install_recorder() {
        Ok(handle) => {
            register_metrics();
            tracing::info!("Prometheus recorder installed");
            Ok(Some(handle))
        },
        Err(e) => {
            let err_msg = e.to_string();
            if err_msg.contains("already initialized") {
                tracing::warn!("Metrics recorder already initialized, skipping re-initialization");
                Ok(None)
            } else {
                Err(MetricsError::Install(err_msg))
            }
        },
    }
}

/// Register all metric descriptions.
fn register_metrics() {
    // Store
    describe_counter!("store.commands.total", "Actions sent to a store");
    describe_counter!("store.effects.executed", "Effects executed, labelled by type");
    describe_histogram!(
        "store.reducer.duration_seconds",
        "Time spent inside reducer calls"
    );
    describe_counter!("store.shutdown.initiated", "Store shutdowns started");
    describe_counter!("store.shutdown.timeout", "Store shutdowns that timed out");
    describe_counter!(
        "store.shutdown.rejected_actions",
        "Actions rejected because the store was shutting down"
    );

    // Task service
    describe_counter!("tasks.created.total", "Tasks created");
    describe_counter!("tasks.toggled.total", "Tasks whose completion flag was flipped");
    describe_counter!("tasks.removed.total", "Tasks deleted by id");
    describe_counter!("tasks.cleared.total", "Tasks removed by clear-completed");
    describe_counter!("tasks.validation_failures.total", "Rejected task titles");
}
