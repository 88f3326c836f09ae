//! Application state shared by every HTTP handler.

use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;
use tasklist_tasks::TaskService;

/// Application state shared across all HTTP handlers.
///
/// Cheap to clone: every field is a shared handle.
#[derive(Clone)]
pub struct AppState {
    /// Task CRUD rules over the configured store
    pub service: TaskService,
    /// Key `/todos*` callers must present, if any
    pub api_key: Option<Arc<str>>,
    /// Prometheus recorder handle backing `GET /metrics`
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    /// Create state with no API key and no metrics endpoint.
    #[must_use]
    pub const fn new(service: TaskService) -> Self {
        Self {
            service,
            api_key: None,
            metrics: None,
        }
    }

    /// Require `key` on task routes.
    #[must_use]
    pub fn with_api_key(mut self, key: impl Into<Arc<str>>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Serve `handle` on `GET /metrics`.
    #[must_use]
    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("service", &self.service)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("metrics", &self.metrics.is_some())
            .finish()
    }
}
