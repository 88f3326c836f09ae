//! Client configuration loaded from environment variables.

use std::env;
use std::time::Duration;

/// Where the client finds the task service and how it behaves
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL of the task service, without trailing slash
    pub api_url: String,
    /// Sent as `x-api-key` when set
    pub api_key: Option<String>,
    /// How long an error message stays visible
    pub error_ttl: Duration,
    /// Per-request timeout; `None` keeps reqwest's default
    pub request_timeout: Option<Duration>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: "http://localhost:3000".to_string(),
            api_key: None,
            error_ttl: Duration::from_millis(3000),
            request_timeout: None,
        }
    }
}

impl ClientConfig {
    /// Load configuration from environment variables.
    ///
    /// | Variable | Default |
    /// |---|---|
    /// | `TASKLIST_API_URL` | `http://localhost:3000` |
    /// | `TASKLIST_API_KEY` | unset |
    /// | `TASKLIST_ERROR_TTL_MS` | `3000` |
    /// | `TASKLIST_REQUEST_TIMEOUT_MS` | unset |
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) over an arbitrary lookup
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        Self {
            api_url: lookup("TASKLIST_API_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .filter(|url| !url.is_empty())
                .unwrap_or(defaults.api_url),
            api_key: lookup("TASKLIST_API_KEY").filter(|key| !key.is_empty()),
            error_ttl: lookup("TASKLIST_ERROR_TTL_MS")
                .and_then(|s| s.parse().ok())
                .map_or(defaults.error_ttl, Duration::from_millis),
            request_timeout: lookup("TASKLIST_REQUEST_TIMEOUT_MS")
                .and_then(|s| s.parse().ok())
                .map(Duration::from_millis),
        }
    }
}
