//! Server configuration loaded from environment variables.
//!
//! A `.env` file in the working directory is honoured (see `main`).

use std::env;
use std::net::SocketAddr;
use std::time::Duration;

/// HTTP server configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Host to bind to
    pub host: String,
    /// Port to bind to
    pub port: u16,
    /// Key required on task routes, if any
    pub api_key: Option<String>,
    /// How long in-flight requests get after a shutdown signal
    pub shutdown_timeout: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            api_key: None,
            shutdown_timeout: Duration::from_secs(10),
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// | Variable | Default |
    /// |---|---|
    /// | `TASKLIST_HOST` | `0.0.0.0` |
    /// | `PORT`, then `TASKLIST_PORT` | `3000` |
    /// | `TASKLIST_API_KEY` | unset (no check) |
    /// | `TASKLIST_SHUTDOWN_TIMEOUT` (seconds) | `10` |
    ///
    /// Unparseable values fall back to the default.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) over an arbitrary lookup
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        Self {
            host: lookup("TASKLIST_HOST").unwrap_or(defaults.host),
            port: lookup("PORT")
                .or_else(|| lookup("TASKLIST_PORT"))
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.port),
            api_key: lookup("TASKLIST_API_KEY").filter(|key| !key.is_empty()),
            shutdown_timeout: lookup("TASKLIST_SHUTDOWN_TIMEOUT")
                .and_then(|s| s.parse().ok())
                .map_or(defaults.shutdown_timeout, Duration::from_secs),
        }
    }

    /// Socket address to bind
    ///
    /// # Errors
    ///
    /// Returns an error if `host:port` is not a valid socket address.
    pub fn bind_addr(&self) -> Result<SocketAddr, std::net::AddrParseError> {
        format!("{}:{}", self.host, self.port).parse()
    }
}
