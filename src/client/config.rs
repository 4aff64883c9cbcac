//! Client configuration options.

use std::time::Duration;

/// Default API base URL.
pub const DEFAULT_BASE_URL: &str = "https://api.elsevier.com/";

/// Configuration for the ScienceDirect client.
///
/// # Example
///
/// ```
/// use scidirect::ClientConfig;
/// use std::time::Duration;
///
/// let config = ClientConfig::default()
///     .with_timeout(Duration::from_secs(60))
///     .with_user_agent("my-harvester/1.0");
/// ```
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API base URL. Request paths are joined onto this.
    pub base_url: String,
    /// Request timeout.
    pub timeout: Duration,
    /// User-Agent header value.
    pub user_agent: String,
    /// Minimum time between consecutive requests, enforced locally in
    /// addition to the remote quota.
    pub min_request_interval: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(30),
            user_agent: format!("scidirect/{} (Rust)", env!("CARGO_PKG_VERSION")),
            min_request_interval: Duration::from_millis(500),
        }
    }
}

impl ClientConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Point the client at a different base URL, e.g. a test server.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the User-Agent header.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Set the minimum interval between consecutive requests. Zero
    /// disables local pacing, leaving only the remote quota.
    pub fn with_min_request_interval(mut self, interval: Duration) -> Self {
        self.min_request_interval = interval;
        self
    }
}
