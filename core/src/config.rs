//! Client configuration.

use std::time::Duration;

use crate::error::ClientError;
use crate::http::merge_header;

/// Base URL of the preconfigured client.
pub const DEFAULT_BASE_URL: &str = "https://api.example.com";

pub const ENV_BASE_URL: &str = "API_BASE_URL";
pub const ENV_TIMEOUT_MS: &str = "API_TIMEOUT_MS";

/// Immutable settings shared by every request of an `ApiClient`.
///
/// Built with the `with_*` methods, then moved into the client; the client
/// only ever reads it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    base_url: String,
    default_headers: Vec<(String, String)>,
    timeout_ms: Option<u64>,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            default_headers: Vec::new(),
            timeout_ms: None,
        }
    }

    /// Add a header sent with every request. Re-adding a name replaces it.
    pub fn with_default_header(mut self, name: impl AsRef<str>, value: impl AsRef<str>) -> Self {
        merge_header(&mut self.default_headers, name.as_ref(), value.as_ref());
        self
    }

    /// Bound every exchange by `timeout_ms`; expiry raises `TimeoutError`.
    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = Some(timeout_ms);
        self
    }

    /// Load configuration from environment variables.
    ///
    /// This will look for:
    /// - `API_BASE_URL` for the base URL (required)
    /// - `API_TIMEOUT_MS` for the request timeout in milliseconds
    pub fn from_env() -> Result<Self, ClientError> {
        let base_url = std::env::var(ENV_BASE_URL)
            .map_err(|_| ClientError::Config(format!("{ENV_BASE_URL} is not set")))?;
        let mut config = Self::new(base_url);

        if let Ok(raw) = std::env::var(ENV_TIMEOUT_MS) {
            let timeout_ms = raw.trim().parse::<u64>().map_err(|e| {
                ClientError::Config(format!("{ENV_TIMEOUT_MS}={raw:?} is not a valid duration: {e}"))
            })?;
            config.timeout_ms = Some(timeout_ms);
        }

        Ok(config)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn default_headers(&self) -> &[(String, String)] {
        &self.default_headers
    }

    pub fn timeout_ms(&self) -> Option<u64> {
        self.timeout_ms
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}
