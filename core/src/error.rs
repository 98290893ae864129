//! Error taxonomy for the API client.
//!
//! # Design
//! Three kinds are raised by the pipeline after classifying what it observed:
//! `ApiError` (a response arrived with a non-2xx status), `NetworkError` (no
//! response was obtained at all, cancellation included) and `TimeoutError`
//! (the configured deadline elapsed). `ClientError` wraps them together with
//! the failures that sit outside the taxonomy, such as a malformed success
//! body. Callers branch on `ClientError::kind()` or on the `is_*` / `as_*`
//! narrowing helpers instead of matching message strings.

use std::error::Error as StdError;

use serde_json::Value;
use thiserror::Error;

pub const DEFAULT_NETWORK_MESSAGE: &str = "network request failed";
pub const CANCELLED_MESSAGE: &str = "request was cancelled";

/// A response was received but its status is outside `200..300`.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("API error: {status_code} {status_text}")]
pub struct ApiError {
    status_code: u16,
    status_text: String,
    parsed_body: Option<Value>,
}

impl ApiError {
    pub fn new(status_code: u16, status_text: impl Into<String>, parsed_body: Option<Value>) -> Self {
        Self {
            status_code,
            status_text: status_text.into(),
            parsed_body,
        }
    }

    pub fn status_code(&self) -> u16 {
        self.status_code
    }

    pub fn status_text(&self) -> &str {
        &self.status_text
    }

    /// The error body decoded as JSON, or `None` when it was empty or not JSON.
    pub fn parsed_body(&self) -> Option<&Value> {
        self.parsed_body.as_ref()
    }

    /// `true` for 4xx statuses.
    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.status_code)
    }

    /// `true` for any status of 500 and above.
    pub fn is_server_error(&self) -> bool {
        self.status_code >= 500
    }
}

/// No response was obtained: DNS, refused connection, reset, cancellation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct NetworkError {
    message: String,
    cancelled: bool,
}

impl NetworkError {
    /// Wraps a transport message. An empty message falls back to the default.
    pub fn new(message: impl Into<String>) -> Self {
        let message = message.into();
        if message.is_empty() {
            return Self::default();
        }
        Self {
            message,
            cancelled: false,
        }
    }

    /// The in-flight call was aborted through its `CancelHandle`.
    pub fn cancelled() -> Self {
        Self {
            message: CANCELLED_MESSAGE.to_string(),
            cancelled: true,
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn is_cancellation(&self) -> bool {
        self.cancelled
    }
}

impl Default for NetworkError {
    fn default() -> Self {
        Self {
            message: DEFAULT_NETWORK_MESSAGE.to_string(),
            cancelled: false,
        }
    }
}

impl From<reqwest::Error> for NetworkError {
    fn from(err: reqwest::Error) -> Self {
        // reqwest's Display omits the underlying io error; keep the whole chain.
        let mut message = err.to_string();
        let mut source = err.source();
        while let Some(inner) = source {
            message.push_str(": ");
            message.push_str(&inner.to_string());
            source = inner.source();
        }
        Self::new(message)
    }
}

/// The configured deadline elapsed before the exchange completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("request timed out after {timeout_ms}ms")]
pub struct TimeoutError {
    timeout_ms: u64,
}

impl TimeoutError {
    pub fn new(timeout_ms: u64) -> Self {
        Self { timeout_ms }
    }

    pub fn timeout_ms(&self) -> u64 {
        self.timeout_ms
    }
}

/// Explicit discriminant of a `ClientError`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Api,
    Network,
    Timeout,
    Decode,
    Serialize,
    InvalidUrl,
    Config,
}

/// Every failure an `ApiClient` call can return.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Network(#[from] NetworkError),

    #[error(transparent)]
    Timeout(#[from] TimeoutError),

    /// A 2xx body that is not valid JSON for the declared response type.
    #[error("failed to decode response body: {0}")]
    Decode(#[source] serde_json::Error),

    /// The request body could not be serialized to JSON.
    #[error("failed to serialize request body: {0}")]
    Serialize(#[source] serde_json::Error),

    #[error("invalid request URL `{url}`: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl ClientError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ClientError::Api(_) => ErrorKind::Api,
            ClientError::Network(_) => ErrorKind::Network,
            ClientError::Timeout(_) => ErrorKind::Timeout,
            ClientError::Decode(_) => ErrorKind::Decode,
            ClientError::Serialize(_) => ErrorKind::Serialize,
            ClientError::InvalidUrl { .. } => ErrorKind::InvalidUrl,
            ClientError::Config(_) => ErrorKind::Config,
        }
    }

    pub fn is_api_error(&self) -> bool {
        self.as_api_error().is_some()
    }

    pub fn as_api_error(&self) -> Option<&ApiError> {
        match self {
            ClientError::Api(err) => Some(err),
            _ => None,
        }
    }

    pub fn is_network_error(&self) -> bool {
        self.as_network_error().is_some()
    }

    pub fn as_network_error(&self) -> Option<&NetworkError> {
        match self {
            ClientError::Network(err) => Some(err),
            _ => None,
        }
    }

    pub fn is_timeout_error(&self) -> bool {
        self.as_timeout_error().is_some()
    }

    pub fn as_timeout_error(&self) -> Option<&TimeoutError> {
        match self {
            ClientError::Timeout(err) => Some(err),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;

// ---------------------------------------------------------------------------
// Narrowing over arbitrary failures
// ---------------------------------------------------------------------------

/// Walk `err` and its sources, returning the first hit of `pick`.
fn find_in_chain<'a, T>(
    err: &'a (dyn StdError + 'static),
    pick: impl Fn(&'a (dyn StdError + 'static)) -> Option<&'a T>,
) -> Option<&'a T> {
    let mut current = Some(err);
    while let Some(e) = current {
        if let Some(found) = pick(e) {
            return Some(found);
        }
        current = e.source();
    }
    None
}

/// Find an `ApiError` anywhere in the chain of an arbitrary failure.
pub fn as_api_error<'a>(err: &'a (dyn StdError + 'static)) -> Option<&'a ApiError> {
    find_in_chain(err, |e| {
        e.downcast_ref::<ApiError>()
            .or_else(|| e.downcast_ref::<ClientError>().and_then(ClientError::as_api_error))
    })
}

pub fn is_api_error(err: &(dyn StdError + 'static)) -> bool {
    as_api_error(err).is_some()
}

/// Find a `NetworkError` anywhere in the chain of an arbitrary failure.
pub fn as_network_error<'a>(err: &'a (dyn StdError + 'static)) -> Option<&'a NetworkError> {
    find_in_chain(err, |e| {
        e.downcast_ref::<NetworkError>()
            .or_else(|| e.downcast_ref::<ClientError>().and_then(ClientError::as_network_error))
    })
}

pub fn is_network_error(err: &(dyn StdError + 'static)) -> bool {
    as_network_error(err).is_some()
}

/// Find a `TimeoutError` anywhere in the chain of an arbitrary failure.
pub fn as_timeout_error<'a>(err: &'a (dyn StdError + 'static)) -> Option<&'a TimeoutError> {
    find_in_chain(err, |e| {
        e.downcast_ref::<TimeoutError>()
            .or_else(|| e.downcast_ref::<ClientError>().and_then(ClientError::as_timeout_error))
    })
}

pub fn is_timeout_error(err: &(dyn StdError + 'static)) -> bool {
    as_timeout_error(err).is_some()
}
