//! The network seam between the pipeline and an HTTP implementation.
//!
//! # Design
//! A `Transport` turns an `HttpRequest` into a `TransportResponse` whose body
//! has not been read yet. The pipeline inspects the status first and only then
//! decides whether to pull the body, so a 204 answer is never read. Anything
//! that fails before a response exists is reported as a `NetworkError`.

use async_trait::async_trait;
use bytes::Bytes;

use crate::error::NetworkError;
use crate::http::HttpRequest;

/// Executes built requests.
#[async_trait]
pub trait Transport: Send + Sync {
    type Response: TransportResponse;

    async fn send(&self, request: HttpRequest) -> Result<Self::Response, NetworkError>;
}

/// A response whose status line is known and whose body is still unread.
#[async_trait]
pub trait TransportResponse: Send {
    fn status(&self) -> u16;

    /// Reason phrase for the status, empty when unknown.
    fn status_text(&self) -> String;

    /// Read the whole body.
    async fn bytes(self) -> Result<Bytes, NetworkError>;
}

/// Default transport backed by `reqwest`.
///
/// No timeout is configured on the inner client; deadlines are enforced by
/// the pipeline so that they surface as `TimeoutError`.
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reuse an existing, caller-configured `reqwest::Client`.
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    type Response = ReqwestResponse;

    async fn send(&self, request: HttpRequest) -> Result<ReqwestResponse, NetworkError> {
        let mut builder = self.client.request(request.method.into(), request.url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }
        let inner = builder.send().await?;
        Ok(ReqwestResponse { inner })
    }
}

#[derive(Debug)]
pub struct ReqwestResponse {
    inner: reqwest::Response,
}

#[async_trait]
impl TransportResponse for ReqwestResponse {
    fn status(&self) -> u16 {
        self.inner.status().as_u16()
    }

    fn status_text(&self) -> String {
        self.inner
            .status()
            .canonical_reason()
            .unwrap_or_default()
            .to_string()
    }

    async fn bytes(self) -> Result<Bytes, NetworkError> {
        Ok(self.inner.bytes().await?)
    }
}
