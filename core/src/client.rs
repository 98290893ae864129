//! Generic request pipeline.
//!
//! # Design
//! `ApiClient` holds an immutable `ClientConfig` and a `Transport`; it keeps
//! no state between calls and can be shared across any number of concurrent
//! requests. Each call goes through two halves:
//!
//! - `build_request` is pure: base URL + path, query params in insertion
//!   order, headers merged as defaults < `Content-Type: application/json` <
//!   per-call, and a JSON body unless the method is GET.
//! - `exchange` sends the request once and classifies the outcome: transport
//!   failure -> `NetworkError`, non-2xx -> `ApiError` with the body parsed
//!   as JSON when possible, 204 -> JSON `null` decoded into the caller's type
//!   without reading the body, other 2xx -> the decoded body.
//!
//! The configured timeout bounds the whole exchange and the caller's
//! `CancelHandle` aborts it; neither is ever retried.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

use crate::cancel::CancelHandle;
use crate::config::ClientConfig;
use crate::error::{ApiError, ClientError, NetworkError, Result, TimeoutError};
use crate::http::{merge_header, HttpMethod, HttpRequest};
use crate::options::RequestOptions;
use crate::transport::{ReqwestTransport, Transport, TransportResponse};

pub const CONTENT_TYPE: &str = "Content-Type";
pub const APPLICATION_JSON: &str = "application/json";
pub const NO_CONTENT: u16 = 204;

/// Typed JSON client for one REST backend.
#[derive(Debug, Clone)]
pub struct ApiClient<T = ReqwestTransport> {
    config: ClientConfig,
    transport: T,
}

impl ApiClient<ReqwestTransport> {
    pub fn new(config: ClientConfig) -> Self {
        Self::with_transport(config, ReqwestTransport::new())
    }
}

impl Default for ApiClient<ReqwestTransport> {
    fn default() -> Self {
        Self::new(ClientConfig::default())
    }
}

impl<T: Transport> ApiClient<T> {
    pub fn with_transport(config: ClientConfig, transport: T) -> Self {
        Self { config, transport }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub async fn get<R>(&self, path: &str, options: RequestOptions) -> Result<R>
    where
        R: DeserializeOwned,
    {
        self.request(HttpMethod::Get, path, options).await
    }

    pub async fn post<R, B>(&self, path: &str, options: RequestOptions<B>) -> Result<R>
    where
        R: DeserializeOwned,
        B: Serialize,
    {
        self.request(HttpMethod::Post, path, options).await
    }

    pub async fn put<R, B>(&self, path: &str, options: RequestOptions<B>) -> Result<R>
    where
        R: DeserializeOwned,
        B: Serialize,
    {
        self.request(HttpMethod::Put, path, options).await
    }

    pub async fn patch<R, B>(&self, path: &str, options: RequestOptions<B>) -> Result<R>
    where
        R: DeserializeOwned,
        B: Serialize,
    {
        self.request(HttpMethod::Patch, path, options).await
    }

    pub async fn delete<R>(&self, path: &str, options: RequestOptions) -> Result<R>
    where
        R: DeserializeOwned,
    {
        self.request(HttpMethod::Delete, path, options).await
    }

    /// Issue one request and decode its JSON answer as `R`.
    ///
    /// `R` is trusted, not validated beyond what `serde` needs to build it.
    /// Endpoints that may answer 204 should be declared as `()` or
    /// `Option<_>`, which is what an absent body decodes to.
    pub async fn request<R, B>(
        &self,
        method: HttpMethod,
        path: &str,
        options: RequestOptions<B>,
    ) -> Result<R>
    where
        R: DeserializeOwned,
        B: Serialize,
    {
        let request = self.build_request(method, path, &options)?;
        debug!(method = %request.method, url = %request.url, "sending request");

        let exchange = with_cancel(options.cancel.as_ref(), self.exchange(request));
        let outcome = match self.config.timeout() {
            Some(limit) => match tokio::time::timeout(limit, exchange).await {
                Ok(outcome) => outcome,
                Err(_) => {
                    let timeout_ms = self.config.timeout_ms().unwrap_or_default();
                    warn!(%method, path, timeout_ms, "request timed out");
                    Err(TimeoutError::new(timeout_ms).into())
                }
            },
            None => exchange.await,
        };

        if let Err(err) = &outcome {
            match err {
                ClientError::Network(net) => warn!(%method, path, error = %net, "transport failure"),
                other => debug!(%method, path, error = %other, "request failed"),
            }
        }
        outcome
    }

    /// Build the request without sending it.
    pub fn build_request<B>(
        &self,
        method: HttpMethod,
        path: &str,
        options: &RequestOptions<B>,
    ) -> Result<HttpRequest>
    where
        B: Serialize,
    {
        let raw = format!("{}{}", self.config.base_url(), path);
        let mut url = Url::parse(&raw).map_err(|source| ClientError::InvalidUrl { url: raw, source })?;
        if !options.params.is_empty() {
            let mut query = url.query_pairs_mut();
            for (key, value) in &options.params {
                query.append_pair(key, &value.to_string());
            }
        }

        let mut headers = self.config.default_headers().to_vec();
        merge_header(&mut headers, CONTENT_TYPE, APPLICATION_JSON);
        for (name, value) in &options.headers {
            merge_header(&mut headers, name, value);
        }

        let body = match (&options.body, method) {
            (Some(body), method) if method != HttpMethod::Get => {
                Some(serde_json::to_string(body).map_err(ClientError::Serialize)?)
            }
            _ => None,
        };

        Ok(HttpRequest {
            method,
            url,
            headers,
            body,
        })
    }

    async fn exchange<R>(&self, request: HttpRequest) -> Result<R>
    where
        R: DeserializeOwned,
    {
        let response = self.transport.send(request).await?;
        let status = response.status();

        if !(200..300).contains(&status) {
            let status_text = response.status_text();
            let parsed_body = match response.bytes().await {
                Ok(body) => serde_json::from_slice::<Value>(&body).ok(),
                Err(_) => None,
            };
            debug!(status, "non-success status");
            return Err(ApiError::new(status, status_text, parsed_body).into());
        }

        if status == NO_CONTENT {
            return serde_json::from_value(Value::Null).map_err(ClientError::Decode);
        }

        let body = response.bytes().await?;
        debug!(status, bytes = body.len(), "response received");
        serde_json::from_slice(&body).map_err(ClientError::Decode)
    }
}

/// Race `fut` against `cancel`; a fired handle wins even if `fut` is ready.
async fn with_cancel<F, R>(cancel: Option<&CancelHandle>, fut: F) -> Result<R>
where
    F: std::future::Future<Output = Result<R>>,
{
    match cancel {
        Some(handle) => tokio::select! {
            biased;
            _ = handle.cancelled() => Err(NetworkError::cancelled().into()),
            outcome = fut => outcome,
        },
        None => fut.await,
    }
}
