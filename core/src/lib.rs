//! Typed HTTP client facade for a JSON REST backend.
//!
//! # Overview
//! `ApiClient` centralizes URL construction, header and body serialization,
//! response decoding and error classification behind one generic `request`
//! method and its five verb shorthands. Resource helpers such as
//! [`UsersApi`] are thin functions on top of it.
//!
//! # Design
//! - The client holds only an immutable [`ClientConfig`] and a [`Transport`];
//!   it is safe to share across concurrent calls.
//! - Request construction (`build_request`) is pure and separate from the
//!   I/O (`Transport::send`), so both halves are testable on their own.
//! - Every failure is a [`ClientError`]. Transport failures become
//!   [`NetworkError`], non-2xx answers [`ApiError`], an elapsed deadline
//!   [`TimeoutError`]; a malformed success body is reported as
//!   `ClientError::Decode`, outside those three kinds.
//! - One transport call per request: no retry, caching or deduplication.
//!
//! ```no_run
//! use api_client::{ApiClient, ClientConfig, RequestOptions, User};
//!
//! # async fn run() -> api_client::Result<()> {
//! let client = ApiClient::new(ClientConfig::new("https://api.example.com/"));
//! let user: User = client.get("/users/42", RequestOptions::new()).await?;
//! match client.users().get_by_id(9999).await {
//!     Err(err) if err.as_api_error().is_some_and(|e| e.status_code() == 404) => {}
//!     other => { other?; }
//! }
//! # let _ = user;
//! # Ok(())
//! # }
//! ```

pub mod cancel;
pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod options;
pub mod transport;
pub mod types;
pub mod users;

pub use cancel::CancelHandle;
pub use client::ApiClient;
pub use config::ClientConfig;
pub use error::{
    as_api_error, as_network_error, as_timeout_error, is_api_error, is_network_error,
    is_timeout_error, ApiError, ClientError, ErrorKind, NetworkError, Result, TimeoutError,
};
pub use http::{HttpMethod, HttpRequest};
pub use options::{QueryValue, RequestOptions};
pub use transport::{ReqwestResponse, ReqwestTransport, Transport, TransportResponse};
pub use types::{CreateUserDto, UpdateUserDto, User};
pub use users::{ListUsersParams, UsersApi};
