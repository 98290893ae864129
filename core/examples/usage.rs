//! Walk through the common client patterns against an in-process mock server.
//!
//! Run with `RUST_LOG=api_client=debug cargo run -p api-client-core --example usage`.

use std::time::Duration;

use api_client::{
    ApiClient, CancelHandle, ClientConfig, CreateUserDto, ListUsersParams, RequestOptions, User,
};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

async fn fetch_user(client: &ApiClient, id: u64) -> Option<User> {
    match client.get::<User>(&format!("/users/{id}"), RequestOptions::new()).await {
        Ok(user) => {
            tracing::info!(name = %user.name, "fetched user");
            Some(user)
        }
        Err(err) => {
            tracing::error!(error = %err, "could not fetch user");
            None
        }
    }
}

async fn endpoint_helpers(client: &ApiClient) -> api_client::Result<()> {
    let users = client.users().get_all(ListUsersParams::page(1, 10)).await?;
    tracing::info!(count = users.len(), "listed users");

    let user = client.users().get_by_id(1).await?;
    tracing::info!(name = %user.name, email = %user.email, "single user");
    Ok(())
}

async fn create_user(client: &ApiClient) -> api_client::Result<()> {
    let created = client
        .users()
        .create(&CreateUserDto {
            name: "Ivan Petrov".to_string(),
            email: "ivan@example.com".to_string(),
        })
        .await?;
    tracing::info!(id = created.id, "created user");
    Ok(())
}

async fn error_handling(client: &ApiClient) {
    let Err(err) = client.users().get_by_id(99_999).await else {
        return;
    };
    if let Some(api) = err.as_api_error() {
        if api.status_code() == 404 {
            tracing::info!("user not found");
        } else if api.is_client_error() {
            tracing::warn!(%api, "client error");
        } else if api.is_server_error() {
            tracing::warn!("server error, try again later");
        }
    } else if err.is_network_error() {
        tracing::warn!("no connection");
    }
}

async fn cancellable_request(client: &ApiClient) {
    let handle = CancelHandle::new();
    let timer = handle.cancel_after(Duration::from_secs(5));

    match client
        .get::<Vec<User>>("/users", RequestOptions::new().cancel_with(handle))
        .await
    {
        Ok(users) => tracing::info!(count = users.len(), "users"),
        Err(err) if err.as_network_error().is_some_and(|e| e.is_cancellation()) => {
            tracing::info!("request was cancelled");
        }
        Err(err) => tracing::error!(error = %err, "request failed"),
    }
    timer.abort();
}

async fn parallel_requests(client: &ApiClient) -> api_client::Result<()> {
    let users = client.users();
    let (all, current) = tokio::join!(users.get_all(ListUsersParams::default()), users.get_by_id(1));
    tracing::info!(total = all?.len(), current = %current?.name, "parallel requests");
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let store = mock_server::seeded_store([("Ana", "ana@example.com"), ("Bruno", "bruno@example.com")]);
    tokio::spawn(mock_server::serve(listener, mock_server::app_with_store(store)));

    let client = ApiClient::new(ClientConfig::new(format!("http://{addr}")).with_timeout_ms(10_000));

    fetch_user(&client, 1).await;
    endpoint_helpers(&client).await?;
    create_user(&client).await?;
    error_handling(&client).await;
    cancellable_request(&client).await;
    parallel_requests(&client).await?;
    Ok(())
}
