//! In-memory `/users` backend used as the live peer of the client's
//! integration tests and usage demo.

use std::{collections::BTreeMap, sync::Arc};

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};

pub const DEFAULT_PAGE_SIZE: usize = 10;

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: u64,
    pub name: String,
    pub email: String,
    pub created_at: String,
}

#[derive(Deserialize)]
pub struct CreateUser {
    pub name: String,
    pub email: String,
}

#[derive(Deserialize)]
pub struct UpdateUser {
    pub name: Option<String>,
    pub email: Option<String>,
}

#[derive(Deserialize)]
pub struct ListParams {
    pub page: Option<usize>,
    pub limit: Option<usize>,
}

#[derive(Deserialize)]
pub struct SearchParams {
    pub q: String,
}

/// Body of every non-2xx answer.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

#[derive(Debug, Default)]
pub struct Store {
    users: BTreeMap<u64, User>,
    next_id: u64,
}

impl Store {
    fn insert(&mut self, name: String, email: String) -> User {
        self.next_id += 1;
        let user = User {
            id: self.next_id,
            name,
            email,
            created_at: chrono::Utc::now().format("%Y-%m-%d").to_string(),
        };
        self.users.insert(user.id, user.clone());
        user
    }
}

pub type Db = Arc<RwLock<Store>>;

type Rejection = (StatusCode, Json<ErrorBody>);

fn reject(status: StatusCode, message: &str) -> Rejection {
    (
        status,
        Json(ErrorBody {
            error: message.to_string(),
        }),
    )
}

fn not_found() -> Rejection {
    reject(StatusCode::NOT_FOUND, "not found")
}

fn check_email(email: &str) -> Result<(), Rejection> {
    if email.contains('@') {
        Ok(())
    } else {
        Err(reject(StatusCode::UNPROCESSABLE_ENTITY, "invalid email"))
    }
}

pub fn app() -> Router {
    app_with_store(Store::default())
}

/// Build the router over a pre-populated store.
pub fn app_with_store(store: Store) -> Router {
    let db: Db = Arc::new(RwLock::new(store));
    Router::new()
        .route("/users", get(list_users).post(create_user))
        .route("/users/search", get(search_users))
        .route(
            "/users/{id}",
            get(get_user).patch(update_user).delete(delete_user),
        )
        .with_state(db)
}

/// Store seeded with `(name, email)` pairs, ids assigned from 1.
pub fn seeded_store<'a>(users: impl IntoIterator<Item = (&'a str, &'a str)>) -> Store {
    let mut store = Store::default();
    for (name, email) in users {
        store.insert(name.to_string(), email.to_string());
    }
    store
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    serve(listener, app()).await
}

pub async fn serve(listener: TcpListener, app: Router) -> Result<(), std::io::Error> {
    if let Ok(addr) = listener.local_addr() {
        tracing::info!(%addr, "mock server listening");
    }
    axum::serve(listener, app).await
}

async fn list_users(
    State(db): State<Db>,
    Query(params): Query<ListParams>,
) -> Json<Vec<User>> {
    let limit = params.limit.unwrap_or(DEFAULT_PAGE_SIZE);
    let page = params.page.unwrap_or(1).max(1);
    let store = db.read().await;
    Json(
        store
            .users
            .values()
            .skip(page.saturating_sub(1).saturating_mul(limit))
            .take(limit)
            .cloned()
            .collect(),
    )
}

async fn search_users(
    State(db): State<Db>,
    Query(params): Query<SearchParams>,
) -> Json<Vec<User>> {
    let needle = params.q.to_lowercase();
    let store = db.read().await;
    Json(
        store
            .users
            .values()
            .filter(|u| {
                u.name.to_lowercase().contains(&needle) || u.email.to_lowercase().contains(&needle)
            })
            .cloned()
            .collect(),
    )
}

async fn create_user(
    State(db): State<Db>,
    Json(input): Json<CreateUser>,
) -> Result<(StatusCode, Json<User>), Rejection> {
    check_email(&input.email)?;
    let user = db.write().await.insert(input.name, input.email);
    tracing::debug!(id = user.id, "user created");
    Ok((StatusCode::CREATED, Json(user)))
}

async fn get_user(State(db): State<Db>, Path(id): Path<u64>) -> Result<Json<User>, Rejection> {
    let store = db.read().await;
    store.users.get(&id).cloned().map(Json).ok_or_else(not_found)
}

async fn update_user(
    State(db): State<Db>,
    Path(id): Path<u64>,
    Json(input): Json<UpdateUser>,
) -> Result<Json<User>, Rejection> {
    if let Some(email) = &input.email {
        check_email(email)?;
    }
    let mut store = db.write().await;
    let user = store.users.get_mut(&id).ok_or_else(not_found)?;
    if let Some(name) = input.name {
        user.name = name;
    }
    if let Some(email) = input.email {
        user.email = email;
    }
    Ok(Json(user.clone()))
}

async fn delete_user(State(db): State<Db>, Path(id): Path<u64>) -> Result<StatusCode, Rejection> {
    let mut store = db.write().await;
    store
        .users
        .remove(&id)
        .map(|_| StatusCode::NO_CONTENT)
        .ok_or_else(not_found)
}
