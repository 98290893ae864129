//! Endpoint helpers for the `/users` resource.
//!
//! Each helper is exactly one pipeline call: it supplies the path, the query
//! params and the body, and leaves decoding and error classification to
//! `ApiClient`.

use crate::client::ApiClient;
use crate::error::Result;
use crate::options::RequestOptions;
use crate::transport::Transport;
use crate::types::{CreateUserDto, UpdateUserDto, User};

/// Pagination for `UsersApi::get_all`. Unset fields are left out of the query.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListUsersParams {
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl ListUsersParams {
    pub fn page(page: u32, limit: u32) -> Self {
        Self {
            page: Some(page),
            limit: Some(limit),
        }
    }

    fn to_options(self) -> RequestOptions {
        RequestOptions::new()
            .param_opt("page", self.page)
            .param_opt("limit", self.limit)
    }
}

/// User management operations, borrowed from an `ApiClient`.
#[derive(Debug, Clone, Copy)]
pub struct UsersApi<'a, T> {
    client: &'a ApiClient<T>,
}

impl<T: Transport> ApiClient<T> {
    pub fn users(&self) -> UsersApi<'_, T> {
        UsersApi { client: self }
    }
}

impl<T: Transport> UsersApi<'_, T> {
    pub async fn get_all(&self, params: ListUsersParams) -> Result<Vec<User>> {
        self.client.get("/users", params.to_options()).await
    }

    pub async fn get_by_id(&self, id: u64) -> Result<User> {
        self.client.get(&format!("/users/{id}"), RequestOptions::new()).await
    }

    pub async fn create(&self, data: &CreateUserDto) -> Result<User> {
        self.client
            .post("/users", RequestOptions::new().body(data))
            .await
    }

    pub async fn update(&self, id: u64, data: &UpdateUserDto) -> Result<User> {
        self.client
            .patch(&format!("/users/{id}"), RequestOptions::new().body(data))
            .await
    }

    pub async fn delete(&self, id: u64) -> Result<()> {
        self.client
            .delete(&format!("/users/{id}"), RequestOptions::new())
            .await
    }

    pub async fn search(&self, query: &str) -> Result<Vec<User>> {
        self.client
            .get("/users/search", RequestOptions::new().param("q", query))
            .await
    }
}
