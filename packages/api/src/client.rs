//! # HTTP client for the accounts API
//!
//! [`AccountsApi`] is the async seam between the console and the remote accounts
//! service. [`HttpAccounts`] talks to a real server with `reqwest` (which uses the
//! browser's `fetch` on WASM); [`MemoryAccounts`](crate::MemoryAccounts) is the
//! in-process stand-in used by tests.
//!
//! | Method | Request |
//! |--------|---------|
//! | [`register`](AccountsApi::register) | `POST /accounts/register` |
//! | [`authenticate`](AccountsApi::authenticate) | `POST /accounts/authenticate` |
//! | [`list`](AccountsApi::list) | `GET /accounts` |
//! | [`get`](AccountsApi::get) | `GET /accounts/{id}` |
//! | [`update`](AccountsApi::update) | `PUT /accounts/{id}` |
//! | [`delete`](AccountsApi::delete) | `DELETE /accounts/{id}` |
//!
//! Every method except `authenticate` takes the current bearer token, if any, and
//! sends it as `Authorization: Bearer <token>`.

use std::future::Future;

use reqwest::{Client, Method, RequestBuilder, Response};
use serde::Serialize;

use crate::error::ApiError;
use crate::models::{NewUser, Session, User, UserUpdate};

/// Async interface to the accounts service.
pub trait AccountsApi {
    fn register(
        &self,
        token: Option<&str>,
        user: &NewUser,
    ) -> impl Future<Output = Result<(), ApiError>>;
    fn authenticate(
        &self,
        username: &str,
        password: &str,
    ) -> impl Future<Output = Result<Session, ApiError>>;
    fn list(&self, token: Option<&str>) -> impl Future<Output = Result<Vec<User>, ApiError>>;
    fn get(&self, token: Option<&str>, id: &str) -> impl Future<Output = Result<User, ApiError>>;
    fn update(
        &self,
        token: Option<&str>,
        id: &str,
        update: &UserUpdate,
    ) -> impl Future<Output = Result<(), ApiError>>;
    fn delete(&self, token: Option<&str>, id: &str) -> impl Future<Output = Result<(), ApiError>>;
}

#[derive(Serialize)]
struct Credentials<'a> {
    username: &'a str,
    password: &'a str,
}

/// `reqwest`-backed [`AccountsApi`].
#[derive(Clone, Debug)]
pub struct HttpAccounts {
    client: Client,
    base_url: String,
}

impl HttpAccounts {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            client: Client::new(),
            base_url,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn request(&self, method: Method, path: &str, token: Option<&str>) -> RequestBuilder {
        let builder = self.client.request(method, self.url(path));
        match token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn send(&self, builder: RequestBuilder) -> Result<Response, ApiError> {
        let response = builder.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        let err = ApiError::from_status(status.as_u16(), &body);
        tracing::debug!("accounts API returned {}: {}", status, err);
        Err(err)
    }
}

impl AccountsApi for HttpAccounts {
    async fn register(&self, token: Option<&str>, user: &NewUser) -> Result<(), ApiError> {
        let builder = self
            .request(Method::POST, "/accounts/register", token)
            .json(user);
        self.send(builder).await?;
        Ok(())
    }

    async fn authenticate(&self, username: &str, password: &str) -> Result<Session, ApiError> {
        let builder = self
            .request(Method::POST, "/accounts/authenticate", None)
            .json(&Credentials { username, password });
        let response = self.send(builder).await.map_err(ApiError::into_login_error)?;
        Ok(response.json::<Session>().await?)
    }

    async fn list(&self, token: Option<&str>) -> Result<Vec<User>, ApiError> {
        let response = self
            .send(self.request(Method::GET, "/accounts", token))
            .await?;
        Ok(response.json::<Vec<User>>().await?)
    }

    async fn get(&self, token: Option<&str>, id: &str) -> Result<User, ApiError> {
        let response = self
            .send(self.request(Method::GET, &format!("/accounts/{id}"), token))
            .await?;
        Ok(response.json::<User>().await?)
    }

    async fn update(
        &self,
        token: Option<&str>,
        id: &str,
        update: &UserUpdate,
    ) -> Result<(), ApiError> {
        let builder = self
            .request(Method::PUT, &format!("/accounts/{id}"), token)
            .json(update);
        self.send(builder).await?;
        Ok(())
    }

    async fn delete(&self, token: Option<&str>, id: &str) -> Result<(), ApiError> {
        self.send(self.request(Method::DELETE, &format!("/accounts/{id}"), token))
            .await?;
        Ok(())
    }
}
