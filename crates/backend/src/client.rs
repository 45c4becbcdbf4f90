// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Bearer-authenticated HTTP transport with one silent token refresh.
//!
//! A `401` from any endpoint other than `token/`, `token/refresh/` or
//! `auth/me/` triggers a single `POST token/refresh/` and one retry of the
//! original request. If the refresh fails, or the retry is rejected again,
//! both tokens are cleared and [`BackendError::SessionExpired`] is returned.

use crate::error::BackendError;
use reqwest::{Method, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

/// Path prefix of every backend endpoint.
pub const API_PREFIX: &str = "api/v1/";

const AUTH_ENDPOINTS: [&str; 3] = ["token/", "token/refresh/", "auth/me/"];

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Access and refresh token pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tokens {
    /// Short-lived bearer token.
    pub access: String,
    /// Long-lived token used to obtain a new access token.
    pub refresh: Option<String>,
}

/// Shared, clearable token storage.
///
/// Clones share the same tokens, so a refresh performed by one request is
/// seen by every other request using the same store.
#[derive(Debug, Clone, Default)]
pub struct TokenStore {
    inner: Arc<RwLock<Option<Tokens>>>,
}

impl TokenStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store holding `tokens`.
    #[must_use]
    pub fn with_tokens(tokens: Tokens) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Some(tokens))),
        }
    }

    /// Returns the current access token.
    pub async fn access(&self) -> Option<String> {
        self.inner.read().await.as_ref().map(|t| t.access.clone())
    }

    /// Returns the current refresh token.
    pub async fn refresh_token(&self) -> Option<String> {
        self.inner
            .read()
            .await
            .as_ref()
            .and_then(|t| t.refresh.clone())
    }

    /// Returns a copy of both tokens.
    pub async fn snapshot(&self) -> Option<Tokens> {
        self.inner.read().await.clone()
    }

    /// Stores a new token pair.
    pub async fn set(&self, tokens: Tokens) {
        *self.inner.write().await = Some(tokens);
    }

    /// Replaces the access token, keeping the refresh token.
    pub async fn replace_access(&self, access: String) {
        let mut guard = self.inner.write().await;
        match guard.as_mut() {
            Some(tokens) => tokens.access = access,
            None => {
                *guard = Some(Tokens {
                    access,
                    refresh: None,
                });
            }
        }
    }

    /// Forgets both tokens.
    pub async fn clear(&self) {
        *self.inner.write().await = None;
    }
}

#[derive(Serialize)]
struct RefreshRequest<'a> {
    refresh: &'a str,
}

#[derive(Deserialize)]
struct RefreshResponse {
    access: Option<String>,
}

fn is_auth_endpoint(path: &str) -> bool {
    let path: &str = path.trim_start_matches('/');
    AUTH_ENDPOINTS.iter().any(|endpoint| path.starts_with(endpoint))
}

/// Async client for the roster REST backend.
#[derive(Debug, Clone)]
pub struct BackendClient {
    http: reqwest::Client,
    base: Url,
    tokens: TokenStore,
}

impl BackendClient {
    /// Creates a client for `{host}/api/v1/`.
    ///
    /// # Arguments
    ///
    /// * `host` - Scheme and authority of the backend, e.g. `https://roster.example.org`
    /// * `tokens` - Token storage shared with the caller
    ///
    /// # Errors
    ///
    /// Returns an error if the host is not a valid base URL or the HTTP client cannot be built.
    pub fn new(host: &str, tokens: TokenStore) -> Result<Self, BackendError> {
        let base: Url = Url::parse(&format!("{}/{API_PREFIX}", host.trim_end_matches('/')))
            .map_err(|e| BackendError::InvalidUrl(format!("{host}: {e}")))?;
        if base.cannot_be_a_base() {
            return Err(BackendError::InvalidUrl(host.to_string()));
        }
        let http: reqwest::Client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        info!(base = %base, "Backend client configured");
        Ok(Self { http, base, tokens })
    }

    /// Returns a client sharing this one's connection pool but using other tokens.
    #[must_use]
    pub fn with_tokens(&self, tokens: TokenStore) -> Self {
        Self {
            http: self.http.clone(),
            base: self.base.clone(),
            tokens,
        }
    }

    /// The token storage used by this client.
    #[must_use]
    pub const fn tokens(&self) -> &TokenStore {
        &self.tokens
    }

    /// The resolved API base URL.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base
    }

    fn endpoint(&self, path: &str) -> Result<Url, BackendError> {
        self.base
            .join(path.trim_start_matches('/'))
            .map_err(|e| BackendError::InvalidUrl(format!("{path}: {e}")))
    }

    async fn send_once(
        &self,
        method: Method,
        url: &Url,
        query: &[(&str, String)],
        body: Option<&serde_json::Value>,
    ) -> Result<(StatusCode, Vec<u8>), BackendError> {
        let mut request = self.http.request(method, url.clone());
        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(access) = self.tokens.access().await {
            request = request.bearer_auth(access);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status: StatusCode = response.status();
        let bytes: Vec<u8> = response.bytes().await?.to_vec();
        Ok((status, bytes))
    }

    /// Exchanges the refresh token for a new access token and stores it.
    ///
    /// # Errors
    ///
    /// Returns `BackendError::SessionExpired` if there is no refresh token or
    /// the backend does not return an access token.
    pub async fn refresh_access(&self) -> Result<String, BackendError> {
        let refresh: String = self
            .tokens
            .refresh_token()
            .await
            .ok_or(BackendError::SessionExpired)?;

        let response = self
            .http
            .post(self.endpoint("token/refresh/")?)
            .json(&RefreshRequest { refresh: &refresh })
            .send()
            .await?;
        if !response.status().is_success() {
            debug!(status = %response.status(), "Token refresh rejected");
            return Err(BackendError::SessionExpired);
        }

        let parsed: RefreshResponse = response.json().await?;
        let access: String = parsed.access.ok_or(BackendError::SessionExpired)?;
        self.tokens.replace_access(access.clone()).await;
        debug!("Access token refreshed");
        Ok(access)
    }

    /// Sends a request, refreshing the session once on `401`.
    ///
    /// # Errors
    ///
    /// Returns `BackendError::Status` for non-success responses and
    /// `BackendError::SessionExpired` when the session cannot be renewed.
    pub async fn execute(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<&serde_json::Value>,
    ) -> Result<Vec<u8>, BackendError> {
        let url: Url = self.endpoint(path)?;
        let (status, bytes) = self.send_once(method.clone(), &url, query, body).await?;

        if status != StatusCode::UNAUTHORIZED || is_auth_endpoint(path) {
            return into_result(status, bytes);
        }

        if self.refresh_access().await.is_ok() {
            let (status, bytes) = self.send_once(method, &url, query, body).await?;
            if status != StatusCode::UNAUTHORIZED {
                return into_result(status, bytes);
            }
        }

        warn!(path, "Backend session expired, clearing tokens");
        self.tokens.clear().await;
        Err(BackendError::SessionExpired)
    }

    pub(crate) async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, BackendError> {
        let bytes: Vec<u8> = self.execute(Method::GET, path, query, None).await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    pub(crate) async fn send_json<B: Serialize + Sync, T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> Result<T, BackendError> {
        let body: serde_json::Value = serde_json::to_value(body)?;
        let bytes: Vec<u8> = self.execute(method, path, &[], Some(&body)).await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    pub(crate) async fn delete(&self, path: &str) -> Result<(), BackendError> {
        self.execute(Method::DELETE, path, &[], None).await?;
        Ok(())
    }
}

fn into_result(status: StatusCode, bytes: Vec<u8>) -> Result<Vec<u8>, BackendError> {
    if status.is_success() {
        return Ok(bytes);
    }
    Err(BackendError::Status {
        status: status.as_u16(),
        body: String::from_utf8_lossy(&bytes).into_owned(),
    })
}
