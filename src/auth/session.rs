//! Session lifecycle and authorized requests.
//!
//! A [`SessionManager`] moves through `Uninitialized -> Active -> Closed`.
//! `setup_access` may be called again from any state and replaces the
//! session wholesale. Every authorized call checks the stored expiry and
//! refreshes first when the access token is stale (refresh-then-send).
//!
//! Refreshes are not serialized: two requests that both observe an expired
//! token will both hit the token endpoint, and the last successful
//! response is the one that stays stored.

use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use bytes::Bytes;
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

use super::credentials::Credentials;
use super::token::{get_jwt_expires_in, RefreshRequest, TokenResponse};
use crate::adapters::ReqwestHttpClient;
use crate::config::SdkConfig;
use crate::error::{AuthError, SdkError, SdkResult};
use crate::traits::{CredentialsProvider, Headers, HttpClient, Method, Response};

/// Observable lifecycle state of a [`SessionManager`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Uninitialized,
    Active,
    Closed,
}

#[derive(Clone)]
struct ActiveSession {
    store: Arc<dyn CredentialsProvider>,
    base_url: String,
}

enum State {
    Uninitialized,
    Active(ActiveSession),
    Closed,
}

/// A request relative to the session's base URL.
#[derive(Debug, Clone)]
pub struct RequestOptions {
    pub method: Method,
    /// Path joined to the base URL, or an absolute `http(s)://` URL.
    pub path: String,
    pub headers: Headers,
    pub body: Option<Bytes>,
}

impl RequestOptions {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            headers: Headers::new(),
            body: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::Get, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::Post, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::Put, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::Delete, path)
    }

    /// Attach a JSON body.
    pub fn with_json(self, value: &serde_json::Value) -> Self {
        self.with_body(value.to_string(), "application/json")
    }

    /// Attach a raw body with its content type.
    pub fn with_body(mut self, body: impl Into<Bytes>, content_type: &str) -> Self {
        self.headers
            .insert("Content-Type".to_string(), content_type.to_string());
        self.body = Some(body.into());
        self
    }

    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.insert(name.to_string(), value.to_string());
        self
    }
}

/// Owns the credential store and performs authenticated calls.
pub struct SessionManager {
    http: Arc<dyn HttpClient>,
    config: SdkConfig,
    state: RwLock<State>,
}

impl SessionManager {
    pub fn new(http: Arc<dyn HttpClient>, config: SdkConfig) -> Self {
        Self {
            http,
            config,
            state: RwLock::new(State::Uninitialized),
        }
    }

    /// Session backed by the reqwest transport with the configured timeout.
    pub fn with_reqwest(config: SdkConfig) -> SdkResult<Self> {
        let http = ReqwestHttpClient::with_timeout(config.request_timeout)?;
        Ok(Self::new(Arc::new(http), config))
    }

    pub fn config(&self) -> &SdkConfig {
        &self.config
    }

    fn read(&self) -> RwLockReadGuard<'_, State> {
        self.state.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, State> {
        self.state
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn active(&self) -> Result<ActiveSession, AuthError> {
        match &*self.read() {
            State::Active(session) => Ok(session.clone()),
            State::Uninitialized | State::Closed => Err(AuthError::NotAuthenticated),
        }
    }

    pub fn state(&self) -> SessionState {
        match &*self.read() {
            State::Uninitialized => SessionState::Uninitialized,
            State::Active(_) => SessionState::Active,
            State::Closed => SessionState::Closed,
        }
    }

    /// Base URL of the active session.
    pub fn base_url(&self) -> Option<String> {
        self.active().ok().map(|session| session.base_url)
    }

    /// Start a session with a fresh token pair.
    ///
    /// `expires_in` falls back to the JWT `exp` claim, then to the configured
    /// default lifetime. `base_url` overrides the configured API URL for this
    /// session only.
    pub async fn setup_access(
        &self,
        access_token: &str,
        refresh_token: &str,
        expires_in: Option<u64>,
        base_url: Option<&str>,
    ) -> SdkResult<()> {
        let store = self.config.credential_backend.create_store()?;
        let lifetime = expires_in
            .or_else(|| get_jwt_expires_in(access_token))
            .unwrap_or(self.config.default_token_lifetime);
        let credentials = Credentials::issued(access_token, refresh_token, lifetime);
        store.save(&credentials).await?;

        let base_url = base_url
            .unwrap_or(&self.config.api_url)
            .trim_end_matches('/')
            .to_string();
        info!(
            backend = store.backend_name(),
            base_url = %base_url,
            expires_in = lifetime,
            "Session established"
        );
        *self.write() = State::Active(ActiveSession { store, base_url });
        Ok(())
    }

    /// Re-activate a session from credentials already in the configured store.
    ///
    /// Returns `false` (and leaves the state untouched) when the store holds
    /// no access token.
    pub async fn resume_access(&self, base_url: Option<&str>) -> SdkResult<bool> {
        let store = self.config.credential_backend.create_store()?;
        match store.load().await? {
            Some(credentials) if credentials.has_token() => {
                let base_url = base_url
                    .unwrap_or(&self.config.api_url)
                    .trim_end_matches('/')
                    .to_string();
                info!(backend = store.backend_name(), "Session resumed from stored credentials");
                *self.write() = State::Active(ActiveSession { store, base_url });
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    /// True iff a store exists and holds a non-empty access token.
    ///
    /// Expiry is not checked; a stale token is refreshed on the next call.
    pub async fn is_authenticated(&self) -> bool {
        let Ok(session) = self.active() else {
            return false;
        };
        match session.store.load().await {
            Ok(Some(credentials)) => credentials.has_token(),
            Ok(None) => false,
            Err(e) => {
                warn!("Failed to read credentials: {}", e);
                false
            }
        }
    }

    /// End the session and clear the store.
    ///
    /// Later authorized calls fail with `NotAuthenticated` until the next
    /// `setup_access`.
    pub async fn close_access(&self) -> SdkResult<()> {
        let previous = std::mem::replace(&mut *self.write(), State::Closed);
        if let State::Active(session) = previous {
            session.store.clear().await?;
            info!(backend = session.store.backend_name(), "Session closed");
        }
        Ok(())
    }

    /// Exchange the refresh token for a new token pair.
    ///
    /// Stored credentials are replaced only on success.
    pub async fn refresh_access(&self) -> SdkResult<()> {
        let session = self.active()?;
        let current = session
            .store
            .load()
            .await?
            .ok_or(AuthError::NotAuthenticated)?;
        let refresh_token = current
            .refresh_token
            .as_deref()
            .filter(|t| !t.is_empty())
            .ok_or(AuthError::MissingRefreshToken)?;

        let url = self.config.token_url(&session.base_url);
        let body = serde_json::to_vec(&RefreshRequest::new(
            refresh_token,
            self.config.client_id.as_deref(),
        ))?;
        let mut headers = Headers::new();
        headers.insert("Content-Type".to_string(), "application/json".to_string());

        debug!(url = %url, "Refreshing access token");
        let response = self
            .http
            .send(Method::Post, &url, &headers, Some(Bytes::from(body)))
            .await?;

        if !response.is_success() {
            let message = error_message(&response);
            warn!(status = response.status, "Token refresh rejected");
            return Err(AuthError::RefreshRejected {
                status: response.status,
                message,
            }
            .into());
        }

        let token: TokenResponse = response
            .json()
            .map_err(|e| AuthError::InvalidTokenResponse(e.to_string()))?;
        if token.access_token.is_empty() {
            return Err(AuthError::InvalidTokenResponse("empty access_token".to_string()).into());
        }

        let lifetime = token.lifetime(self.config.default_token_lifetime);
        let refresh_token = token
            .refresh_token
            .as_deref()
            .filter(|t| !t.is_empty())
            .unwrap_or(refresh_token);
        let refreshed = Credentials::issued(&token.access_token, refresh_token, lifetime);
        session.store.save(&refreshed).await?;

        info!(expires_in = lifetime, "Access token refreshed");
        Ok(())
    }

    /// Send a request with `Authorization: Bearer <token>`.
    ///
    /// Fails with `NotAuthenticated` without touching the network when no
    /// session is active. Non-2xx responses become [`SdkError::Api`].
    pub async fn authorized_request(&self, options: RequestOptions) -> SdkResult<Response> {
        let session = self.active()?;
        let mut credentials = session
            .store
            .load()
            .await?
            .filter(Credentials::has_token)
            .ok_or(AuthError::NotAuthenticated)?;

        if credentials.is_expired() {
            debug!("Access token expired, refreshing before request");
            self.refresh_access().await?;
            credentials = session
                .store
                .load()
                .await?
                .filter(Credentials::has_token)
                .ok_or(AuthError::NotAuthenticated)?;
        }

        let url = resolve_url(&session.base_url, &options.path);
        let mut headers = options.headers;
        if let Some(token) = credentials.access_token.as_deref() {
            headers.insert("Authorization".to_string(), format!("Bearer {}", token));
        }

        debug!(method = %options.method, url = %url, "Authorized request");
        let response = self
            .http
            .send(options.method, &url, &headers, options.body)
            .await?;

        if !response.is_success() {
            return Err(SdkError::Api {
                method: options.method,
                url,
                status: response.status,
                message: error_message(&response),
            });
        }
        Ok(response)
    }

    /// Authorized request whose response body is decoded as JSON.
    pub async fn request_json<T: DeserializeOwned>(&self, options: RequestOptions) -> SdkResult<T> {
        let response = self.authorized_request(options).await?;
        Ok(response.json()?)
    }
}

fn resolve_url(base_url: &str, path: &str) -> String {
    if path.starts_with("http://") || path.starts_with("https://") {
        path.to_string()
    } else if path.starts_with('/') {
        format!("{}{}", base_url, path)
    } else {
        format!("{}/{}", base_url, path)
    }
}

/// Human-readable message from an error response body.
fn error_message(response: &Response) -> String {
    if let Ok(value) = response.json::<serde_json::Value>() {
        for key in ["message", "error_description", "error", "detail"] {
            if let Some(message) = value.get(key).and_then(|v| v.as_str()) {
                return message.to_string();
            }
        }
    }
    match response.text() {
        Ok(text) if !text.trim().is_empty() => text.trim().to_string(),
        _ => "Unknown error".to_string(),
    }
}
