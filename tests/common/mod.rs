//! Common test utilities for integration tests.
//!
//! Sessions here talk to a `wiremock` server through the real reqwest
//! transport, with an ephemeral credential store.
//!
//! # Example
//!
//! ```ignore
//! let server = MockServer::start().await;
//! let session = active_session(&server).await;
//! let api = ProjectApi::new(session);
//! ```

#![allow(dead_code)]

pub mod mocks;

pub use mocks::*;

use std::sync::Arc;

use appforge::auth::{Credentials, SessionManager};
use appforge::config::{CredentialBackend, SdkConfig};
use wiremock::MockServer;

pub const ACCESS_TOKEN: &str = "test-access-token-12345";
pub const REFRESH_TOKEN: &str = "test-refresh-token-67890";
pub const REFRESHED_ACCESS_TOKEN: &str = "refreshed-access-token";
pub const REFRESHED_REFRESH_TOKEN: &str = "refreshed-refresh-token";

/// Credentials that won't expire during test execution.
pub fn test_credentials() -> Credentials {
    Credentials {
        access_token: Some(ACCESS_TOKEN.to_string()),
        refresh_token: Some(REFRESH_TOKEN.to_string()),
        expires_at: Some(i64::MAX),
    }
}

/// Credentials whose access token is already stale.
pub fn expired_credentials() -> Credentials {
    Credentials {
        access_token: Some("expired-access-token".to_string()),
        refresh_token: Some(REFRESH_TOKEN.to_string()),
        expires_at: Some(0),
    }
}

/// Config pointing at the mock server.
pub fn test_config(server: &MockServer) -> SdkConfig {
    SdkConfig::default()
        .with_api_url(server.uri())
        .with_credential_backend(CredentialBackend::Ephemeral)
}

/// Session with nothing set up yet.
pub fn new_session(config: SdkConfig) -> Arc<SessionManager> {
    Arc::new(SessionManager::with_reqwest(config).expect("Failed to build reqwest client"))
}

/// Session holding a token valid for an hour.
pub async fn active_session(server: &MockServer) -> Arc<SessionManager> {
    let session = new_session(test_config(server));
    session
        .setup_access(ACCESS_TOKEN, REFRESH_TOKEN, Some(3600), None)
        .await
        .expect("Failed to set up access");
    session
}

/// Session whose access token is already expired.
pub async fn expired_session(server: &MockServer) -> Arc<SessionManager> {
    let session = new_session(test_config(server));
    session
        .setup_access("expired-access-token", REFRESH_TOKEN, Some(0), None)
        .await
        .expect("Failed to set up access");
    session
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_test_credentials() {
        let creds = test_credentials();
        assert!(creds.is_valid());
    }

    #[test]
    fn test_expired_credentials() {
        let creds = expired_credentials();
        assert!(creds.has_token());
        assert!(creds.is_expired());
    }
}
