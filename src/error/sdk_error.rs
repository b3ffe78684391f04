//! Unified error type for the SDK.

use std::time::Duration;

use thiserror::Error;

use super::auth::AuthError;
use super::category::ErrorCategory;
use crate::models::Platform;
use crate::traits::{ConfigDocumentError, CredentialsError, HttpError, Method};

/// Every fallible SDK operation returns this error.
#[derive(Debug, Error)]
pub enum SdkError {
    /// Session/token problems.
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// The request never produced an HTTP response.
    #[error("Transport error: {0}")]
    Transport(#[from] HttpError),

    /// The API answered with a non-2xx status.
    #[error("{method} {url} failed ({status}): {message}")]
    Api {
        method: Method,
        url: String,
        status: u16,
        message: String,
    },

    /// A response body did not match the expected shape.
    #[error("Invalid response body: {0}")]
    Decode(#[from] serde_json::Error),

    /// The credential store failed.
    #[error(transparent)]
    Credentials(#[from] CredentialsError),

    /// `remove_signing_key` was called for a platform without a key.
    #[error("No signing key assigned for platform {0}")]
    NoSigningKey(Platform),

    /// The configuration document could not be parsed or edited.
    #[error(transparent)]
    ConfigDocument(#[from] ConfigDocumentError),

    /// Compilations were still in progress when the polling deadline passed.
    #[error("Compilation still in progress after {waited:?} for {platforms:?}")]
    Timeout {
        waited: Duration,
        platforms: Vec<Platform>,
    },

    /// A background write task panicked or was aborted.
    #[error("Background task failed: {0}")]
    Task(String),
}

impl SdkError {
    /// Get the category of this error.
    pub fn category(&self) -> ErrorCategory {
        match self {
            SdkError::Auth(err) if err.requires_reauth() => ErrorCategory::Unauthenticated,
            SdkError::Auth(_) => ErrorCategory::RemoteFailure,
            SdkError::Api { status: 401, .. } => ErrorCategory::Unauthenticated,
            SdkError::Transport(_) | SdkError::Api { .. } | SdkError::Decode(_) => {
                ErrorCategory::RemoteFailure
            }
            SdkError::NoSigningKey(_) | SdkError::ConfigDocument(_) => ErrorCategory::Precondition,
            SdkError::Timeout { .. } => ErrorCategory::Timeout,
            SdkError::Credentials(_) | SdkError::Task(_) => ErrorCategory::Local,
        }
    }

    /// Check if repeating the same call may succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            SdkError::Transport(_) | SdkError::Timeout { .. } => true,
            SdkError::Api { status, .. } => matches!(*status, 408 | 429 | 500..=599),
            _ => false,
        }
    }

    /// Check if the caller must set up access again before retrying.
    pub fn requires_reauth(&self) -> bool {
        match self {
            SdkError::Auth(err) => err.requires_reauth(),
            SdkError::Api { status: 401, .. } => true,
            _ => false,
        }
    }

    /// HTTP status for API errors.
    pub fn status(&self) -> Option<u16> {
        match self {
            SdkError::Api { status, .. } => Some(*status),
            SdkError::Auth(AuthError::RefreshRejected { status, .. }) => Some(*status),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn api_error(status: u16) -> SdkError {
        SdkError::Api {
            method: Method::Get,
            url: "https://api.test/projects/p1".to_string(),
            status,
            message: "boom".to_string(),
        }
    }

    #[test]
    fn test_api_error_display() {
        assert_eq!(
            api_error(404).to_string(),
            "GET https://api.test/projects/p1 failed (404): boom"
        );
    }

    #[test]
    fn test_categories() {
        assert_eq!(api_error(401).category(), ErrorCategory::Unauthenticated);
        assert_eq!(api_error(404).category(), ErrorCategory::RemoteFailure);
        assert_eq!(api_error(503).category(), ErrorCategory::RemoteFailure);
        assert_eq!(
            SdkError::from(HttpError::Timeout("30s".to_string())).category(),
            ErrorCategory::RemoteFailure
        );
        assert_eq!(
            SdkError::NoSigningKey(Platform::Ios).category(),
            ErrorCategory::Precondition
        );
        assert_eq!(
            SdkError::from(AuthError::NotAuthenticated).category(),
            ErrorCategory::Unauthenticated
        );
        assert_eq!(
            SdkError::from(AuthError::InvalidTokenResponse("empty".to_string())).category(),
            ErrorCategory::RemoteFailure
        );
        assert_eq!(
            SdkError::Timeout {
                waited: Duration::from_secs(1),
                platforms: vec![Platform::Android],
            }
            .category(),
            ErrorCategory::Timeout
        );
        assert_eq!(SdkError::Task("aborted".to_string()).category(), ErrorCategory::Local);
    }

    #[test]
    fn test_retry_and_reauth() {
        assert!(api_error(502).is_retryable());
        assert!(api_error(429).is_retryable());
        assert!(!api_error(400).is_retryable());
        assert!(!SdkError::from(AuthError::NotAuthenticated).is_retryable());
        assert!(api_error(401).requires_reauth());
        assert!(!api_error(403).requires_reauth());
        assert!(SdkError::from(AuthError::MissingRefreshToken).requires_reauth());
    }

    #[test]
    fn test_status() {
        assert_eq!(api_error(500).status(), Some(500));
        assert_eq!(SdkError::Task("x".to_string()).status(), None);
    }

    #[test]
    fn test_no_signing_key_display() {
        assert_eq!(
            SdkError::NoSigningKey(Platform::Android).to_string(),
            "No signing key assigned for platform android"
        );
    }
}
