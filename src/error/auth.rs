//! Authentication-related error types.

use thiserror::Error;

/// Session and token errors.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum AuthError {
    /// No session has been set up, or it was closed.
    #[error("Not authenticated: call setup_access first")]
    NotAuthenticated,

    /// The stored credentials carry no refresh token.
    #[error("No refresh token available")]
    MissingRefreshToken,

    /// The authentication endpoint rejected the refresh.
    #[error("Token refresh failed ({status}): {message}")]
    RefreshRejected { status: u16, message: String },

    /// The authentication endpoint answered with something unusable.
    #[error("Invalid token response: {0}")]
    InvalidTokenResponse(String),
}

impl AuthError {
    /// Check if this error can only be resolved by setting up access again.
    pub fn requires_reauth(&self) -> bool {
        matches!(
            self,
            AuthError::NotAuthenticated
                | AuthError::MissingRefreshToken
                | AuthError::RefreshRejected { .. }
        )
    }

    /// Get a short error code for logging.
    pub fn error_code(&self) -> &'static str {
        match self {
            AuthError::NotAuthenticated => "AUTH_NOT_AUTHENTICATED",
            AuthError::MissingRefreshToken => "AUTH_NO_REFRESH_TOKEN",
            AuthError::RefreshRejected { .. } => "AUTH_REFRESH_REJECTED",
            AuthError::InvalidTokenResponse(_) => "AUTH_INVALID_TOKEN_RESPONSE",
        }
    }
}
