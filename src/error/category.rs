//! Failure kinds as seen by a caller of the SDK.

use std::fmt;

/// Which part of an operation failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// No usable session. Raised before any network call, or when the
    /// authentication endpoint refuses the refresh token.
    Unauthenticated,

    /// The remote call failed: transport error, non-2xx status or a body
    /// that could not be decoded.
    RemoteFailure,

    /// A local precondition did not hold, so nothing was sent. Covers a
    /// missing signing key and a config document that cannot be edited.
    Precondition,

    /// The polling deadline passed while compilations were still running.
    Timeout,

    /// Credential storage or a background write task failed on this machine.
    Local,
}

impl ErrorCategory {
    /// Short label for structured log fields.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCategory::Unauthenticated => "unauthenticated",
            ErrorCategory::RemoteFailure => "remote_failure",
            ErrorCategory::Precondition => "precondition",
            ErrorCategory::Timeout => "timeout",
            ErrorCategory::Local => "local",
        }
    }

    /// True when the request reached (or tried to reach) the service.
    pub fn touched_network(&self) -> bool {
        matches!(self, ErrorCategory::RemoteFailure | ErrorCategory::Timeout)
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels() {
        assert_eq!(ErrorCategory::RemoteFailure.to_string(), "remote_failure");
        assert_eq!(ErrorCategory::Unauthenticated.as_str(), "unauthenticated");
    }

    #[test]
    fn test_touched_network() {
        assert!(ErrorCategory::RemoteFailure.touched_network());
        assert!(ErrorCategory::Timeout.touched_network());
        assert!(!ErrorCategory::Unauthenticated.touched_network());
        assert!(!ErrorCategory::Precondition.touched_network());
    }
}
