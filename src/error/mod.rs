//! Error handling for the SDK.
//!
//! Every public async operation returns [`SdkResult`]. Failures are never
//! logged-and-swallowed: they surface to the direct caller.
//!
//! | Category | Typical source | Network touched |
//! |----------|----------------|-----------------|
//! | Unauthenticated | no session, refresh rejected, 401 | No |
//! | RemoteFailure | transport error, non-2xx, undecodable body | Yes |
//! | Precondition | missing signing key, bad config document | No |
//! | Timeout | polling deadline | Yes |
//! | Local | credential file I/O, background task | No |

mod auth;
mod category;
mod sdk_error;

pub use auth::AuthError;
pub use category::ErrorCategory;
pub use sdk_error::SdkError;

/// Type alias for Results using [`SdkError`].
pub type SdkResult<T> = Result<T, SdkError>;
