//! Authentication module.
//!
//! This module provides:
//! - Credentials value type and file storage
//! - Token endpoint payloads and JWT expiry decoding
//! - The session manager every remote call goes through

pub mod credentials;
pub mod session;
pub mod token;

pub use credentials::{Credentials, CredentialsManager};
pub use session::{RequestOptions, SessionManager, SessionState};
pub use token::{get_jwt_expires_in, TokenResponse};
