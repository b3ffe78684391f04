//! REST clients for the build service.
//!
//! Every call goes through [`SessionManager::authorized_request`], so an
//! expired token is refreshed before the request is sent.
//!
//! [`SessionManager::authorized_request`]: crate::auth::SessionManager::authorized_request

mod cloud;
pub mod endpoints;
mod projects;
mod signing_keys;

pub use cloud::CloudApi;
pub use projects::{ProjectApi, RepositorySource};
pub use signing_keys::SigningKeyApi;
