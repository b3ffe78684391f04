//! Concrete implementations of trait abstractions.
//!
//! # Adapters
//!
//! - [`ReqwestHttpClient`] - HTTP transport using reqwest
//! - [`FileCredentialsProvider`] - Persistent credential store
//! - [`InMemoryCredentials`] - Ephemeral credential store
//!
//! # Mock Implementations
//!
//! The [`mock`] submodule provides test doubles:
//! - [`mock::MockHttpClient`] - Configurable HTTP responses with request recording

pub mod file_credentials;
pub mod memory_credentials;
pub mod mock;
pub mod reqwest_http;

pub use file_credentials::FileCredentialsProvider;
pub use memory_credentials::InMemoryCredentials;
pub use mock::{MockHttpClient, MockResponse};
pub use reqwest_http::ReqwestHttpClient;
