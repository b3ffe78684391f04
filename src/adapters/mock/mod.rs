//! Mock implementations for testing.
//!
//! - [`MockHttpClient`] - HTTP client with configurable, queueable responses
//!
//! For credential storage in tests use the real ephemeral backend,
//! [`crate::adapters::InMemoryCredentials`].

pub mod http;

pub use http::{MockHttpClient, MockResponse, RecordedRequest};
