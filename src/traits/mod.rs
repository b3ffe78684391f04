//! Trait abstractions for dependency injection and testability.
//!
//! # Traits
//!
//! - [`HttpClient`] - HTTP transport (any method, raw body)
//! - [`CredentialsProvider`] - Token storage backends
//! - [`ConfigDocument`] / [`ConfigDocumentParser`] - Project configuration editing

pub mod config_document;
pub mod credentials;
pub mod http;

pub use config_document::{ConfigDocument, ConfigDocumentError, ConfigDocumentParser, DocumentField};
pub use credentials::{CredentialsError, CredentialsProvider};
pub use http::{Headers, HttpClient, HttpError, Method, Response};
