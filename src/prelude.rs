//! Prelude module for convenient imports.
//!
//! ```ignore
//! use appforge::prelude::*;
//! ```

// Session and configuration
pub use crate::auth::{Credentials, RequestOptions, SessionManager, SessionState};
pub use crate::config::{CredentialBackend, SdkConfig};

// API clients
pub use crate::api::{CloudApi, ProjectApi, RepositorySource, SigningKeyApi};

// Project synchronization
pub use crate::project::{PendingWrite, PollOptions, Project, ProjectSnapshot};

// Model types
pub use crate::models::{
    Compilation, CompilationStatus, Origin, Platform, PlatformVersions, SigningKey, Template,
};

// Errors
pub use crate::error::{AuthError, SdkError, SdkResult};

// Seams
pub use crate::traits::{ConfigDocument, CredentialsProvider, DocumentField, HttpClient};
