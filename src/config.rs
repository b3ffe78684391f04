//! SDK configuration.
//!
//! Use the builder pattern to customize behavior:
//!
//! ```ignore
//! use appforge::config::{CredentialBackend, SdkConfig};
//!
//! let config = SdkConfig::default()
//!     .with_api_url("https://api.example.test/v1")
//!     .with_credential_backend(CredentialBackend::Ephemeral);
//! ```

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crate::adapters::{FileCredentialsProvider, InMemoryCredentials};
use crate::project::PollOptions;
use crate::traits::{CredentialsError, CredentialsProvider};

pub const DEFAULT_API_URL: &str = "https://api.appforge.io/v1";
pub const DEFAULT_TOKEN_LIFETIME_SECS: u64 = 3600;
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Where session credentials live.
#[derive(Clone)]
pub enum CredentialBackend {
    /// Process memory only; every `setup_access` starts from an empty store.
    Ephemeral,
    /// JSON file, `~/.appforge/.credentials.json` unless a path is given.
    Persistent { path: Option<PathBuf> },
    /// A caller-supplied store, shared across sessions.
    Custom(Arc<dyn CredentialsProvider>),
}

impl fmt::Debug for CredentialBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CredentialBackend::Ephemeral => f.write_str("Ephemeral"),
            CredentialBackend::Persistent { path } => f
                .debug_struct("Persistent")
                .field("path", path)
                .finish(),
            CredentialBackend::Custom(store) => {
                f.debug_tuple("Custom").field(&store.backend_name()).finish()
            }
        }
    }
}

impl Default for CredentialBackend {
    fn default() -> Self {
        CredentialBackend::Ephemeral
    }
}

impl CredentialBackend {
    /// Persistent when the host has a home directory, ephemeral otherwise.
    pub fn detect() -> Self {
        if dirs::home_dir().is_some() {
            CredentialBackend::Persistent { path: None }
        } else {
            CredentialBackend::Ephemeral
        }
    }

    /// Parse `memory`, `file`, or an explicit file path.
    pub fn parse(value: &str) -> Self {
        match value.trim() {
            "" | "memory" | "ephemeral" => CredentialBackend::Ephemeral,
            "file" | "persistent" => CredentialBackend::Persistent { path: None },
            path => CredentialBackend::Persistent {
                path: Some(PathBuf::from(path)),
            },
        }
    }

    /// Build a store for a new session.
    pub fn create_store(&self) -> Result<Arc<dyn CredentialsProvider>, CredentialsError> {
        match self {
            CredentialBackend::Ephemeral => Ok(Arc::new(InMemoryCredentials::new())),
            CredentialBackend::Persistent { path: Some(path) } => {
                Ok(Arc::new(FileCredentialsProvider::with_path(path.clone())))
            }
            CredentialBackend::Persistent { path: None } => {
                Ok(Arc::new(FileCredentialsProvider::new()?))
            }
            CredentialBackend::Custom(store) => Ok(Arc::clone(store)),
        }
    }
}

/// Configuration shared by the session manager and API clients.
#[derive(Debug, Clone)]
pub struct SdkConfig {
    /// Base URL every endpoint path is joined to.
    pub api_url: String,
    /// Token endpoint override (defaults to `{api_url}/oauth/token`).
    pub auth_url: Option<String>,
    /// OAuth client id sent with refresh requests.
    pub client_id: Option<String>,
    pub request_timeout: Duration,
    /// Lifetime assumed when neither the caller nor the token says otherwise.
    pub default_token_lifetime: u64,
    pub credential_backend: CredentialBackend,
    pub poll: PollOptions,
}

impl Default for SdkConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            auth_url: None,
            client_id: None,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            default_token_lifetime: DEFAULT_TOKEN_LIFETIME_SECS,
            credential_backend: CredentialBackend::default(),
            poll: PollOptions::default(),
        }
    }
}

impl SdkConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the API base URL. A trailing slash is dropped.
    pub fn with_api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Set the token endpoint URL.
    pub fn with_auth_url(mut self, url: impl Into<String>) -> Self {
        self.auth_url = Some(url.into());
        self
    }

    pub fn with_client_id(mut self, client_id: impl Into<String>) -> Self {
        self.client_id = Some(client_id.into());
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn with_default_token_lifetime(mut self, secs: u64) -> Self {
        self.default_token_lifetime = secs;
        self
    }

    pub fn with_credential_backend(mut self, backend: CredentialBackend) -> Self {
        self.credential_backend = backend;
        self
    }

    pub fn with_poll_options(mut self, poll: PollOptions) -> Self {
        self.poll = poll;
        self
    }

    /// Token endpoint for a session whose base URL is `base_url`.
    pub fn token_url(&self, base_url: &str) -> String {
        match &self.auth_url {
            Some(url) => url.clone(),
            None => format!("{}/oauth/token", base_url.trim_end_matches('/')),
        }
    }

    /// Create config from `APPFORGE_*` environment variables.
    ///
    /// Unset or unparseable variables keep their defaults.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(url) = std::env::var("APPFORGE_API_URL") {
            config = config.with_api_url(url);
        }
        if let Ok(url) = std::env::var("APPFORGE_AUTH_URL") {
            config = config.with_auth_url(url);
        }
        if let Ok(client_id) = std::env::var("APPFORGE_CLIENT_ID") {
            config = config.with_client_id(client_id);
        }
        if let Ok(backend) = std::env::var("APPFORGE_CREDENTIALS") {
            config = config.with_credential_backend(CredentialBackend::parse(&backend));
        }
        if let Some(secs) = std::env::var("APPFORGE_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
        {
            config = config.with_request_timeout(Duration::from_secs(secs));
        }

        config
    }
}
