//! Credentials value type and file-backed storage.
//!
//! The persistent backend keeps tokens in `~/.appforge/.credentials.json`
//! so a session survives process restarts.

use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::traits::CredentialsError;

/// The credentials directory name.
const CREDENTIALS_DIR: &str = ".appforge";

/// The credentials file name.
const CREDENTIALS_FILE: &str = ".credentials.json";

/// OAuth token set for the build service API.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Credentials {
    /// OAuth access token for API authentication.
    pub access_token: Option<String>,
    /// OAuth refresh token for obtaining new access tokens.
    pub refresh_token: Option<String>,
    /// Token expiration time as Unix timestamp (seconds since epoch).
    pub expires_at: Option<i64>,
}

impl Credentials {
    /// Create new empty credentials.
    pub fn new() -> Self {
        Self::default()
    }

    /// Credentials for a freshly issued token pair valid for `expires_in` seconds.
    pub fn issued(access_token: &str, refresh_token: &str, expires_in: u64) -> Self {
        let expires_in = i64::try_from(expires_in).unwrap_or(i64::MAX);
        Self {
            access_token: Some(access_token.to_string()),
            refresh_token: Some(refresh_token.to_string()),
            expires_at: Some(chrono::Utc::now().timestamp().saturating_add(expires_in)),
        }
    }

    /// Check if the credentials carry a non-empty access token.
    pub fn has_token(&self) -> bool {
        self.access_token.as_deref().is_some_and(|t| !t.is_empty())
    }

    /// Check if the token is expired.
    ///
    /// Returns `true` if the token is expired or if there's no expiration time set.
    pub fn is_expired(&self) -> bool {
        match self.expires_at {
            Some(expires_at) => chrono::Utc::now().timestamp() >= expires_at,
            None => true,
        }
    }

    /// Check if the credentials are usable as-is (has token and not expired).
    pub fn is_valid(&self) -> bool {
        self.has_token() && !self.is_expired()
    }

    /// True when nothing at all is stored.
    pub fn is_empty(&self) -> bool {
        self.access_token.is_none() && self.refresh_token.is_none() && self.expires_at.is_none()
    }
}

/// Reads and writes the credentials file.
#[derive(Debug, Clone)]
pub struct CredentialsManager {
    /// Path to the credentials file.
    credentials_path: PathBuf,
}

impl CredentialsManager {
    /// Create a manager for the default location under the home directory.
    ///
    /// Returns `None` if the home directory cannot be determined.
    pub fn new() -> Option<Self> {
        let home = dirs::home_dir()?;
        let credentials_path = home.join(CREDENTIALS_DIR).join(CREDENTIALS_FILE);
        Some(Self { credentials_path })
    }

    /// Create a manager for an explicit file path.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            credentials_path: path.into(),
        }
    }

    /// Default credentials file path, if a home directory exists.
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(CREDENTIALS_DIR).join(CREDENTIALS_FILE))
    }

    /// Get the path to the credentials file.
    pub fn credentials_path(&self) -> &Path {
        &self.credentials_path
    }

    /// Load credentials from the credentials file.
    ///
    /// A missing or unreadable file yields empty credentials.
    pub fn load(&self) -> Credentials {
        if !self.credentials_path.exists() {
            return Credentials::default();
        }

        let file = match File::open(&self.credentials_path) {
            Ok(f) => f,
            Err(e) => {
                warn!(path = %self.credentials_path.display(), "Cannot open credentials file: {}", e);
                return Credentials::default();
            }
        };

        match serde_json::from_reader(BufReader::new(file)) {
            Ok(creds) => creds,
            Err(e) => {
                warn!(path = %self.credentials_path.display(), "Ignoring corrupt credentials file: {}", e);
                Credentials::default()
            }
        }
    }

    /// Save credentials, creating the parent directory if needed.
    pub fn save(&self, credentials: &Credentials) -> Result<(), CredentialsError> {
        if let Some(parent) = self.credentials_path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent)
                    .map_err(|e| CredentialsError::SaveFailed(e.to_string()))?;
            }
        }

        let file = File::create(&self.credentials_path)
            .map_err(|e| CredentialsError::SaveFailed(e.to_string()))?;
        restrict_permissions(&file);

        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, credentials)
            .map_err(|e| CredentialsError::Serialization(e.to_string()))?;
        writer
            .flush()
            .map_err(|e| CredentialsError::SaveFailed(e.to_string()))
    }

    /// Remove the credentials file. A missing file is not an error.
    pub fn clear(&self) -> Result<(), CredentialsError> {
        if !self.credentials_path.exists() {
            return Ok(());
        }

        fs::remove_file(&self.credentials_path)
            .map_err(|e| CredentialsError::ClearFailed(e.to_string()))
    }
}

#[cfg(unix)]
fn restrict_permissions(file: &File) {
    use std::os::unix::fs::PermissionsExt;
    if let Err(e) = file.set_permissions(fs::Permissions::from_mode(0o600)) {
        warn!("Could not restrict credentials file permissions: {}", e);
    }
}

#[cfg(not(unix))]
fn restrict_permissions(_file: &File) {}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_manager(temp_dir: &TempDir) -> CredentialsManager {
        CredentialsManager::with_path(temp_dir.path().join(CREDENTIALS_DIR).join(CREDENTIALS_FILE))
    }

    #[test]
    fn test_credentials_default() {
        let creds = Credentials::default();
        assert!(creds.access_token.is_none());
        assert!(creds.refresh_token.is_none());
        assert!(creds.expires_at.is_none());
        assert!(creds.is_empty());
    }

    #[test]
    fn test_credentials_has_token() {
        let mut creds = Credentials::default();
        assert!(!creds.has_token());

        creds.access_token = Some(String::new());
        assert!(!creds.has_token());

        creds.access_token = Some("test-token".to_string());
        assert!(creds.has_token());
    }

    #[test]
    fn test_credentials_is_expired_no_expiration() {
        assert!(Credentials::default().is_expired());
    }

    #[test]
    fn test_credentials_is_expired_past() {
        let creds = Credentials {
            expires_at: Some(0),
            ..Default::default()
        };
        assert!(creds.is_expired());
    }

    #[test]
    fn test_issued_credentials() {
        let creds = Credentials::issued("access", "refresh", 3600);
        assert!(creds.is_valid());
        assert_eq!(creds.refresh_token.as_deref(), Some("refresh"));

        let now = chrono::Utc::now().timestamp();
        let expires_at = creds.expires_at.unwrap();
        assert!(expires_at >= now + 3590 && expires_at <= now + 3600);
    }

    #[test]
    fn test_issued_with_zero_lifetime_is_expired() {
        let creds = Credentials::issued("access", "refresh", 0);
        assert!(creds.has_token());
        assert!(creds.is_expired());
    }

    #[test]
    fn test_manager_load_nonexistent() {
        let temp_dir = TempDir::new().unwrap();
        let manager = create_test_manager(&temp_dir);
        assert_eq!(manager.load(), Credentials::default());
    }

    #[test]
    fn test_manager_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let manager = create_test_manager(&temp_dir);

        let creds = Credentials {
            access_token: Some("test-access-token".to_string()),
            refresh_token: Some("test-refresh-token".to_string()),
            expires_at: Some(1234567890),
        };

        manager.save(&creds).unwrap();
        assert!(manager.credentials_path().parent().unwrap().exists());
        assert_eq!(manager.load(), creds);
    }

    #[test]
    fn test_manager_clear() {
        let temp_dir = TempDir::new().unwrap();
        let manager = create_test_manager(&temp_dir);

        manager
            .save(&Credentials {
                access_token: Some("test-token".to_string()),
                ..Default::default()
            })
            .unwrap();
        assert!(manager.credentials_path().exists());

        manager.clear().unwrap();
        assert!(!manager.credentials_path().exists());
        assert_eq!(manager.load(), Credentials::default());

        // Clearing twice is fine
        manager.clear().unwrap();
    }

    #[test]
    fn test_manager_load_invalid_json() {
        let temp_dir = TempDir::new().unwrap();
        let manager = create_test_manager(&temp_dir);

        fs::create_dir_all(manager.credentials_path().parent().unwrap()).unwrap();
        fs::write(manager.credentials_path(), "not valid json").unwrap();

        assert_eq!(manager.load(), Credentials::default());
    }

    #[cfg(unix)]
    #[test]
    fn test_manager_file_is_private() {
        use std::os::unix::fs::PermissionsExt;

        let temp_dir = TempDir::new().unwrap();
        let manager = create_test_manager(&temp_dir);
        manager.save(&Credentials::issued("a", "r", 60)).unwrap();

        let mode = fs::metadata(manager.credentials_path())
            .unwrap()
            .permissions()
            .mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[test]
    fn test_credentials_ignores_unknown_fields() {
        let json = r#"{
            "access_token": "old-token",
            "refresh_token": "old-refresh",
            "expires_at": 9999999999,
            "user_id": "old-user"
        }"#;

        let creds: Credentials = serde_json::from_str(json).unwrap();
        assert_eq!(creds.access_token, Some("old-token".to_string()));
        assert_eq!(creds.expires_at, Some(9999999999));
    }
}
