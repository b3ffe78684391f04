//! In-memory credentials provider.
//!
//! The ephemeral session backend, used for headless hosts where nothing
//! should outlive the process, and as a test double.

use async_trait::async_trait;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::auth::credentials::Credentials;
use crate::traits::{CredentialsError, CredentialsProvider};

/// In-memory credentials provider.
///
/// Clones share the same storage.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCredentials {
    credentials: Arc<Mutex<Option<Credentials>>>,
    save_should_fail: Arc<Mutex<bool>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl InMemoryCredentials {
    /// Create an empty provider.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a provider with initial credentials.
    pub fn with_credentials(creds: Credentials) -> Self {
        Self {
            credentials: Arc::new(Mutex::new(Some(creds))),
            save_should_fail: Arc::new(Mutex::new(false)),
        }
    }

    /// Make subsequent saves fail (failure injection for tests).
    pub fn set_save_should_fail(&self, should_fail: bool) {
        *lock(&self.save_should_fail) = should_fail;
    }

    /// Current credentials, read synchronously.
    pub fn get_credentials(&self) -> Option<Credentials> {
        lock(&self.credentials).clone()
    }

    /// Overwrite credentials synchronously.
    pub fn set_credentials(&self, creds: Option<Credentials>) {
        *lock(&self.credentials) = creds;
    }
}

#[async_trait]
impl CredentialsProvider for InMemoryCredentials {
    async fn load(&self) -> Result<Option<Credentials>, CredentialsError> {
        Ok(lock(&self.credentials).clone())
    }

    async fn save(&self, creds: &Credentials) -> Result<(), CredentialsError> {
        if *lock(&self.save_should_fail) {
            return Err(CredentialsError::SaveFailed("Injected save failure".to_string()));
        }

        *lock(&self.credentials) = Some(creds.clone());
        Ok(())
    }

    async fn clear(&self) -> Result<(), CredentialsError> {
        *lock(&self.credentials) = None;
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_load_empty() {
        let provider = InMemoryCredentials::new();
        assert!(provider.load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_save_and_load() {
        let provider = InMemoryCredentials::new();
        let creds = Credentials {
            access_token: Some("test-token".to_string()),
            refresh_token: Some("test-refresh".to_string()),
            expires_at: Some(9999999999),
        };

        provider.save(&creds).await.unwrap();
        assert_eq!(provider.load().await.unwrap(), Some(creds));
    }

    #[tokio::test]
    async fn test_clear() {
        let provider = InMemoryCredentials::with_credentials(Credentials::issued("a", "r", 60));
        assert!(provider.load().await.unwrap().is_some());

        provider.clear().await.unwrap();
        assert!(provider.load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_save_failure_keeps_previous() {
        let provider = InMemoryCredentials::with_credentials(Credentials::issued("old", "r", 60));
        provider.set_save_should_fail(true);

        let result = provider.save(&Credentials::issued("new", "r", 60)).await;
        assert!(matches!(result, Err(CredentialsError::SaveFailed(_))));
        assert_eq!(
            provider.get_credentials().unwrap().access_token.as_deref(),
            Some("old")
        );
    }

    #[test]
    fn test_clone_shares_storage() {
        let provider = InMemoryCredentials::new();
        let cloned = provider.clone();

        provider.set_credentials(Some(Credentials::issued("shared", "r", 60)));
        assert_eq!(
            cloned.get_credentials().unwrap().access_token.as_deref(),
            Some("shared")
        );

        provider.set_credentials(None);
        assert!(cloned.get_credentials().is_none());
    }

    #[tokio::test]
    async fn test_instances_are_isolated() {
        let provider1 = InMemoryCredentials::new();
        let provider2 = InMemoryCredentials::new();

        provider1
            .save(&Credentials::issued("isolated", "r", 60))
            .await
            .unwrap();
        assert!(provider2.load().await.unwrap().is_none());
    }
}
