//! Local handle on a remote project.
//!
//! A [`Project`] keeps the last fetched [`ProjectSnapshot`] behind an `Arc`
//! that is swapped wholesale whenever the remote answers with a full
//! payload. Readers never see a half-applied refresh. Concurrent mutating
//! calls are not ordered against each other: the last one to finish wins.
//!
//! The configuration document is fetched lazily on first use and cached
//! for the lifetime of the handle.

use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use bytes::Bytes;
use futures::future::try_join_all;
use tracing::{debug, info, warn};

use super::pending::PendingWrite;
use super::snapshot::ProjectSnapshot;
use crate::api::{ProjectApi, RepositorySource};
use crate::config_xml::WidgetDocumentParser;
use crate::error::{SdkError, SdkResult};
use crate::models::{Compilation, Platform, ProjectData, SigningKey};
use crate::traits::{ConfigDocument, ConfigDocumentParser, DocumentField};

struct ProjectInner {
    id: String,
    api: ProjectApi,
    parser: Arc<dyn ConfigDocumentParser>,
    snapshot: RwLock<Arc<ProjectSnapshot>>,
    document: tokio::sync::Mutex<Option<Box<dyn ConfigDocument>>>,
}

/// Cheaply cloneable handle; clones share snapshot and document cache.
#[derive(Clone)]
pub struct Project {
    inner: Arc<ProjectInner>,
}

impl std::fmt::Debug for Project {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Project")
            .field("id", &self.inner.id)
            .field("snapshot", &self.snapshot())
            .finish()
    }
}

impl Project {
    /// Wrap an already fetched payload.
    pub fn new(api: ProjectApi, data: ProjectData) -> Self {
        Self::with_parser(api, data, Arc::new(WidgetDocumentParser))
    }

    /// Like [`Project::new`] with a custom configuration document parser.
    pub fn with_parser(
        api: ProjectApi,
        data: ProjectData,
        parser: Arc<dyn ConfigDocumentParser>,
    ) -> Self {
        let snapshot = ProjectSnapshot::from_data(data);
        Self {
            inner: Arc::new(ProjectInner {
                id: snapshot.id.clone(),
                api,
                parser,
                snapshot: RwLock::new(Arc::new(snapshot)),
                document: tokio::sync::Mutex::new(None),
            }),
        }
    }

    pub async fn fetch(api: &ProjectApi, id: &str) -> SdkResult<Self> {
        let data = api.get(id).await?;
        Ok(Self::new(api.clone(), data))
    }

    pub async fn list(api: &ProjectApi) -> SdkResult<Vec<Self>> {
        let projects = api.list().await?;
        Ok(projects
            .into_iter()
            .map(|data| Self::new(api.clone(), data))
            .collect())
    }

    pub async fn create_from_zip(api: &ProjectApi, zip: Bytes) -> SdkResult<Self> {
        let data = api.create_from_zip(zip).await?;
        info!(project = %data.id, "Project created from zip");
        Ok(Self::new(api.clone(), data))
    }

    pub async fn create_from_url(api: &ProjectApi, url: &str) -> SdkResult<Self> {
        let data = api.create_from_url(url).await?;
        info!(project = %data.id, "Project created from URL");
        Ok(Self::new(api.clone(), data))
    }

    pub async fn create_from_repository(
        api: &ProjectApi,
        repo: &RepositorySource,
    ) -> SdkResult<Self> {
        let data = api.create_from_repository(repo).await?;
        info!(project = %data.id, "Project created from repository");
        Ok(Self::new(api.clone(), data))
    }

    pub fn id(&self) -> &str {
        &self.inner.id
    }

    pub(crate) fn api(&self) -> &ProjectApi {
        &self.inner.api
    }

    fn read(&self) -> RwLockReadGuard<'_, Arc<ProjectSnapshot>> {
        self.inner
            .snapshot
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Arc<ProjectSnapshot>> {
        self.inner
            .snapshot
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// The current snapshot. It never changes after being returned.
    pub fn snapshot(&self) -> Arc<ProjectSnapshot> {
        Arc::clone(&self.read())
    }

    pub fn name(&self) -> String {
        self.read().name.clone()
    }

    pub fn bundle_id(&self) -> String {
        self.read().bundle_id.clone()
    }

    pub fn version(&self) -> String {
        self.read().version.clone()
    }

    pub fn compilation(&self, platform: Platform) -> Option<Compilation> {
        self.read().compilation(platform).cloned()
    }

    pub fn signing_key(&self, platform: Platform) -> Option<SigningKey> {
        self.read().signing_key(platform).cloned()
    }

    pub fn is_compiling(&self) -> bool {
        self.read().is_compiling()
    }

    /// Replace the snapshot wholesale from a full payload.
    fn init(&self, data: ProjectData) -> Arc<ProjectSnapshot> {
        if data.id != self.inner.id {
            warn!(expected = %self.inner.id, got = %data.id, "Payload id does not match project");
        }
        let snapshot = Arc::new(ProjectSnapshot::from_data(data));
        *self.write() = Arc::clone(&snapshot);
        debug!(project = %self.inner.id, compiling = snapshot.is_compiling(), "Snapshot replaced");
        snapshot
    }

    /// Copy-on-write edit of the current snapshot.
    fn update_snapshot(&self, edit: impl FnOnce(&mut ProjectSnapshot)) {
        let mut guard = self.write();
        let mut next = ProjectSnapshot::clone(&guard);
        edit(&mut next);
        *guard = Arc::new(next);
    }

    /// Set the name locally and, in the background, in the cached document.
    ///
    /// Must be called from within a tokio runtime.
    pub fn set_name(&self, name: &str) -> PendingWrite {
        self.update_snapshot(|s| s.name = name.to_string());
        self.schedule_document_write(DocumentField::Name, name)
    }

    /// Set the bundle id locally and, in the background, in the cached document.
    ///
    /// Must be called from within a tokio runtime.
    pub fn set_bundle_id(&self, bundle_id: &str) -> PendingWrite {
        self.update_snapshot(|s| s.bundle_id = bundle_id.to_string());
        self.schedule_document_write(DocumentField::BundleId, bundle_id)
    }

    /// Set the version locally and, in the background, in the cached document.
    ///
    /// Must be called from within a tokio runtime.
    pub fn set_version(&self, version: &str) -> PendingWrite {
        self.update_snapshot(|s| s.version = version.to_string());
        self.schedule_document_write(DocumentField::Version, version)
    }

    fn schedule_document_write(&self, field: DocumentField, value: &str) -> PendingWrite {
        let project = self.clone();
        let value = value.to_string();
        PendingWrite::spawn(async move {
            project
                .with_config_document(|doc| doc.set(field, &value))
                .await??;
            debug!(project = %project.id(), field = %field, "Config document updated");
            Ok::<(), SdkError>(())
        })
    }

    /// Run `f` against the cached configuration document, fetching and
    /// parsing it first if this handle has not done so yet.
    pub async fn with_config_document<F, R>(&self, f: F) -> SdkResult<R>
    where
        F: FnOnce(&mut dyn ConfigDocument) -> R,
    {
        let mut cached = self.inner.document.lock().await;
        if cached.is_none() {
            debug!(project = %self.inner.id, "Fetching config document");
            let text = self.inner.api.get_config(&self.inner.id).await?;
            *cached = Some(self.inner.parser.parse(&text)?);
        }
        match cached.as_mut() {
            Some(doc) => Ok(f(doc.as_mut())),
            None => Err(SdkError::Task("config document cache is empty".to_string())),
        }
    }

    /// Serialized text of the cached configuration document.
    pub async fn config_xml(&self) -> SdkResult<String> {
        self.with_config_document(|doc| doc.serialize()).await
    }

    pub async fn config_field(&self, field: DocumentField) -> SdkResult<Option<String>> {
        self.with_config_document(|doc| doc.get(field)).await
    }

    /// Fetch the remote project and replace the snapshot.
    pub async fn refresh(&self) -> SdkResult<Arc<ProjectSnapshot>> {
        let data = self.inner.api.get(&self.inner.id).await?;
        Ok(self.init(data))
    }

    /// Refresh several projects concurrently. Fails on the first error.
    pub async fn refresh_all(projects: &[Project]) -> SdkResult<Vec<Arc<ProjectSnapshot>>> {
        try_join_all(projects.iter().map(Project::refresh)).await
    }

    pub async fn update_zip(&self, zip: Bytes) -> SdkResult<Arc<ProjectSnapshot>> {
        let data = self.inner.api.update_zip(&self.inner.id, zip).await?;
        Ok(self.init(data))
    }

    pub async fn update_url(&self, url: &str) -> SdkResult<Arc<ProjectSnapshot>> {
        let data = self.inner.api.update_url(&self.inner.id, url).await?;
        Ok(self.init(data))
    }

    pub async fn update_repository(
        &self,
        repo: &RepositorySource,
    ) -> SdkResult<Arc<ProjectSnapshot>> {
        let data = self.inner.api.update_repository(&self.inner.id, repo).await?;
        Ok(self.init(data))
    }

    /// Replace the remote configuration document with `text`.
    ///
    /// `text` is parsed before anything is sent, so a malformed document
    /// never reaches the service. On success the cached document is
    /// replaced by the confirmed text.
    pub async fn update_config_xml(&self, text: &str) -> SdkResult<Arc<ProjectSnapshot>> {
        let document = self.inner.parser.parse(text)?;
        let mut cached = self.inner.document.lock().await;
        let data = self.inner.api.put_config(&self.inner.id, text).await?;
        *cached = Some(document);
        Ok(self.init(data))
    }

    /// Push the cached configuration document, with any local edits.
    pub async fn push_config_document(&self) -> SdkResult<Arc<ProjectSnapshot>> {
        let text = self.config_xml().await?;
        self.update_config_xml(&text).await
    }

    pub async fn icon(&self, platform: Option<Platform>) -> SdkResult<Bytes> {
        self.inner.api.get_icon(&self.inner.id, platform).await
    }

    pub async fn set_icon(
        &self,
        platform: Option<Platform>,
        image: Bytes,
        content_type: &str,
    ) -> SdkResult<()> {
        self.inner
            .api
            .set_icon(&self.inner.id, platform, image, content_type)
            .await
    }

    pub async fn splash(&self, platform: Platform) -> SdkResult<Bytes> {
        self.inner.api.get_splash(&self.inner.id, platform).await
    }

    pub async fn set_splash(
        &self,
        platform: Platform,
        image: Bytes,
        content_type: &str,
    ) -> SdkResult<()> {
        self.inner
            .api
            .set_splash(&self.inner.id, platform, image, content_type)
            .await
    }

    /// Queue a build; no local state changes until the next refresh.
    pub async fn compile(&self, platforms: &[Platform]) -> SdkResult<()> {
        self.inner.api.compile(&self.inner.id, platforms).await?;
        info!(project = %self.inner.id, "Compilation queued");
        Ok(())
    }

    pub async fn compile_dev_app(&self) -> SdkResult<()> {
        self.inner.api.compile_dev_app(&self.inner.id).await?;
        info!(project = %self.inner.id, "Developer app compilation queued");
        Ok(())
    }

    pub async fn download_compilation(&self, platform: Platform) -> SdkResult<Bytes> {
        self.inner
            .api
            .download_compilation(&self.inner.id, platform)
            .await
    }

    /// Assign `key` remotely, then record it in its platform slot.
    ///
    /// On remote failure the local key map is left unchanged.
    pub async fn assign_signing_key(&self, key: SigningKey) -> SdkResult<()> {
        self.inner
            .api
            .assign_signing_key(&self.inner.id, &key.id)
            .await?;
        info!(project = %self.inner.id, platform = %key.platform, "Signing key assigned");
        self.update_snapshot(|s| {
            s.signing_keys.insert(key.platform, key);
        });
        Ok(())
    }

    /// Remove the key assigned to `platform`.
    ///
    /// Fails with [`SdkError::NoSigningKey`] without any remote call when
    /// the slot is already empty.
    pub async fn remove_signing_key(&self, platform: Platform) -> SdkResult<()> {
        let assigned = self.read().signing_key(platform).is_some();
        if !assigned {
            return Err(SdkError::NoSigningKey(platform));
        }
        self.inner
            .api
            .remove_signing_key(&self.inner.id, platform)
            .await?;
        info!(project = %self.inner.id, platform = %platform, "Signing key removed");
        self.update_snapshot(|s| {
            s.signing_keys.remove(&platform);
        });
        Ok(())
    }

    /// Delete the remote project. The handle is consumed.
    pub async fn delete(self) -> SdkResult<()> {
        self.inner.api.delete(&self.inner.id).await?;
        info!(project = %self.inner.id, "Project deleted");
        Ok(())
    }
}
