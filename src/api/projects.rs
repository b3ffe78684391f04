//! Project endpoints.

use std::sync::Arc;

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::debug;

use super::endpoints;
use crate::auth::{RequestOptions, SessionManager};
use crate::error::{SdkError, SdkResult};
use crate::models::{Platform, ProjectData};
use crate::traits::ConfigDocumentError;

const ZIP_CONTENT_TYPE: &str = "application/zip";
const XML_CONTENT_TYPE: &str = "application/xml";

/// Git repository a project can be built from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepositorySource {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,
}

impl RepositorySource {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            branch: None,
        }
    }

    pub fn with_branch(mut self, branch: impl Into<String>) -> Self {
        self.branch = Some(branch.into());
        self
    }
}

/// Client for `/projects`.
#[derive(Clone)]
pub struct ProjectApi {
    session: Arc<SessionManager>,
}

impl ProjectApi {
    pub fn new(session: Arc<SessionManager>) -> Self {
        Self { session }
    }

    pub fn session(&self) -> &Arc<SessionManager> {
        &self.session
    }

    pub async fn list(&self) -> SdkResult<Vec<ProjectData>> {
        self.session
            .request_json(RequestOptions::get(endpoints::PROJECTS))
            .await
    }

    pub async fn get(&self, id: &str) -> SdkResult<ProjectData> {
        self.session
            .request_json(RequestOptions::get(endpoints::project(id)))
            .await
    }

    pub async fn create_from_zip(&self, zip: Bytes) -> SdkResult<ProjectData> {
        debug!(size = zip.len(), "Creating project from zip");
        self.session
            .request_json(RequestOptions::post(endpoints::PROJECTS).with_body(zip, ZIP_CONTENT_TYPE))
            .await
    }

    pub async fn create_from_url(&self, url: &str) -> SdkResult<ProjectData> {
        self.session
            .request_json(
                RequestOptions::post(endpoints::PROJECTS_FROM_URL).with_json(&json!({ "url": url })),
            )
            .await
    }

    pub async fn create_from_repository(&self, repo: &RepositorySource) -> SdkResult<ProjectData> {
        self.session
            .request_json(
                RequestOptions::post(endpoints::PROJECTS_FROM_REPOSITORY)
                    .with_json(&serde_json::to_value(repo)?),
            )
            .await
    }

    pub async fn update_zip(&self, id: &str, zip: Bytes) -> SdkResult<ProjectData> {
        self.session
            .request_json(
                RequestOptions::put(endpoints::project_zip(id)).with_body(zip, ZIP_CONTENT_TYPE),
            )
            .await
    }

    pub async fn update_url(&self, id: &str, url: &str) -> SdkResult<ProjectData> {
        self.session
            .request_json(
                RequestOptions::put(endpoints::project_url(id)).with_json(&json!({ "url": url })),
            )
            .await
    }

    pub async fn update_repository(
        &self,
        id: &str,
        repo: &RepositorySource,
    ) -> SdkResult<ProjectData> {
        self.session
            .request_json(
                RequestOptions::put(endpoints::project_repository(id))
                    .with_json(&serde_json::to_value(repo)?),
            )
            .await
    }

    /// Raw configuration document text.
    pub async fn get_config(&self, id: &str) -> SdkResult<String> {
        let response = self
            .session
            .authorized_request(RequestOptions::get(endpoints::project_config(id)))
            .await?;
        response.text().map_err(|e| {
            SdkError::from(ConfigDocumentError::Malformed(format!(
                "configuration is not valid UTF-8: {}",
                e
            )))
        })
    }

    /// Replace the configuration document; returns the updated project.
    pub async fn put_config(&self, id: &str, text: &str) -> SdkResult<ProjectData> {
        self.session
            .request_json(
                RequestOptions::put(endpoints::project_config(id))
                    .with_body(text.to_string(), XML_CONTENT_TYPE),
            )
            .await
    }

    /// Icon image; the default icon when `platform` is `None`.
    pub async fn get_icon(&self, id: &str, platform: Option<Platform>) -> SdkResult<Bytes> {
        let response = self
            .session
            .authorized_request(RequestOptions::get(endpoints::project_icon(id, platform)))
            .await?;
        Ok(response.body)
    }

    pub async fn set_icon(
        &self,
        id: &str,
        platform: Option<Platform>,
        image: Bytes,
        content_type: &str,
    ) -> SdkResult<()> {
        self.session
            .authorized_request(
                RequestOptions::put(endpoints::project_icon(id, platform))
                    .with_body(image, content_type),
            )
            .await?;
        Ok(())
    }

    pub async fn get_splash(&self, id: &str, platform: Platform) -> SdkResult<Bytes> {
        let response = self
            .session
            .authorized_request(RequestOptions::get(endpoints::project_splash(id, platform)))
            .await?;
        Ok(response.body)
    }

    pub async fn set_splash(
        &self,
        id: &str,
        platform: Platform,
        image: Bytes,
        content_type: &str,
    ) -> SdkResult<()> {
        self.session
            .authorized_request(
                RequestOptions::put(endpoints::project_splash(id, platform))
                    .with_body(image, content_type),
            )
            .await?;
        Ok(())
    }

    /// Queue a build. An empty `platforms` slice builds every targeted platform.
    pub async fn compile(&self, id: &str, platforms: &[Platform]) -> SdkResult<()> {
        let mut options = RequestOptions::post(endpoints::project_compile(id));
        if !platforms.is_empty() {
            options = options.with_json(&json!({ "platforms": platforms }));
        }
        self.session.authorized_request(options).await?;
        Ok(())
    }

    pub async fn compile_dev_app(&self, id: &str) -> SdkResult<()> {
        self.session
            .authorized_request(RequestOptions::post(endpoints::project_compile_dev_app(id)))
            .await?;
        Ok(())
    }

    /// Built artifact for a completed compilation.
    pub async fn download_compilation(&self, id: &str, platform: Platform) -> SdkResult<Bytes> {
        let response = self
            .session
            .authorized_request(RequestOptions::get(endpoints::project_compilation(
                id, platform,
            )))
            .await?;
        Ok(response.body)
    }

    pub async fn assign_signing_key(&self, id: &str, key_id: &str) -> SdkResult<()> {
        self.session
            .authorized_request(RequestOptions::post(endpoints::project_key(id, key_id)))
            .await?;
        Ok(())
    }

    pub async fn remove_signing_key(&self, id: &str, platform: Platform) -> SdkResult<()> {
        self.session
            .authorized_request(RequestOptions::delete(endpoints::project_platform_key(
                id, platform,
            )))
            .await?;
        Ok(())
    }

    pub async fn delete(&self, id: &str) -> SdkResult<()> {
        self.session
            .authorized_request(RequestOptions::delete(endpoints::project(id)))
            .await?;
        Ok(())
    }
}
