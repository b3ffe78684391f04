use std::sync::Arc;

use super::endpoints;
use crate::auth::{RequestOptions, SessionManager};
use crate::error::SdkResult;
use crate::models::{PlatformVersions, Template};

/// Service-wide information: templates and supported toolchains.
#[derive(Clone)]
pub struct CloudApi {
    session: Arc<SessionManager>,
}

impl CloudApi {
    pub fn new(session: Arc<SessionManager>) -> Self {
        Self { session }
    }

    pub async fn templates(&self) -> SdkResult<Vec<Template>> {
        self.session
            .request_json(RequestOptions::get(endpoints::TEMPLATES))
            .await
    }

    pub async fn versions(&self) -> SdkResult<PlatformVersions> {
        self.session
            .request_json(RequestOptions::get(endpoints::VERSIONS))
            .await
    }
}
