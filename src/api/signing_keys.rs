use std::sync::Arc;

use super::endpoints;
use crate::auth::{RequestOptions, SessionManager};
use crate::error::SdkResult;
use crate::models::SigningKey;

/// Client for the account's signing keys (`/signkeys`).
#[derive(Clone)]
pub struct SigningKeyApi {
    session: Arc<SessionManager>,
}

impl SigningKeyApi {
    pub fn new(session: Arc<SessionManager>) -> Self {
        Self { session }
    }

    pub async fn list(&self) -> SdkResult<Vec<SigningKey>> {
        self.session
            .request_json(RequestOptions::get(endpoints::SIGNING_KEYS))
            .await
    }

    pub async fn get(&self, id: &str) -> SdkResult<SigningKey> {
        self.session
            .request_json(RequestOptions::get(endpoints::signing_key(id)))
            .await
    }

    /// Delete a key from the account. Projects using it lose the assignment.
    pub async fn delete(&self, id: &str) -> SdkResult<()> {
        self.session
            .authorized_request(RequestOptions::delete(endpoints::signing_key(id)))
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::MockResponse;
    use crate::api::test_support::authorized_session;
    use crate::models::Platform;
    use crate::traits::Method;
    use serde_json::json;

    #[tokio::test]
    async fn test_list_get_delete() {
        let (session, http) = authorized_session().await;
        let api = SigningKeyApi::new(session);
        http.set_method_response(
            Method::Get,
            "https://api.test/signkeys",
            MockResponse::json(json!([
                {"id": "k1", "platform": "android", "alias": "upload"},
                {"id": "k2", "platform": "ios"}
            ])),
        );
        http.set_method_response(
            Method::Get,
            "https://api.test/signkeys/k2",
            MockResponse::json(json!({"id": "k2", "platform": "ios", "name": "Dist"})),
        );
        http.set_method_response(
            Method::Delete,
            "https://api.test/signkeys/k1",
            MockResponse::status(204, ""),
        );

        let keys = api.list().await.unwrap();
        assert_eq!(keys.len(), 2);
        assert_eq!(keys[0].platform, Platform::Android);
        assert_eq!(keys[0].metadata["alias"], "upload");

        let key = api.get("k2").await.unwrap();
        assert_eq!(key.name.as_deref(), Some("Dist"));

        api.delete("k1").await.unwrap();
        assert_eq!(
            http.requests_to(Method::Delete, "https://api.test/signkeys/k1")
                .len(),
            1
        );
    }
}
