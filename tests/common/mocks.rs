//! Wiremock fixtures for the build service API.

use serde_json::{json, Value};
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::{REFRESHED_ACCESS_TOKEN, REFRESHED_REFRESH_TOKEN, REFRESH_TOKEN};

pub const PROJECT_ID: &str = "1234";

/// Full project payload with every field populated.
pub fn project_payload(name: &str, compilations: Value) -> Value {
    json!({
        "id": PROJECT_ID,
        "name": name,
        "bundle_id": "com.example.app",
        "version": "1.0.0",
        "origin": "zip",
        "date_created": 1700000000000i64,
        "date_updated": 1700000100000i64,
        "errors": [],
        "compilations": compilations,
        "keys": {}
    })
}

/// Token endpoint that accepts [`REFRESH_TOKEN`] and must be hit exactly
/// `times` times.
pub async fn mount_token_endpoint(server: &MockServer, times: u64) {
    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .and(body_partial_json(json!({
            "grant_type": "refresh_token",
            "refresh_token": REFRESH_TOKEN
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": REFRESHED_ACCESS_TOKEN,
            "refresh_token": REFRESHED_REFRESH_TOKEN,
            "token_type": "Bearer",
            "expires_in": 3600
        })))
        .expect(times)
        .mount(server)
        .await;
}

/// `GET /projects/{PROJECT_ID}` answering with `payload`.
pub async fn mount_project(server: &MockServer, payload: Value) {
    Mock::given(method("GET"))
        .and(path(format!("/projects/{}", PROJECT_ID)))
        .respond_with(ResponseTemplate::new(200).set_body_json(payload))
        .mount(server)
        .await;
}
