//! Integration tests for the session lifecycle against a real HTTP server.
//!
//! These tests verify:
//! - Refresh-then-send when the access token is stale
//! - Unauthenticated failures before setup and after close
//! - Refresh failures leave stored credentials untouched
//! - The file backend survives a new session manager

mod common;

use appforge::adapters::FileCredentialsProvider;
use appforge::auth::{RequestOptions, SessionState};
use appforge::config::CredentialBackend;
use appforge::error::{AuthError, SdkError};
use appforge::traits::CredentialsProvider;
use common::*;
use serde_json::json;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_expired_token_refreshes_once_and_sends_new_bearer() {
    let server = MockServer::start().await;
    mount_token_endpoint(&server, 1).await;

    Mock::given(method("GET"))
        .and(path("/projects"))
        .and(header(
            "Authorization",
            format!("Bearer {}", REFRESHED_ACCESS_TOKEN).as_str(),
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let session = expired_session(&server).await;
    let response = session
        .authorized_request(RequestOptions::get("/projects"))
        .await
        .unwrap();

    assert_eq!(response.status, 200);
    // Mock expectations (exactly one refresh, one call) are verified on drop.
}

#[tokio::test]
async fn test_valid_token_skips_refresh() {
    let server = MockServer::start().await;
    mount_token_endpoint(&server, 0).await;

    Mock::given(method("GET"))
        .and(path("/projects"))
        .and(header(
            "Authorization",
            format!("Bearer {}", ACCESS_TOKEN).as_str(),
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(2)
        .mount(&server)
        .await;

    let session = active_session(&server).await;
    for _ in 0..2 {
        session
            .authorized_request(RequestOptions::get("/projects"))
            .await
            .unwrap();
    }
}

#[tokio::test]
async fn test_close_access_then_request_is_unauthenticated() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let session = active_session(&server).await;
    session.close_access().await.unwrap();

    assert_eq!(session.state(), SessionState::Closed);
    assert!(!session.is_authenticated().await);
    let err = session
        .authorized_request(RequestOptions::get("/projects"))
        .await
        .unwrap_err();
    assert!(matches!(err, SdkError::Auth(AuthError::NotAuthenticated)));
    assert!(err.requires_reauth());
}

#[tokio::test]
async fn test_request_before_setup_is_unauthenticated() {
    let server = MockServer::start().await;
    let session = new_session(test_config(&server));

    let err = session
        .authorized_request(RequestOptions::get("/projects"))
        .await
        .unwrap_err();

    assert!(matches!(err, SdkError::Auth(AuthError::NotAuthenticated)));
    assert!(server.received_requests().await.unwrap_or_default().is_empty());
}

#[tokio::test]
async fn test_rejected_refresh_is_not_retried() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": "invalid_grant",
            "error_description": "Refresh token revoked"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let session = expired_session(&server).await;
    let err = session
        .authorized_request(RequestOptions::get("/projects"))
        .await
        .unwrap_err();

    match err {
        SdkError::Auth(AuthError::RefreshRejected { status, message }) => {
            assert_eq!(status, 400);
            assert_eq!(message, "Refresh token revoked");
        }
        other => panic!("unexpected error: {:?}", other),
    }
    // Still authenticated with the old (stale) token.
    assert!(session.is_authenticated().await);
}

#[tokio::test]
async fn test_non_success_status_is_propagated() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/projects/9"))
        .respond_with(ResponseTemplate::new(409).set_body_string("Project is compiling"))
        .mount(&server)
        .await;

    let session = active_session(&server).await;
    let err = session
        .authorized_request(RequestOptions::delete("/projects/9"))
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(409));
    assert!(err.to_string().contains("Project is compiling"));
}

#[tokio::test]
async fn test_custom_token_url() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/identity/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": REFRESHED_ACCESS_TOKEN
        })))
        .expect(1)
        .mount(&server)
        .await;

    let config = test_config(&server)
        .with_auth_url(format!("{}/identity/token", server.uri()))
        .with_client_id("sdk-tests");
    let session = new_session(config);
    session
        .setup_access("stale", REFRESH_TOKEN, Some(0), None)
        .await
        .unwrap();

    session.refresh_access().await.unwrap();

    let requests = server.received_requests().await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(body["client_id"], "sdk-tests");
}

#[tokio::test]
async fn test_file_backend_persists_between_managers() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let creds_path = dir.path().join("nested").join("credentials.json");
    let backend = CredentialBackend::Persistent {
        path: Some(creds_path.clone()),
    };

    let first = new_session(test_config(&server).with_credential_backend(backend.clone()));
    first
        .setup_access(ACCESS_TOKEN, REFRESH_TOKEN, Some(3600), None)
        .await
        .unwrap();
    assert!(creds_path.exists());

    let second = new_session(test_config(&server).with_credential_backend(backend));
    assert!(second.resume_access(None).await.unwrap());
    assert!(second.is_authenticated().await);

    second.close_access().await.unwrap();
    let stored = FileCredentialsProvider::with_path(&creds_path).load().await.unwrap();
    assert!(stored.is_none());
}
