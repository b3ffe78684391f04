//! Mock HTTP client for testing.
//!
//! Provides a configurable mock HTTP client that can return predefined
//! responses or errors, and records every request it receives.

use async_trait::async_trait;
use bytes::Bytes;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard};

use crate::traits::{Headers, HttpClient, HttpError, Method, Response};

/// A recorded HTTP request for verification in tests.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    /// HTTP method
    pub method: Method,
    /// Request URL
    pub url: String,
    /// Request headers
    pub headers: Headers,
    /// Request body, if any
    pub body: Option<Bytes>,
}

impl RecordedRequest {
    /// Request body decoded as UTF-8 (lossy).
    pub fn body_text(&self) -> Option<String> {
        self.body
            .as_ref()
            .map(|b| String::from_utf8_lossy(b).into_owned())
    }

    /// Value of the `Authorization` header.
    pub fn authorization(&self) -> Option<&str> {
        self.headers.get("Authorization").map(String::as_str)
    }
}

/// Configuration for a mock response.
#[derive(Debug, Clone)]
pub enum MockResponse {
    /// Return a response (any status)
    Success(Response),
    /// Return a transport error
    Error(HttpError),
}

impl MockResponse {
    /// 200 response with a JSON body.
    pub fn json(value: serde_json::Value) -> Self {
        MockResponse::Success(Response::json_ok(&value))
    }

    /// Response with the given status and text body.
    pub fn status(status: u16, body: &str) -> Self {
        MockResponse::Success(Response::new(status, Bytes::copy_from_slice(body.as_bytes())))
    }
}

type RouteKey = (Option<Method>, String);

/// Mock HTTP client for testing.
///
/// Responses are looked up in this order: queued one-shot responses for the
/// exact URL, fixed responses for the exact URL, fixed responses for the
/// longest matching URL prefix, then the default response. Method-specific
/// routes win over routes registered for any method.
///
/// # Example
///
/// ```ignore
/// let client = MockHttpClient::new();
/// client.set_response("https://api.example.com/data", MockResponse::status(200, "Hello"));
///
/// let response = client
///     .send(Method::Get, "https://api.example.com/data", &Headers::new(), None)
///     .await?;
/// assert_eq!(response.status, 200);
/// assert_eq!(client.get_requests().len(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MockHttpClient {
    responses: Arc<Mutex<HashMap<RouteKey, MockResponse>>>,
    queued: Arc<Mutex<HashMap<RouteKey, VecDeque<MockResponse>>>>,
    default_response: Arc<Mutex<Option<MockResponse>>>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl MockHttpClient {
    /// Create a new mock HTTP client.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a response for a URL, any method.
    pub fn set_response(&self, url: &str, response: MockResponse) {
        lock(&self.responses).insert((None, url.to_string()), response);
    }

    /// Set a response for a URL and a specific method.
    pub fn set_method_response(&self, method: Method, url: &str, response: MockResponse) {
        lock(&self.responses).insert((Some(method), url.to_string()), response);
    }

    /// Queue a one-shot response for a URL and method. Queued responses
    /// are consumed in order before any fixed response is used.
    pub fn queue_response(&self, method: Method, url: &str, response: MockResponse) {
        lock(&self.queued)
            .entry((Some(method), url.to_string()))
            .or_default()
            .push_back(response);
    }

    /// Set a default response for URLs without specific matches.
    pub fn set_default_response(&self, response: MockResponse) {
        *lock(&self.default_response) = Some(response);
    }

    /// Get all recorded requests.
    pub fn get_requests(&self) -> Vec<RecordedRequest> {
        lock(&self.requests).clone()
    }

    /// Recorded requests with the given method and URL.
    pub fn requests_to(&self, method: Method, url: &str) -> Vec<RecordedRequest> {
        lock(&self.requests)
            .iter()
            .filter(|r| r.method == method && r.url == url)
            .cloned()
            .collect()
    }

    /// Clear all recorded requests.
    pub fn clear_requests(&self) {
        lock(&self.requests).clear();
    }

    /// Clear all configured responses.
    pub fn clear_responses(&self) {
        lock(&self.responses).clear();
        lock(&self.queued).clear();
    }

    fn record_request(&self, method: Method, url: &str, headers: &Headers, body: Option<Bytes>) {
        lock(&self.requests).push(RecordedRequest {
            method,
            url: url.to_string(),
            headers: headers.clone(),
            body,
        });
    }

    fn take_queued(&self, method: Method, url: &str) -> Option<MockResponse> {
        let mut queued = lock(&self.queued);
        queued
            .get_mut(&(Some(method), url.to_string()))
            .and_then(VecDeque::pop_front)
    }

    fn get_response(&self, method: Method, url: &str) -> Option<MockResponse> {
        if let Some(response) = self.take_queued(method, url) {
            return Some(response);
        }

        let responses = lock(&self.responses);
        for key in [(Some(method), url.to_string()), (None, url.to_string())] {
            if let Some(response) = responses.get(&key) {
                return Some(response.clone());
            }
        }

        let prefix_match = responses
            .iter()
            .filter(|((m, pattern), _)| {
                (m.is_none() || *m == Some(method)) && url.starts_with(pattern.as_str())
            })
            .max_by_key(|((m, pattern), _)| (pattern.len(), m.is_some()))
            .map(|(_, response)| response.clone());
        if prefix_match.is_some() {
            return prefix_match;
        }

        lock(&self.default_response).clone()
    }
}

#[async_trait]
impl HttpClient for MockHttpClient {
    async fn send(
        &self,
        method: Method,
        url: &str,
        headers: &Headers,
        body: Option<Bytes>,
    ) -> Result<Response, HttpError> {
        self.record_request(method, url, headers, body);

        match self.get_response(method, url) {
            Some(MockResponse::Success(response)) => Ok(response),
            Some(MockResponse::Error(err)) => Err(err),
            None => Err(HttpError::Other(format!(
                "No mock response for {} {}",
                method, url
            ))),
        }
    }
}
