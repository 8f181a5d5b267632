// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! HTTP executor seam.
//!
//! Every remote call made by this crate is described as an [`HttpRequest`]
//! and handed to an [`HttpExecutor`]. The executor owns transport policy
//! (timeouts, TLS, retries); this crate never retries on its own. A non-2xx
//! response must surface as an [`HttpError`] carrying the status code.

use std::future::Future;
use std::time::Duration;

use reqwest::{Client, Method};
use serde_json::Value;
use uuid::Uuid;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);
const REQUEST_ID_HEADER: &str = "X-Request-Id";

/// A single remote call.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl HttpRequest {
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: Vec::new(),
            query: Vec::new(),
            body: None,
        }
    }

    pub fn get(url: impl Into<String>) -> Self {
        Self::new(Method::GET, url)
    }

    pub fn post(url: impl Into<String>) -> Self {
        Self::new(Method::POST, url)
    }

    pub fn delete(url: impl Into<String>) -> Self {
        Self::new(Method::DELETE, url)
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Adds `Authorization: Bearer <token>`.
    pub fn bearer(self, token: &str) -> Self {
        self.header("Authorization", format!("Bearer {token}"))
    }

    pub fn query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((name.into(), value.into()));
        self
    }

    pub fn json(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Look up a header value by case-insensitive name.
    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// Failure of a remote call.
///
/// `status` is `None` when no response was received (connect error,
/// timeout, undecodable body).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error(
    "request to {url} failed{}: {message}",
    .status.map(|s| format!(" with status {s}")).unwrap_or_default()
)]
pub struct HttpError {
    pub url: String,
    pub status: Option<u16>,
    pub message: String,
}

impl HttpError {
    /// The server answered with a non-success status.
    pub fn status(url: impl Into<String>, status: u16, message: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            status: Some(status),
            message: message.into(),
        }
    }

    /// No usable response was received.
    pub fn transport(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            status: None,
            message: message.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status == Some(404)
    }
}

/// Executes [`HttpRequest`]s and returns the decoded JSON body.
///
/// Implementations return `Ok` only for 2xx responses. An empty body is
/// returned as [`Value::Null`].
pub trait HttpExecutor: Send + Sync {
    fn execute(
        &self,
        request: HttpRequest,
    ) -> impl Future<Output = Result<Value, HttpError>> + Send;
}

impl<T: HttpExecutor> HttpExecutor for std::sync::Arc<T> {
    fn execute(
        &self,
        request: HttpRequest,
    ) -> impl Future<Output = Result<Value, HttpError>> + Send {
        (**self).execute(request)
    }
}

/// [`HttpExecutor`] backed by `reqwest`.
#[derive(Debug, Clone)]
pub struct ReqwestExecutor {
    http: Client,
}

impl ReqwestExecutor {
    pub fn new() -> Result<Self, HttpError> {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self, HttpError> {
        let http = Client::builder()
            .timeout(timeout)
            .user_agent(format!("wallet-storage-core/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| HttpError::transport("<client>", format!("failed to build HTTP client: {e}")))?;
        Ok(Self::from_client(http))
    }

    /// Wrap an existing client, keeping its transport configuration.
    pub fn from_client(http: Client) -> Self {
        Self { http }
    }
}

impl HttpExecutor for ReqwestExecutor {
    async fn execute(&self, request: HttpRequest) -> Result<Value, HttpError> {
        let HttpRequest {
            method,
            url,
            headers,
            query,
            body,
        } = request;

        let request_id = Uuid::new_v4().to_string();
        tracing::debug!(%method, %url, %request_id, "Sending request");

        let mut builder = self
            .http
            .request(method.clone(), &url)
            .header(REQUEST_ID_HEADER, &request_id);
        if !query.is_empty() {
            builder = builder.query(&query);
        }
        for (name, value) in &headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = &body {
            builder = builder.json(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| HttpError::transport(&url, format!("{method} failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            tracing::warn!(%method, %url, %request_id, status = status.as_u16(), "Request rejected");
            return Err(HttpError::status(&url, status.as_u16(), text));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| HttpError::transport(&url, format!("failed to read body: {e}")))?;

        Ok(decode_body(&bytes))
    }
}

/// Decode a response body; empty bodies are `null`, non-JSON bodies are
/// returned as a JSON string.
fn decode_body(bytes: &[u8]) -> Value {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Value::Null;
    }
    serde_json::from_slice(bytes)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(bytes).into_owned()))
}

/// Join a base URL and a path without doubling slashes.
pub(crate) fn join_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn request_builder_collects_parts() {
        let request = HttpRequest::post("https://vault.example.com/data")
            .bearer("challenge")
            .query("did", "did:ethr:0xabc")
            .json(json!({ "cyphertext": "blob" }));

        assert_eq!(request.method, Method::POST);
        assert_eq!(request.header_value("authorization"), Some("Bearer challenge"));
        assert_eq!(request.query, vec![("did".to_string(), "did:ethr:0xabc".to_string())]);
        assert_eq!(request.body, Some(json!({ "cyphertext": "blob" })));
    }

    #[test]
    fn http_error_display_includes_status() {
        let err = HttpError::status("https://vault.example.com/data", 404, "missing");
        assert_eq!(
            err.to_string(),
            "request to https://vault.example.com/data failed with status 404: missing"
        );
        assert!(err.is_not_found());

        let err = HttpError::transport("https://vault.example.com", "timeout");
        assert_eq!(err.to_string(), "request to https://vault.example.com failed: timeout");
        assert!(!err.is_not_found());
    }

    #[test]
    fn decode_body_handles_empty_and_plain_text() {
        assert_eq!(decode_body(b""), Value::Null);
        assert_eq!(decode_body(b"  \n"), Value::Null);
        assert_eq!(decode_body(br#"{"token":"t"}"#), json!({ "token": "t" }));
        assert_eq!(decode_body(b"OK"), json!("OK"));
    }

    #[test]
    fn join_url_trims_slashes() {
        assert_eq!(
            join_url("https://vault.example.com/", "/data/0/99"),
            "https://vault.example.com/data/0/99"
        );
        assert_eq!(
            join_url("https://vault.example.com", "auth/request-token"),
            "https://vault.example.com/auth/request-token"
        );
    }

    #[test]
    fn reqwest_executor_builds() {
        assert!(ReqwestExecutor::new().is_ok());
    }
}
