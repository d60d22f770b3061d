//! reqwest-backed transport.
//!
//! Attaches the current session's bearer token to every request and clears
//! the session when the backend answers 401.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::Client;
use serde_json::Value;

use super::{ApiRequest, ApiResponse, Method, Transport};
use crate::error::RawError;
use crate::session::SessionStore;

/// Path prefix under which the backend mounts its API.
pub const API_PREFIX: &str = "/api";

/// Transport talking to the backend over HTTP.
pub struct HttpTransport {
    /// HTTP client for API requests
    client: Client,
    /// `{api_url}/api`, without trailing slash
    base_url: String,
    /// Source of the bearer token, cleared on 401
    session: Arc<SessionStore>,
}

impl HttpTransport {
    /// Create a transport for the backend at `api_url`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(
        api_url: &str,
        timeout: Duration,
        session: Arc<SessionStore>,
    ) -> Result<Self, reqwest::Error> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: format!("{}{}", api_url.trim_end_matches('/'), API_PREFIX),
            session,
        })
    }

    /// The resolved API base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }
}

/// Parse a response body as JSON, keeping non-JSON bodies as a string.
fn decode_body(bytes: &[u8]) -> Value {
    serde_json::from_slice(bytes)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(bytes).into_owned()))
}

/// Extract the server's explanation from an error body.
///
/// The backend uses `{"message": ...}` for most errors and
/// `{"error": ...}` for validation failures.
fn body_message(body: &Value) -> Option<String> {
    ["message", "error"]
        .iter()
        .find_map(|key| body.get(key).and_then(Value::as_str))
        .or_else(|| body.as_str())
        .map(str::to_string)
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, RawError> {
        let url = self.url(&request.path);
        let mut builder = match request.method {
            Method::Get => self.client.get(&url),
            Method::Post => self.client.post(&url),
            Method::Put => self.client.put(&url),
            Method::Delete => self.client.delete(&url),
        };

        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(token) = self.session.token() {
            builder = builder.bearer_auth(token);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        tracing::debug!(method = %request.method, path = %request.path, "sending request");

        let response = builder.send().await.map_err(|e| {
            tracing::debug!(error = %e, path = %request.path, "request failed without response");
            RawError::from(e)
        })?;

        let status = response.status();
        let bytes = response.bytes().await?;

        if !status.is_success() {
            let body = (!bytes.is_empty()).then(|| decode_body(&bytes));
            let message = body.as_ref().and_then(body_message);

            if status == reqwest::StatusCode::UNAUTHORIZED {
                tracing::warn!(path = %request.path, "unauthorized response, clearing session");
                self.session.clear();
            } else {
                tracing::debug!(status = status.as_u16(), path = %request.path, "request rejected");
            }

            return Err(RawError::Response {
                status: status.as_u16(),
                message,
                reason: Some(format!(
                    "Request failed with status code {}",
                    status.as_u16()
                )),
                body,
            });
        }

        // Typed decoders reject shape mismatches; the transport only reports
        // what the server sent.
        let data = if bytes.is_empty() {
            Value::Null
        } else {
            decode_body(&bytes)
        };

        Ok(ApiResponse {
            status: status.as_u16(),
            data,
        })
    }
}
