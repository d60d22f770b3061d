//! Transport layer
//!
//! This module defines the [`Transport`] trait the typed API is written
//! against, the request/response types that cross it, and the implementations
//! shipped with the crate.

pub mod http;
pub mod scripted;

pub use http::HttpTransport;
pub use scripted::ScriptedTransport;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use std::fmt;

use crate::error::RawError;

/// HTTP method of an [`ApiRequest`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Method::Get => write!(f, "GET"),
            Method::Post => write!(f, "POST"),
            Method::Put => write!(f, "PUT"),
            Method::Delete => write!(f, "DELETE"),
        }
    }
}

/// A request relative to the API base URL.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    /// HTTP method
    pub method: Method,
    /// Path below the API prefix, starting with `/`
    pub path: String,
    /// Query parameters, encoded by the transport
    pub query: Vec<(String, String)>,
    /// JSON body
    pub body: Option<Value>,
}

impl ApiRequest {
    /// Create a request without query or body.
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
        }
    }

    /// Create a GET request.
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::Get, path)
    }

    /// Create a POST request with a JSON body.
    ///
    /// # Errors
    ///
    /// Returns a [`RawError::Failure`] if `body` cannot be serialized.
    pub fn post<B: Serialize>(path: impl Into<String>, body: &B) -> Result<Self, RawError> {
        let body = serde_json::to_value(body)
            .map_err(|e| RawError::failure(format!("Failed to encode request: {}", e)))?;
        Ok(Self::new(Method::Post, path).with_body(body))
    }

    /// Add a query parameter.
    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Set the JSON body.
    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }
}

/// A successful response.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    /// HTTP status code (2xx)
    pub status: u16,
    /// Decoded JSON body; `Null` when the body was empty
    pub data: Value,
}

impl ApiResponse {
    /// A 200 response carrying `data`.
    pub fn ok(data: Value) -> Self {
        Self { status: 200, data }
    }
}

/// The HTTP-calling collaborator.
///
/// Implementations resolve to an [`ApiResponse`] for 2xx answers and reject
/// with a [`RawError`] otherwise. They never classify errors themselves.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send `request` and wait for the outcome.
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, RawError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_method_display() {
        assert_eq!(Method::Get.to_string(), "GET");
        assert_eq!(Method::Post.to_string(), "POST");
        assert_eq!(Method::Put.to_string(), "PUT");
        assert_eq!(Method::Delete.to_string(), "DELETE");
    }

    #[test]
    fn test_get_request() {
        let request = ApiRequest::get("/auth/google/callback").with_query("code", "xyz");
        assert_eq!(request.method, Method::Get);
        assert_eq!(request.path, "/auth/google/callback");
        assert_eq!(request.query, vec![("code".to_string(), "xyz".to_string())]);
        assert!(request.body.is_none());
    }

    #[test]
    fn test_post_request_serializes_body() {
        let request = ApiRequest::post("/auth/google", &json!({ "token": "g" })).unwrap();
        assert_eq!(request.method, Method::Post);
        assert_eq!(request.body, Some(json!({ "token": "g" })));
    }
}
