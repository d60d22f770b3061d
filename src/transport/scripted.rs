//! A transport that replays pre-recorded outcomes.
//!
//! Useful for exercising hooks and UI code without a backend. Outcomes are
//! served in the order they were queued; every request is recorded.

use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use super::{ApiRequest, ApiResponse, Transport};
use crate::error::RawError;

struct Reply {
    outcome: Result<ApiResponse, RawError>,
    delay: Option<Duration>,
}

/// Transport answering from a queue of scripted outcomes.
#[derive(Default)]
pub struct ScriptedTransport {
    replies: Mutex<VecDeque<Reply>>,
    requests: Mutex<Vec<ApiRequest>>,
}

impl ScriptedTransport {
    /// Create a transport with an empty script.
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&self, outcome: Result<ApiResponse, RawError>, delay: Option<Duration>) {
        self.replies
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(Reply { outcome, delay });
    }

    /// Queue a 200 response carrying `data`.
    pub fn respond(&self, data: Value) -> &Self {
        self.push(Ok(ApiResponse::ok(data)), None);
        self
    }

    /// Queue a 200 response that resolves after `delay`.
    pub fn respond_after(&self, delay: Duration, data: Value) -> &Self {
        self.push(Ok(ApiResponse::ok(data)), Some(delay));
        self
    }

    /// Queue a failure.
    pub fn fail(&self, error: RawError) -> &Self {
        self.push(Err(error), None);
        self
    }

    /// Queue a failure that rejects after `delay`.
    pub fn fail_after(&self, delay: Duration, error: RawError) -> &Self {
        self.push(Err(error), Some(delay));
        self
    }

    /// Requests received so far, oldest first.
    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of outcomes not yet consumed.
    pub fn pending(&self) -> usize {
        self.replies
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, RawError> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(request);

        // The lock guard must be gone before the await below
        let reply = self
            .replies
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front();

        let Some(reply) = reply else {
            return Err(RawError::failure("no scripted response left"));
        };
        if let Some(delay) = reply.delay {
            tokio::time::sleep(delay).await;
        }
        reply.outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_replays_in_order() {
        let transport = ScriptedTransport::new();
        transport
            .respond(json!({ "n": 1 }))
            .fail(RawError::status(500));

        let first = transport.send(ApiRequest::get("/a")).await.unwrap();
        assert_eq!(first.data["n"], 1);

        let second = transport.send(ApiRequest::get("/b")).await.unwrap_err();
        assert_eq!(second.status_code(), Some(500));

        assert_eq!(transport.pending(), 0);
        let paths: Vec<_> = transport.requests().into_iter().map(|r| r.path).collect();
        assert_eq!(paths, vec!["/a", "/b"]);
    }

    #[tokio::test]
    async fn test_empty_script_fails() {
        let transport = ScriptedTransport::new();
        let err = transport.send(ApiRequest::get("/a")).await.unwrap_err();
        assert!(matches!(err, RawError::Failure { .. }));
    }
}
