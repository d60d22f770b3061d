//! Raw failures as produced by the transport layer.
//!
//! A [`RawError`] is what a [`Transport`](crate::transport::Transport) hands
//! back when a call does not succeed. It is never shown to callers of the
//! hooks directly; [`normalize`](super::normalize) turns it into an
//! [`AppError`](super::AppError).

use serde_json::Value;

/// A failure reported by the transport, before classification.
#[derive(Clone, Debug, PartialEq)]
pub enum RawError {
    /// A response arrived with a non-success status code.
    Response {
        /// HTTP status code.
        status: u16,
        /// Message supplied by the server in the response body.
        message: Option<String>,
        /// The transport's own description of the failure.
        reason: Option<String>,
        /// Decoded response body, if any.
        body: Option<Value>,
    },
    /// A runtime failure without any response (connect error, timeout,
    /// undecodable payload, local persistence failure).
    Failure {
        /// Description of the failure.
        message: String,
    },
    /// A failure of unrecognized shape.
    Opaque(Option<Value>),
}

impl RawError {
    /// Creates a response failure with only a status code.
    pub fn status(status: u16) -> Self {
        Self::Response {
            status,
            message: None,
            reason: None,
            body: None,
        }
    }

    /// Creates a response failure carrying a server message.
    pub fn response(status: u16, message: impl Into<String>) -> Self {
        Self::Response {
            status,
            message: Some(message.into()),
            reason: None,
            body: None,
        }
    }

    /// Creates a runtime failure without a response.
    pub fn failure(message: impl Into<String>) -> Self {
        Self::Failure {
            message: message.into(),
        }
    }

    /// Returns the HTTP status if a response was received.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Response { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns true if the server rejected the request as unauthenticated.
    pub fn is_unauthorized(&self) -> bool {
        self.status_code() == Some(401)
    }
}

impl std::fmt::Display for RawError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Response {
                status,
                message,
                reason,
                ..
            } => {
                let text = message.as_deref().or(reason.as_deref()).unwrap_or("");
                write!(f, "HTTP {}: {}", status, text)
            }
            Self::Failure { message } => write!(f, "{}", message),
            Self::Opaque(_) => write!(f, "unrecognized failure"),
        }
    }
}

impl std::error::Error for RawError {}

impl From<reqwest::Error> for RawError {
    fn from(err: reqwest::Error) -> Self {
        // reqwest only yields a status here for error_for_status(), which the
        // transport never calls; everything else had no usable response.
        match err.status() {
            Some(status) => Self::Response {
                status: status.as_u16(),
                message: None,
                reason: Some(err.to_string()),
                body: None,
            },
            None => Self::failure(err.to_string()),
        }
    }
}

impl From<serde_json::Error> for RawError {
    fn from(err: serde_json::Error) -> Self {
        Self::failure(format!("Failed to decode response: {}", err))
    }
}
