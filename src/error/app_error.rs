//! Normalized application errors.
//!
//! [`normalize`] is the single entry point that creates an [`AppError`]. It is
//! total over [`RawError`]: every input shape maps to exactly one kind.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{json, Value};

use super::kind::{ErrorKind, UNEXPECTED_ERROR_MESSAGE};
use super::raw::RawError;

/// Message used when a response carried no usable text.
const RESPONSE_FALLBACK_MESSAGE: &str = "An error occurred";

/// Message used when the failure shape is not recognized.
const UNKNOWN_FALLBACK_MESSAGE: &str = "An unknown error occurred";

/// A classified, immutable error value returned by every fallible hook.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AppError {
    kind: ErrorKind,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    status: Option<u16>,
    timestamp: DateTime<Utc>,
}

impl AppError {
    fn new(kind: ErrorKind, message: String, details: Option<Value>, status: Option<u16>) -> Self {
        Self {
            kind,
            message,
            details,
            status,
            timestamp: Utc::now(),
        }
    }

    /// The error kind.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Stable code string of the kind (`API_ERROR`, ...).
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    /// The raw message carried by the error.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Opaque payload attached at normalization time.
    pub fn details(&self) -> Option<&Value> {
        self.details.as_ref()
    }

    /// HTTP status code, when a response was received.
    pub fn status(&self) -> Option<u16> {
        self.status
    }

    /// When the error was created.
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// Human-readable message suitable for display.
    ///
    /// Validation errors pass the server message through; all other kinds use
    /// the kind's fixed template.
    pub fn user_message(&self) -> String {
        match self.kind.message_template() {
            Some(template) => template.to_string(),
            None if self.message.is_empty() => UNEXPECTED_ERROR_MESSAGE.to_string(),
            None => self.message.clone(),
        }
    }

    /// Returns true if this is an [`ErrorKind::Auth`] error.
    pub fn is_auth(&self) -> bool {
        self.kind == ErrorKind::Auth
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.kind.code(), self.message)
    }
}

impl std::error::Error for AppError {}

impl From<RawError> for AppError {
    fn from(raw: RawError) -> Self {
        normalize(raw)
    }
}

/// Classifies a raw transport failure into an [`AppError`].
///
/// - status 401 or 403 → [`ErrorKind::Auth`]
/// - status 400 → [`ErrorKind::Validation`]
/// - any other status → [`ErrorKind::Api`], with the status in `details`
/// - a failure without a response → [`ErrorKind::Network`]
/// - anything else → [`ErrorKind::Network`] with a fixed fallback message
pub fn normalize(raw: RawError) -> AppError {
    match raw {
        RawError::Response {
            status,
            message,
            reason,
            body,
        } => {
            let message = message
                .filter(|m| !m.is_empty())
                .or(reason.filter(|r| !r.is_empty()))
                .unwrap_or_else(|| RESPONSE_FALLBACK_MESSAGE.to_string());

            match status {
                401 | 403 => AppError::new(ErrorKind::Auth, message, body, Some(status)),
                400 => AppError::new(ErrorKind::Validation, message, body, Some(status)),
                _ => {
                    let mut details = json!({ "status": status });
                    if let Some(body) = body {
                        details["body"] = body;
                    }
                    AppError::new(ErrorKind::Api, message, Some(details), Some(status))
                }
            }
        }
        RawError::Failure { message } => {
            let details = json!({ "message": message });
            AppError::new(ErrorKind::Network, message, Some(details), None)
        }
        RawError::Opaque(payload) => AppError::new(
            ErrorKind::Network,
            UNKNOWN_FALLBACK_MESSAGE.to_string(),
            payload,
            None,
        ),
    }
}
