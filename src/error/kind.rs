//! Error kinds for the client error taxonomy.
//!
//! Every failure that reaches a hook is classified into exactly one of these
//! kinds. Each kind has a stable code string (used in logs and serialized
//! errors) and a fixed user-facing message template.

use serde::{Deserialize, Serialize};

/// Fallback text when no better user-facing message is available.
pub const UNEXPECTED_ERROR_MESSAGE: &str = "An unexpected error occurred.";

/// The closed set of error kinds produced by [`normalize`](super::normalize).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// The server answered with a non-success status outside 400/401/403.
    Api,
    /// The server rejected the request payload (HTTP 400).
    Validation,
    /// No response was received, or the failure could not be recognized.
    Network,
    /// The server refused the credentials (HTTP 401 or 403).
    Auth,
}

impl ErrorKind {
    /// Stable machine-readable code for this kind.
    pub fn code(self) -> &'static str {
        match self {
            ErrorKind::Api => "API_ERROR",
            ErrorKind::Validation => "VALIDATION_ERROR",
            ErrorKind::Network => "NETWORK_ERROR",
            ErrorKind::Auth => "AUTH_ERROR",
        }
    }

    /// Fixed user-facing message for this kind.
    ///
    /// Returns `None` for [`ErrorKind::Validation`], whose message is the
    /// server's own explanation and therefore passed through verbatim.
    pub fn message_template(self) -> Option<&'static str> {
        match self {
            ErrorKind::Api => Some("Something went wrong. Please try again."),
            ErrorKind::Network => {
                Some("Unable to connect. Please check your internet connection.")
            }
            ErrorKind::Auth => Some("Authentication failed. Please log in again."),
            ErrorKind::Validation => None,
        }
    }

    /// Returns true if re-authenticating might resolve the error.
    pub fn requires_login(self) -> bool {
        matches!(self, ErrorKind::Auth)
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}
