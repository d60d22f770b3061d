//! Typed endpoint functions
//!
//! Thin wrappers that turn a backend endpoint into a typed async call over a
//! [`Transport`](crate::transport::Transport). They return raw transport
//! failures; classification is left to the hooks.

pub mod admin;
pub mod auth;
pub mod models;
pub mod projects;

pub use admin::AdminApi;
pub use auth::AuthApi;
pub use models::{
    AuthResponse, CollectorSettings, CreateProjectRequest, Project, SubmitProjectRequest, User,
};
pub use projects::ProjectsApi;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::RawError;

/// Decode a response body, unwrapping the backend's `{ message, data }`
/// envelope when present.
pub(crate) fn decode_envelope<T: DeserializeOwned>(body: Value) -> Result<T, RawError> {
    let payload = match body {
        Value::Object(mut map) if map.get("data").is_some_and(|d| !d.is_null()) => {
            map.remove("data").unwrap_or(Value::Null)
        }
        other => other,
    };
    Ok(serde_json::from_value(payload)?)
}
