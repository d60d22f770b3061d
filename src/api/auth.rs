//! Authentication endpoints.

use std::sync::Arc;

use serde_json::json;

use super::decode_envelope;
use super::models::AuthResponse;
use crate::error::RawError;
use crate::transport::{ApiRequest, Transport};

/// Google sign-in, OAuth callback and GitHub linking.
#[derive(Clone)]
pub struct AuthApi {
    transport: Arc<dyn Transport>,
}

impl AuthApi {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Exchange a Google ID token for a session.
    pub async fn login_with_google(&self, google_token: &str) -> Result<AuthResponse, RawError> {
        let request = ApiRequest::post("/auth/google", &json!({ "token": google_token }))?;
        let response = self.transport.send(request).await?;
        decode_envelope(response.data)
    }

    /// Complete the Google OAuth redirect flow.
    pub async fn handle_google_callback(&self, code: &str) -> Result<AuthResponse, RawError> {
        let request = ApiRequest::get("/auth/google/callback").with_query("code", code);
        let response = self.transport.send(request).await?;
        decode_envelope(response.data)
    }

    /// Link a GitHub account to the signed-in user.
    pub async fn link_github(&self, code: &str) -> Result<(), RawError> {
        let request = ApiRequest::get("/auth/github/callback").with_query("code", code);
        self.transport.send(request).await?;
        Ok(())
    }
}
