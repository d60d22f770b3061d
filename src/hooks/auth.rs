//! Authentication hook.
//!
//! Wraps the auth endpoints with hook state and commits successful sign-ins
//! to the shared [`SessionStore`].

use std::sync::Arc;

use super::state::{track, HookSnapshot, HookState};
use crate::api::{AuthApi, AuthResponse, User};
use crate::error::{AppError, RawError};
use crate::notification::Notifier;
use crate::result::ApiResult;
use crate::session::SessionStore;

/// Sign-in, sign-out and account linking.
pub struct AuthHook {
    api: AuthApi,
    session: Arc<SessionStore>,
    notifier: Arc<dyn Notifier>,
    state: HookState<AuthResponse>,
}

impl AuthHook {
    pub fn new(api: AuthApi, session: Arc<SessionStore>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            api,
            session,
            notifier,
            state: HookState::new(),
        }
    }

    /// Persist `auth` as the current session.
    fn commit_session(&self, auth: &AuthResponse) -> Result<(), RawError> {
        self.session
            .establish(auth.token.clone(), auth.user.clone())
            .map_err(|e| RawError::failure(format!("Failed to save session: {}", e)))
    }

    /// Sign in with a Google ID token.
    pub async fn login(&self, google_token: &str) -> ApiResult<AuthResponse> {
        let operation = async {
            let auth = self.api.login_with_google(google_token).await?;
            self.commit_session(&auth)?;
            Ok::<_, RawError>(auth)
        };
        let result = track(&self.state, operation, |data, auth: &AuthResponse| {
            *data = Some(auth.clone());
        })
        .await;

        match &result {
            Ok(auth) => self.notifier.success(
                "Welcome back!",
                Some(&format!("Logged in as {}", auth.user.name)),
            ),
            Err(error) => self.notifier.show_error(error),
        }
        result
    }

    /// Complete the Google OAuth redirect with its authorization `code`.
    pub async fn handle_google_callback(&self, code: &str) -> ApiResult<AuthResponse> {
        let operation = async {
            let auth = self.api.handle_google_callback(code).await?;
            self.commit_session(&auth)?;
            Ok::<_, RawError>(auth)
        };
        let result = track(&self.state, operation, |data, auth: &AuthResponse| {
            *data = Some(auth.clone());
        })
        .await;

        match &result {
            Ok(_) => self
                .notifier
                .success("Welcome!", Some("Successfully logged in with Google")),
            Err(error) => self.notifier.show_error(error),
        }
        result
    }

    /// Link a GitHub account using the OAuth `code` from GitHub.
    pub async fn link_github(&self, code: &str) -> ApiResult<()> {
        let result = track(&self.state, self.api.link_github(code), |_, _| {}).await;

        match &result {
            Ok(()) => self.notifier.success(
                "GitHub Linked!",
                Some("Your GitHub account has been successfully linked"),
            ),
            Err(error) => self.notifier.show_error(error),
        }
        result
    }

    /// Sign out. Synchronous and infallible.
    pub fn logout(&self) {
        self.session.clear();
        self.state.reset();
        self.notifier
            .info("Logged out", Some("You have been successfully logged out"));
    }

    /// The signed-in user.
    pub fn user(&self) -> Option<User> {
        self.session.user()
    }

    /// The current bearer token.
    pub fn token(&self) -> Option<String> {
        self.session.token()
    }

    /// Whether a session exists.
    pub fn is_authenticated(&self) -> bool {
        self.session.is_authenticated()
    }

    /// Whether an auth operation is in flight.
    pub fn is_loading(&self) -> bool {
        self.state.is_loading()
    }

    /// Error of the last failed auth operation.
    pub fn error(&self) -> Option<AppError> {
        self.state.error()
    }

    /// Current hook state.
    pub fn snapshot(&self) -> HookSnapshot<AuthResponse> {
        self.state.snapshot()
    }

    /// The hook's observable state.
    pub fn state(&self) -> &HookState<AuthResponse> {
        &self.state
    }
}
