//! Client facade.
//!
//! [`Client`] wires storage, the session store, a transport and the resource
//! hooks together so callers only deal with one value.

use std::sync::Arc;

use thiserror::Error;

use crate::api::{AdminApi, AuthApi, ProjectsApi};
use crate::config::{ClientConfig, ConfigError};
use crate::hooks::{AdminHook, AuthHook, ErrorHandler, ProjectsHook};
use crate::notification::Notifier;
use crate::session::SessionStore;
use crate::storage::{FileStorage, StorageError};
use crate::transport::{HttpTransport, Transport};

/// Errors raised while building a [`Client`].
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),
}

/// One session, one transport, and the hooks that share them.
pub struct Client {
    session: Arc<SessionStore>,
    transport: Arc<dyn Transport>,
    auth: AuthHook,
    projects: ProjectsHook,
    admin: AdminHook,
    errors: ErrorHandler,
}

impl Client {
    /// Build a client talking HTTP to `config.api_url`, with the session
    /// persisted under `config.storage_dir`.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage directory cannot be created or the
    /// HTTP client cannot be built.
    pub fn connect(config: &ClientConfig, notifier: Arc<dyn Notifier>) -> Result<Self, ClientError> {
        let storage = FileStorage::new(&config.storage_dir)?;
        let session = Arc::new(SessionStore::hydrate(Arc::new(storage)));
        let transport = HttpTransport::new(
            &config.api_url,
            config.request_timeout(),
            Arc::clone(&session),
        )?;
        tracing::debug!(
            base_url = transport.base_url(),
            authenticated = session.is_authenticated(),
            "client ready"
        );
        Ok(Self::with_transport(session, Arc::new(transport), notifier))
    }

    /// Build a client over an existing session and transport.
    pub fn with_transport(
        session: Arc<SessionStore>,
        transport: Arc<dyn Transport>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            auth: AuthHook::new(
                AuthApi::new(Arc::clone(&transport)),
                Arc::clone(&session),
                Arc::clone(&notifier),
            ),
            projects: ProjectsHook::new(
                ProjectsApi::new(Arc::clone(&transport)),
                Arc::clone(&notifier),
            ),
            admin: AdminHook::new(AdminApi::new(Arc::clone(&transport)), notifier),
            errors: ErrorHandler::new(),
            session,
            transport,
        }
    }

    pub fn auth(&self) -> &AuthHook {
        &self.auth
    }

    pub fn projects(&self) -> &ProjectsHook {
        &self.projects
    }

    pub fn admin(&self) -> &AdminHook {
        &self.admin
    }

    /// Error slot for operations run outside the hooks.
    pub fn errors(&self) -> &ErrorHandler {
        &self.errors
    }

    pub fn session(&self) -> &Arc<SessionStore> {
        &self.session
    }

    /// The shared transport, for building extra [`ApiHook`](crate::hooks::ApiHook)s.
    pub fn transport(&self) -> &Arc<dyn Transport> {
        &self.transport
    }
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("session", &self.session)
            .finish_non_exhaustive()
    }
}
