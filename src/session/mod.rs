//! Process-wide session state.
//!
//! The [`SessionStore`] owns the signed-in user's token and profile and keeps
//! them in lockstep with durable storage: a session exists if and only if a
//! token is stored. It is constructed once, hydrated from storage, and shared
//! (via `Arc`) with the hooks and the transport.

use std::sync::Arc;

use tokio::sync::watch;

use crate::api::models::User;
use crate::storage::{DurableStorage, StorageResult, TOKEN_KEY, USER_KEY};

/// An authenticated session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    /// Bearer token.
    pub token: String,
    /// The signed-in user.
    pub user: User,
}

/// Owner of the current [`Session`].
pub struct SessionStore {
    storage: Arc<dyn DurableStorage>,
    state: watch::Sender<Option<Session>>,
}

impl SessionStore {
    /// Build a store and hydrate it from `storage`.
    ///
    /// A token without a readable user (or a user without a token) is
    /// treated as no session and the stale entries are removed. So is a
    /// store that cannot be read at all.
    pub fn hydrate(storage: Arc<dyn DurableStorage>) -> Self {
        let session = Self::load(storage.as_ref());
        let (state, _) = watch::channel(session);
        Self { storage, state }
    }

    fn load(storage: &dyn DurableStorage) -> Option<Session> {
        // Empty values are tombstones left by a purge that could not remove.
        let token = match storage.get(TOKEN_KEY) {
            Ok(token) => token.filter(|t| !t.is_empty()),
            Err(e) => {
                tracing::warn!(error = %e, "failed to read stored token, discarding session");
                Self::purge(storage);
                return None;
            }
        };
        let user = match storage.get(USER_KEY) {
            Ok(user) => user.filter(|u| !u.is_empty()),
            Err(e) => {
                tracing::warn!(error = %e, "failed to read stored user, discarding session");
                Self::purge(storage);
                return None;
            }
        };

        match (token, user) {
            (Some(token), Some(raw_user)) => match serde_json::from_str::<User>(&raw_user) {
                Ok(user) => {
                    tracing::debug!(user_id = %user.id, "restored session from storage");
                    Some(Session { token, user })
                }
                Err(e) => {
                    tracing::warn!(error = %e, "stored user is unreadable, discarding session");
                    Self::purge(storage);
                    None
                }
            },
            (Some(_), None) => {
                tracing::warn!("stored token has no user, discarding session");
                Self::purge(storage);
                None
            }
            (None, Some(_)) => {
                tracing::debug!("removing stored user without token");
                Self::purge(storage);
                None
            }
            (None, None) => None,
        }
    }

    /// Remove both session keys. A key that cannot be removed is
    /// overwritten with an empty tombstone so the next hydrate still sees
    /// no session.
    fn purge(storage: &dyn DurableStorage) {
        for key in [TOKEN_KEY, USER_KEY] {
            let Err(e) = storage.remove(key) else {
                continue;
            };
            tracing::warn!(key, error = %e, "failed to remove stored session entry, writing tombstone");
            if let Err(e) = storage.set(key, "") {
                tracing::error!(key, error = %e, "failed to tombstone stored session entry");
            }
        }
    }

    /// Commit a new session and persist it.
    ///
    /// Storage is written before the in-memory session changes. If
    /// persistence fails, nothing is left behind in either place.
    ///
    /// # Errors
    ///
    /// Returns the storage error if the session could not be persisted.
    pub fn establish(&self, token: impl Into<String>, user: User) -> StorageResult<()> {
        let token = token.into();
        let user_json = serde_json::to_string(&user)?;

        let persisted = self
            .storage
            .set(USER_KEY, &user_json)
            .and_then(|()| self.storage.set(TOKEN_KEY, &token));
        if let Err(e) = persisted {
            tracing::error!(error = %e, "failed to persist session");
            Self::purge(self.storage.as_ref());
            self.state.send_replace(None);
            return Err(e);
        }

        tracing::info!(user_id = %user.id, "session established");
        self.state.send_replace(Some(Session { token, user }));
        Ok(())
    }

    /// Drop the current session and its stored entries.
    ///
    /// Never fails. Entries that cannot be removed are tombstoned.
    pub fn clear(&self) {
        let previous = self.state.send_replace(None);
        Self::purge(self.storage.as_ref());
        if previous.is_some() {
            tracing::info!("session cleared");
        }
    }

    /// Snapshot of the current session.
    pub fn current(&self) -> Option<Session> {
        self.state.borrow().clone()
    }

    /// Current bearer token.
    pub fn token(&self) -> Option<String> {
        self.state.borrow().as_ref().map(|s| s.token.clone())
    }

    /// Current user.
    pub fn user(&self) -> Option<User> {
        self.state.borrow().as_ref().map(|s| s.user.clone())
    }

    /// Returns true while a session exists.
    pub fn is_authenticated(&self) -> bool {
        self.state.borrow().is_some()
    }

    /// Watch session changes.
    pub fn subscribe(&self) -> watch::Receiver<Option<Session>> {
        self.state.subscribe()
    }
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("authenticated", &self.is_authenticated())
            .finish()
    }
}
