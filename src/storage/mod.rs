//! Durable key/value storage for session persistence.
//!
//! The session store persists its state through a [`DurableStorage`]. Values
//! are plain strings stored under fixed keys ([`TOKEN_KEY`], [`USER_KEY`]).

pub mod file;
pub mod memory;

pub use file::FileStorage;
pub use memory::MemoryStorage;

use std::io;

use thiserror::Error;

/// Storage key holding the bearer token.
pub const TOKEN_KEY: &str = "token";

/// Storage key holding the JSON-encoded user profile.
pub const USER_KEY: &str = "user";

/// Errors that can occur during storage operations.
#[derive(Error, Debug)]
pub enum StorageError {
    /// IO error during file operations.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// The storage file could not be encoded or decoded.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// A string key/value store that survives process restarts.
pub trait DurableStorage: Send + Sync {
    /// Reads the value stored under `key`.
    fn get(&self, key: &str) -> StorageResult<Option<String>>;

    /// Stores `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> StorageResult<()>;

    /// Removes `key`. Removing a missing key is not an error.
    fn remove(&self, key: &str) -> StorageResult<()>;
}
