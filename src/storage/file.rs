//! File-backed durable storage.
//!
//! All keys live in a single JSON object on disk. Writes go to a temporary
//! file that is then renamed over the original so an interrupted write never
//! leaves a truncated store behind.

use std::collections::BTreeMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use super::{DurableStorage, StorageError, StorageResult};

/// Default name for the storage file.
const STORAGE_FILE_NAME: &str = "storage.json";

type Entries = BTreeMap<String, String>;

/// Durable storage persisted as a JSON file.
#[derive(Debug)]
pub struct FileStorage {
    /// Path to the storage file.
    path: PathBuf,
    /// Serializes read-modify-write cycles within this process.
    lock: Mutex<()>,
}

impl FileStorage {
    /// Create a new `FileStorage` inside `dir`.
    ///
    /// Creates the directory if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn new(dir: impl Into<PathBuf>) -> StorageResult<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;

        Ok(Self {
            path: dir.join(STORAGE_FILE_NAME),
            lock: Mutex::new(()),
        })
    }

    /// Path to the storage file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_entries(&self) -> StorageResult<Entries> {
        match fs::read_to_string(&self.path) {
            Ok(content) if content.trim().is_empty() => Ok(Entries::new()),
            Ok(content) => Ok(serde_json::from_str(&content)?),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Entries::new()),
            Err(e) => Err(StorageError::Io(e)),
        }
    }

    fn write_entries(&self, entries: &Entries) -> StorageResult<()> {
        let json = serde_json::to_string_pretty(entries)?;

        // Same directory so the rename stays on one filesystem
        let temp_path = self.path.with_extension("json.tmp");

        let mut file = fs::File::create(&temp_path)?;
        file.write_all(json.as_bytes())?;
        file.sync_all()?;

        fs::rename(&temp_path, &self.path)?;

        Ok(())
    }

    /// Read-modify-write under the lock.
    ///
    /// An undecodable file is replaced rather than left to fail every later
    /// write; its contents are lost.
    fn update(&self, apply: impl FnOnce(&mut Entries) -> bool) -> StorageResult<()> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        let (mut entries, reset) = match self.read_entries() {
            Ok(entries) => (entries, false),
            Err(StorageError::Json(e)) => {
                tracing::warn!(path = %self.path.display(), error = %e, "storage file is corrupt, resetting");
                (Entries::new(), true)
            }
            Err(e) => return Err(e),
        };
        if apply(&mut entries) || reset {
            self.write_entries(&entries)?;
        }
        Ok(())
    }
}

impl DurableStorage for FileStorage {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(self.read_entries()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        self.update(|entries| {
            entries.insert(key.to_string(), value.to_string());
            true
        })
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        self.update(|entries| entries.remove(key).is_some())
    }
}
