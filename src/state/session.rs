//! Session identity and the key/value storage it persists into.
//!
//! DESIGN
//! ======
//! The session id correlates every exchange from one installation. It is
//! generated once (`session-<uuid v4>`), written to a [`KeyValueStore`], and
//! read back on every later start. Storage is injected so the provider can be
//! exercised against an in-memory map in tests.
//!
//! ERROR HANDLING
//! ==============
//! Storage failures never reach the caller. A failed read or write is logged
//! and the provider keeps the generated id in memory for the rest of the
//! process, so the conversation still works; it just won't survive a restart.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use std::collections::{BTreeMap, HashMap};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, OnceLock, PoisonError};

use uuid::Uuid;

/// Storage key holding the session id.
pub const SESSION_KEY: &str = "accounting_chat_session_id";

const SESSION_PREFIX: &str = "session-";
const STORE_FILE_NAME: &str = "session.json";

// =============================================================================
// STORAGE
// =============================================================================

/// Errors produced by persistent storage backends.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// Reading or writing the backing file failed.
    #[error("storage io failed: {0}")]
    Io(#[from] std::io::Error),

    /// The backing file exists but is not a JSON object of strings.
    #[error("storage file is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// Minimal string key/value persistence, the native stand-in for browser
/// local storage.
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the backend cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the backend cannot be written.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for Arc<T> {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for Box<T> {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }
}

/// Process-lifetime store. Used when no state directory is available.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.insert(key.to_owned(), value.to_owned());
        Ok(())
    }
}

/// JSON object file (`session.json`) inside a state directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    /// Store rooted at `dir`. The directory is created on first write.
    #[must_use]
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self { path: dir.as_ref().join(STORE_FILE_NAME) }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>, StorageError> {
        match std::fs::read_to_string(&self.path) {
            Ok(text) if text.trim().is_empty() => Ok(BTreeMap::new()),
            Ok(text) => Ok(serde_json::from_str(&text)?),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(e.into()),
        }
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.read_all()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        // An unreadable document is replaced rather than left to fail every write.
        let mut entries = match self.read_all() {
            Ok(entries) => entries,
            Err(StorageError::Corrupt(e)) => {
                tracing::warn!(path = %self.path.display(), error = %e, "replacing corrupt store file");
                BTreeMap::new()
            }
            Err(e) => return Err(e),
        };
        entries.insert(key.to_owned(), value.to_owned());
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let rendered = serde_json::to_string_pretty(&entries)?;
        std::fs::write(&self.path, rendered)?;
        Ok(())
    }
}

// =============================================================================
// SESSION IDENTITY
// =============================================================================

/// Lazily resolves the session id on first access and caches it.
pub struct SessionIdentity<S> {
    store: S,
    cached: OnceLock<String>,
}

impl<S: KeyValueStore> SessionIdentity<S> {
    #[must_use]
    pub fn new(store: S) -> Self {
        Self { store, cached: OnceLock::new() }
    }

    /// Return the persisted session id, creating and persisting one if absent.
    pub fn get_or_create_session_id(&self) -> String {
        self.cached.get_or_init(|| self.resolve()).clone()
    }

    fn resolve(&self) -> String {
        match self.store.get(SESSION_KEY) {
            Ok(Some(existing)) if !existing.trim().is_empty() => return existing,
            Ok(_) => {}
            Err(e) => {
                tracing::warn!(error = %e, "session storage unreadable; using in-memory session");
            }
        }

        let session_id = new_session_id();
        match self.store.set(SESSION_KEY, &session_id) {
            Ok(()) => tracing::info!(%session_id, "created chat session"),
            Err(e) => {
                tracing::warn!(error = %e, %session_id, "session storage unwritable; session will not persist");
            }
        }
        session_id
    }
}

/// Fresh namespaced session id backed by a random (v4) UUID.
#[must_use]
pub fn new_session_id() -> String {
    format!("{SESSION_PREFIX}{}", Uuid::new_v4())
}
