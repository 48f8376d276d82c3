//! Scoped persistence port.
//!
//! A [`StorageBackend`] is a flat string key/value store (a browser's
//! `localStorage`, a directory of files, a map in memory). A
//! [`ScopedPersistence`] owns one key in that store and reads and writes a
//! whole collection under it as a single JSON record:
//!
//! ```json
//! {"state":{"items":[...]},"version":0}
//! ```
//!
//! Loading is forgiving: a missing key, an unreadable backend or a corrupt
//! record all come back as an empty collection, with a warning logged.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

/// Record format version written alongside the items.
pub const STORAGE_VERSION: u32 = 0;

/// Errors raised by a [`StorageBackend`].
#[derive(Debug, Error)]
pub enum StorageError {
    /// Filesystem or OS-level failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The backend refused the write because it is full.
    #[error("Storage quota exceeded: {needed} bytes needed, {limit} allowed")]
    QuotaExceeded {
        /// Bytes the store would hold after the write.
        needed: usize,
        /// Configured byte limit.
        limit: usize,
    },

    /// The backend cannot be used at all.
    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

/// Errors raised while saving a collection.
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("Serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Flat string key/value storage.
pub trait StorageBackend {
    /// Read the value stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the backend cannot be read.
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the write fails.
    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete `key`. Deleting an absent key succeeds.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the delete fails.
    fn remove_item(&self, key: &str) -> Result<(), StorageError>;
}

impl<B: StorageBackend + ?Sized> StorageBackend for &B {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get_item(key)
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set_item(key, value)
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        (**self).remove_item(key)
    }
}

impl<B: StorageBackend + ?Sized> StorageBackend for Arc<B> {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get_item(key)
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set_item(key, value)
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        (**self).remove_item(key)
    }
}

/// In-memory backend. Clones share the same map, so a store rebuilt over a
/// clone sees everything the previous store wrote.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: Arc<Mutex<HashMap<String, String>>>,
    quota: Option<usize>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Backend that rejects writes once total stored bytes would exceed
    /// `limit`.
    #[must_use]
    pub fn with_quota(limit: usize) -> Self {
        Self {
            entries: Arc::default(),
            quota: Some(limit),
        }
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, String>>, StorageError> {
        self.entries
            .lock()
            .map_err(|_| StorageError::Unavailable("memory storage lock poisoned".to_string()))
    }
}

impl StorageBackend for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut entries = self.lock()?;
        if let Some(limit) = self.quota {
            let others: usize = entries
                .iter()
                .filter(|(k, _)| k.as_str() != key)
                .map(|(k, v)| k.len() + v.len())
                .sum();
            let needed = others + key.len() + value.len();
            if needed > limit {
                return Err(StorageError::QuotaExceeded { needed, limit });
            }
        }
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        self.lock()?.remove(key);
        Ok(())
    }
}

/// Load/save contract for one persisted collection.
pub trait PersistencePort<T> {
    /// Restore the collection. Never fails; unreadable data is empty.
    fn load(&self) -> Vec<T>;

    /// Persist the full collection.
    ///
    /// # Errors
    ///
    /// Returns a [`PersistenceError`] if the collection could not be written.
    fn save(&self, items: &[T]) -> Result<(), PersistenceError>;
}

#[derive(Serialize)]
struct ItemsRef<'a, T> {
    items: &'a [T],
}

#[derive(Serialize)]
struct RecordRef<'a, T> {
    state: ItemsRef<'a, T>,
    version: u32,
}

#[derive(Deserialize)]
struct Items<T> {
    items: Vec<T>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StoredRecord<T> {
    Envelope {
        state: Items<T>,
        #[serde(default)]
        version: u32,
    },
    Bare(Items<T>),
}

/// A [`PersistencePort`] bound to a single key of a [`StorageBackend`].
#[derive(Debug, Clone)]
pub struct ScopedPersistence<B> {
    backend: B,
    key: String,
}

impl<B: StorageBackend> ScopedPersistence<B> {
    pub fn new(backend: B, key: impl Into<String>) -> Self {
        Self {
            backend,
            key: key.into(),
        }
    }

    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    #[must_use]
    pub const fn backend(&self) -> &B {
        &self.backend
    }

    /// Delete the stored record.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the backend delete fails.
    pub fn purge(&self) -> Result<(), StorageError> {
        self.backend.remove_item(&self.key)
    }
}

impl<T, B> PersistencePort<T> for ScopedPersistence<B>
where
    T: Serialize + DeserializeOwned,
    B: StorageBackend,
{
    fn load(&self) -> Vec<T> {
        let raw = match self.backend.get_item(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                warn!(key = %self.key, error = %e, "Storage unreadable, starting empty");
                return Vec::new();
            }
        };

        match serde_json::from_str::<StoredRecord<T>>(&raw) {
            Ok(StoredRecord::Envelope { state, version }) => {
                if version != STORAGE_VERSION {
                    debug!(key = %self.key, version, "Loaded record from another version");
                }
                state.items
            }
            Ok(StoredRecord::Bare(items)) => items.items,
            Err(e) => {
                warn!(key = %self.key, error = %e, "Stored record is corrupt, starting empty");
                Vec::new()
            }
        }
    }

    fn save(&self, items: &[T]) -> Result<(), PersistenceError> {
        let record = RecordRef {
            state: ItemsRef { items },
            version: STORAGE_VERSION,
        };
        let raw = serde_json::to_string(&record)?;
        self.backend.set_item(&self.key, &raw)?;
        Ok(())
    }
}
