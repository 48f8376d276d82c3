//! File-backed key/value storage.
//!
//! Each key is stored as `<data_dir>/<key>.json`. Writes go to a temporary
//! sibling file that is renamed over the target, so a crash mid-write leaves
//! the previous value intact.

use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use mercato_core::persistence::{StorageBackend, StorageError};
use tracing::debug;

/// [`StorageBackend`] over a directory of JSON files.
#[derive(Debug, Clone)]
pub struct FileStorage {
    base_path: PathBuf,
}

impl FileStorage {
    /// Storage rooted at `base_path`. The directory is created on first write.
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    #[must_use]
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    fn key_path(&self, key: &str) -> Result<PathBuf, StorageError> {
        validate_key(key)?;
        Ok(self.base_path.join(format!("{key}.json")))
    }
}

/// Reject keys that would escape the data directory.
fn validate_key(key: &str) -> Result<(), StorageError> {
    if key.is_empty() {
        return Err(StorageError::Unavailable(
            "storage key cannot be empty".to_string(),
        ));
    }
    if key.contains('/')
        || key.contains('\\')
        || key.contains("..")
        || key.chars().any(char::is_control)
    {
        return Err(StorageError::Unavailable(format!(
            "storage key contains invalid characters: {key:?}"
        )));
    }
    Ok(())
}

impl StorageBackend for FileStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.key_path(key)?;
        match std::fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StorageError::Io(e)),
        }
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.key_path(key)?;
        std::fs::create_dir_all(&self.base_path)?;

        let tmp_path = self
            .base_path
            .join(format!(".{key}.{}.tmp", uuid::Uuid::new_v4().simple()));

        let write_result = (|| {
            let mut file = std::fs::File::create(&tmp_path)?;
            file.write_all(value.as_bytes())?;
            file.sync_all()?;
            drop(file);
            std::fs::rename(&tmp_path, &path)
        })();

        if let Err(e) = write_result {
            let _ = std::fs::remove_file(&tmp_path);
            return Err(StorageError::Io(e));
        }

        debug!(key, path = %path.display(), bytes = value.len(), "Wrote storage file");
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        let path = self.key_path(key)?;
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::Io(e)),
        }
    }
}
