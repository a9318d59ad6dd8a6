//! File-backed key-value store: one JSON file per key.

use std::fs;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

use tracing::debug;

use crate::StorageError;
use crate::store::KeyValueStore;

/// Durable store rooted at a directory.
///
/// Each key is written to `<dir>/<key>.json`. Writes go through a temporary
/// file and a rename so a crash never leaves a half-written value behind.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Create a store in the platform data directory (`<data_dir>/dalil`).
    pub fn new() -> Result<Self, StorageError> {
        let base_dir = dirs::data_dir().ok_or(StorageError::DirResolutionFailed)?;
        Ok(Self {
            dir: base_dir.join("dalil"),
        })
    }

    /// Create a store rooted at a specific directory.
    pub fn with_dir(path: impl Into<PathBuf>) -> Self {
        Self { dir: path.into() }
    }

    /// Directory holding the stored values.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        // The key must be a single normal path component.
        let path = Path::new(key);
        let mut components = path.components();
        let safe = match (components.next(), components.next()) {
            (Some(Component::Normal(c)), None) => c == key,
            _ => false,
        };

        if !safe {
            return Err(StorageError::invalid_key(key));
        }

        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        fs::create_dir_all(&self.dir)?;

        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value)?;
        fs::rename(&tmp, &path)?;

        debug!("Wrote {} bytes to {}", value.len(), path.display());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
