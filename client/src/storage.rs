//! Key-value persistence for the session.
//!
//! The session keeps three plain string entries (`token`, `userId`,
//! `username`). [`FileStorage`] keeps them in a JSON object on disk;
//! [`MemoryStorage`] is used by tests.

use crate::error::{ClientError, Result};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

/// Storage key of the bearer token
pub const TOKEN_KEY: &str = "token";
/// Storage key of the user id
pub const USER_ID_KEY: &str = "userId";
/// Storage key of the display name
pub const USERNAME_KEY: &str = "username";

/// Synchronous string key-value store
///
/// Reads happen once at startup; writes run inside session effects.
pub trait SessionStorage: Send + Sync {
    /// Read a value
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Storage`] if the backend cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Write a value
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Storage`] if the backend cannot be written.
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Delete every value
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Storage`] if the backend cannot be written.
    fn clear(&self) -> Result<()>;
}

/// In-memory storage
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: Arc<Mutex<BTreeMap<String, String>>>,
}

impl MemoryStorage {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Whether nothing is stored
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl SessionStorage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self
            .entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
        Ok(())
    }
}

/// JSON-file storage
///
/// The whole object is rewritten on every change; the cache is loaded once.
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    cache: Mutex<BTreeMap<String, String>>,
}

impl FileStorage {
    /// Open (or lazily create) the storage file at `path`
    ///
    /// A missing file is an empty store.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Storage`] if the file exists but cannot be read,
    /// or [`ClientError::Decode`] if it is not a JSON object of strings.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let cache = match std::fs::read_to_string(&path) {
            Ok(contents) if contents.trim().is_empty() => BTreeMap::new(),
            Ok(contents) => serde_json::from_str(&contents)?,
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(error) => return Err(error.into()),
        };

        tracing::debug!(path = %path.display(), entries = cache.len(), "Opened session storage");

        Ok(Self {
            path,
            cache: Mutex::new(cache),
        })
    }

    /// Location of the storage file
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn update<F>(&self, change: F) -> Result<()>
    where
        F: FnOnce(&mut BTreeMap<String, String>),
    {
        let mut cache = self.cache.lock().unwrap_or_else(PoisonError::into_inner);
        change(&mut cache);

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(&*cache)
            .map_err(|e| ClientError::Storage(e.to_string()))?;
        std::fs::write(&self.path, contents)?;
        Ok(())
    }
}

impl SessionStorage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self
            .cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.update(|cache| {
            cache.insert(key.to_string(), value.to_string());
        })
    }

    fn clear(&self) -> Result<()> {
        self.update(BTreeMap::clear)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn memory_storage_round_trip() {
        let storage = MemoryStorage::new();
        storage.set(TOKEN_KEY, "t").unwrap();
        assert_eq!(storage.get(TOKEN_KEY).unwrap().as_deref(), Some("t"));
        assert_eq!(storage.get(USER_ID_KEY).unwrap(), None);

        storage.clear().unwrap();
        assert!(storage.is_empty());
    }

    #[test]
    fn clones_share_entries() {
        let storage = MemoryStorage::new();
        let other = storage.clone();
        storage.set(USER_ID_KEY, "u1").unwrap();
        assert_eq!(other.get(USER_ID_KEY).unwrap().as_deref(), Some("u1"));

        other.clear().unwrap();
        assert!(storage.is_empty());
    }
}
