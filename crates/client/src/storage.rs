//! Persistent session storage.
//!
//! The session token and a JSON snapshot of the logged-in user are stored
//! under [`TOKEN_KEY`] and [`USER_KEY`]. Storage is synchronous; callers never
//! hold a storage lock across an `.await`.

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::error::StorageError;

/// Key of the bearer token.
pub const TOKEN_KEY: &str = "cms_jwt";

/// Key of the cached user (JSON).
pub const USER_KEY: &str = "cms_user";

/// Key-value store for session data.
pub trait SessionStorage: Send + Sync {
    /// Read a value.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backing store cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Write a value.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backing store cannot be written.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete a value. Removing a missing key is not an error.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backing store cannot be written.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// In-process storage, for tests and embedding.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: Mutex<BTreeMap<String, String>>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStorage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(lock(&self.entries).get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        lock(&self.entries).insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        lock(&self.entries).remove(key);
        Ok(())
    }
}

/// Storage backed by a JSON object in a file.
///
/// A missing file reads as empty. Every write rewrites the whole file.
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    guard: Mutex<()>,
}

impl FileStorage {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            guard: Mutex::new(()),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> Result<BTreeMap<String, String>, StorageError> {
        match fs::read_to_string(&self.path) {
            Ok(contents) if contents.trim().is_empty() => Ok(BTreeMap::new()),
            Ok(contents) => Ok(serde_json::from_str(&contents)?),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&self, entries: &BTreeMap<String, String>) -> Result<(), StorageError> {
        if entries.is_empty() {
            return match fs::remove_file(&self.path) {
                Err(e) if e.kind() != ErrorKind::NotFound => Err(e.into()),
                _ => Ok(()),
            };
        }
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, serde_json::to_vec_pretty(entries)?)?;
        Ok(())
    }
}

impl SessionStorage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let _guard = lock(&self.guard);
        Ok(self.read()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let _guard = lock(&self.guard);
        let mut entries = self.read()?;
        entries.insert(key.to_owned(), value.to_owned());
        self.write(&entries)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let _guard = lock(&self.guard);
        // A corrupted file is replaced rather than blocking logout.
        let mut entries = self.read().unwrap_or_default();
        entries.remove(key);
        self.write(&entries)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn temp_path() -> PathBuf {
        std::env::temp_dir().join(format!("cms-session-{}.json", uuid::Uuid::new_v4()))
    }

    #[test]
    fn test_memory_storage() {
        let storage = MemoryStorage::new();
        assert!(storage.get(TOKEN_KEY).unwrap().is_none());

        storage.set(TOKEN_KEY, "abc").unwrap();
        assert_eq!(storage.get(TOKEN_KEY).unwrap().as_deref(), Some("abc"));

        storage.remove(TOKEN_KEY).unwrap();
        storage.remove(TOKEN_KEY).unwrap();
        assert!(storage.get(TOKEN_KEY).unwrap().is_none());
    }

    #[test]
    fn test_file_storage_persists_across_instances() {
        let path = temp_path();
        FileStorage::new(&path).set(TOKEN_KEY, "abc").unwrap();
        FileStorage::new(&path).set(USER_KEY, "{}").unwrap();

        let reopened = FileStorage::new(&path);
        assert_eq!(reopened.get(TOKEN_KEY).unwrap().as_deref(), Some("abc"));
        assert_eq!(reopened.get(USER_KEY).unwrap().as_deref(), Some("{}"));

        reopened.remove(TOKEN_KEY).unwrap();
        reopened.remove(USER_KEY).unwrap();
        assert!(!path.exists());
    }

    #[test]
    fn test_file_storage_missing_file_is_empty() {
        let storage = FileStorage::new(temp_path());
        assert!(storage.get(TOKEN_KEY).unwrap().is_none());
        storage.remove(TOKEN_KEY).unwrap();
    }

    #[test]
    fn test_file_storage_corrupted_file() {
        let path = temp_path();
        fs::write(&path, "not json").unwrap();
        let storage = FileStorage::new(&path);

        assert!(matches!(storage.get(TOKEN_KEY), Err(StorageError::Corrupted(_))));

        storage.remove(USER_KEY).unwrap();
        assert!(storage.get(TOKEN_KEY).unwrap().is_none());
    }
}
