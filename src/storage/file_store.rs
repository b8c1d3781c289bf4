//! Directory-backed key-value store
//!
//! Each key is one file in the store directory, written atomically.

use std::path::PathBuf;

use crate::error::{BackupError, BackupResult};

use super::file_io::{read_string_opt, write_string_atomic};
use super::KeyValueStore;

/// Key-value store keeping one file per key
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Create a store rooted at `dir`; the directory is created on first write
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Directory holding the key files
    pub fn dir(&self) -> &PathBuf {
        &self.dir
    }

    fn key_path(&self, key: &str) -> BackupResult<PathBuf> {
        let invalid = key.is_empty()
            || key == "."
            || key.contains("..")
            || key.contains('/')
            || key.contains('\\')
            || key.ends_with(".tmp");
        if invalid {
            return Err(BackupError::Storage(format!("Invalid storage key: {:?}", key)));
        }
        Ok(self.dir.join(key))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> BackupResult<Option<String>> {
        read_string_opt(self.key_path(key)?)
    }

    fn set(&self, key: &str, value: &str) -> BackupResult<()> {
        write_string_atomic(self.key_path(key)?, value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_round_trip_through_files() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileStore::new(temp_dir.path().join("store"));

        assert!(store.get("nutritionState").unwrap().is_none());

        store.set("nutritionState", r#"{"foodItems":[]}"#).unwrap();

        assert!(temp_dir.path().join("store").join("nutritionState").exists());
        assert_eq!(
            store.get("nutritionState").unwrap().as_deref(),
            Some(r#"{"foodItems":[]}"#)
        );
    }

    #[test]
    fn test_rejects_path_like_keys() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileStore::new(temp_dir.path());

        assert!(store.set("../escape", "x").is_err());
        assert!(store.set("a/b", "x").is_err());
        assert!(store.get("").is_err());
    }

    #[test]
    fn test_fixed_keys_are_accepted() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileStore::new(temp_dir.path());

        store.set("fitness-backup-before-restore", "{}").unwrap();
        store.set("app_version", "0.1.0").unwrap();
        assert_eq!(store.get("app_version").unwrap().as_deref(), Some("0.1.0"));
    }
}
