//! In-memory key-value store

use std::collections::HashMap;
use std::sync::RwLock;

use crate::error::{BackupError, BackupResult};

use super::KeyValueStore;

/// Key-value store backed by a `HashMap`
#[derive(Debug, Default)]
pub struct MemoryStore {
    data: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with the given entries
    pub fn with_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let data = entries
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        Self {
            data: RwLock::new(data),
        }
    }

    /// Check whether a key has been written
    pub fn contains_key(&self, key: &str) -> bool {
        self.data
            .read()
            .map(|data| data.contains_key(key))
            .unwrap_or(false)
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> BackupResult<Option<String>> {
        let data = self
            .data
            .read()
            .map_err(|e| BackupError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(data.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> BackupResult<()> {
        let mut data = self
            .data
            .write()
            .map_err(|e| BackupError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        data.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_missing_key() {
        let store = MemoryStore::new();
        assert!(store.get("workoutState").unwrap().is_none());
        assert!(!store.contains_key("workoutState"));
    }

    #[test]
    fn test_set_then_get() {
        let store = MemoryStore::new();
        store.set("workoutState", "{}").unwrap();
        store.set("workoutState", r#"{"exercises":[]}"#).unwrap();

        assert_eq!(
            store.get("workoutState").unwrap().as_deref(),
            Some(r#"{"exercises":[]}"#)
        );
    }

    #[test]
    fn test_with_entries() {
        let store = MemoryStore::with_entries([("a", "1"), ("b", "2")]);
        assert_eq!(store.get("b").unwrap().as_deref(), Some("2"));
        assert!(store.contains_key("a"));
    }
}
