//! Key-value storage layer
//!
//! The planner keeps its state in a flat key-value store. The backup pipeline
//! only ever needs `get` and `set`, so the store is a trait with two
//! implementations: an in-memory map and a directory with one file per key.

pub mod file_io;
mod file_store;
mod memory;

pub use file_io::{read_string_opt, write_string_atomic};
pub use file_store::FileStore;
pub use memory::MemoryStore;

use crate::error::BackupResult;

/// Live workout domain store
pub const WORKOUT_STATE_KEY: &str = "workoutState";
/// Live nutrition domain store
pub const NUTRITION_STATE_KEY: &str = "nutritionState";
/// Live gamification domain store
pub const GAMIFICATION_STATE_KEY: &str = "gamificationState";
/// Copy of the current stores taken right before a restore, overwritten each time
pub const SAFETY_SNAPSHOT_KEY: &str = "fitness-backup-before-restore";
/// Cache-busting marker read by the host's cache invalidation
pub const APP_VERSION_KEY: &str = "app_version";
/// Timestamp of the last successful export
pub const LAST_BACKUP_TIME_KEY: &str = "lastBackupTime";

/// Minimal string key-value store
///
/// Each `set` is a single atomic write of one key.
pub trait KeyValueStore {
    /// Read a key, `None` if it was never written
    fn get(&self, key: &str) -> BackupResult<Option<String>>;

    /// Write a key, replacing any previous value
    fn set(&self, key: &str, value: &str) -> BackupResult<()>;
}
