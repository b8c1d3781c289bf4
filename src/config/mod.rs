//! Configuration module for fitness-backup
//!
//! This module provides configuration management including:
//! - XDG-compliant path resolution
//! - User settings persistence
//! - The `BackupConfig` object injected into the backup components

pub mod paths;
pub mod settings;

pub use paths::FitnessPaths;
pub use settings::{BackupConfig, Settings, VersionPolicy, BACKUP_FORMAT_VERSION};
