//! Path management for fitness-backup
//!
//! Provides XDG-compliant path resolution for settings, the store directory,
//! and exported backups.
//!
//! ## Path Resolution Order
//!
//! 1. `FITNESS_BACKUP_DIR` environment variable (if set)
//! 2. Unix (Linux/macOS): `$XDG_CONFIG_HOME/fitness-backup` or `~/.config/fitness-backup`
//! 3. Windows: `%APPDATA%\fitness-backup`

use std::path::PathBuf;

use crate::error::BackupError;

/// Environment variable overriding the base directory
pub const BASE_DIR_ENV: &str = "FITNESS_BACKUP_DIR";

/// Manages all paths used by fitness-backup
#[derive(Debug, Clone)]
pub struct FitnessPaths {
    /// Base directory for all data
    base_dir: PathBuf,
}

impl FitnessPaths {
    /// Create a new FitnessPaths instance
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory cannot be determined.
    pub fn new() -> Result<Self, BackupError> {
        let base_dir = if let Ok(custom) = std::env::var(BASE_DIR_ENV) {
            PathBuf::from(custom)
        } else {
            resolve_default_path()?
        };

        Ok(Self { base_dir })
    }

    /// Create FitnessPaths with a custom base directory (useful for testing)
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    /// Get the base directory
    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// Directory holding one file per storage key
    pub fn store_dir(&self) -> PathBuf {
        self.base_dir.join("store")
    }

    /// Default directory for exported backup files
    pub fn export_dir(&self) -> PathBuf {
        self.base_dir.join("backups")
    }

    /// Get the path to the settings file
    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    /// Ensure all required directories exist
    pub fn ensure_directories(&self) -> Result<(), BackupError> {
        std::fs::create_dir_all(&self.base_dir)
            .map_err(|e| BackupError::Io(format!("Failed to create base directory: {}", e)))?;

        std::fs::create_dir_all(self.store_dir())
            .map_err(|e| BackupError::Io(format!("Failed to create store directory: {}", e)))?;

        std::fs::create_dir_all(self.export_dir())
            .map_err(|e| BackupError::Io(format!("Failed to create export directory: {}", e)))?;

        Ok(())
    }
}

/// Resolve the default data directory path based on platform
#[cfg(not(windows))]
fn resolve_default_path() -> Result<PathBuf, BackupError> {
    let config_base = match std::env::var("XDG_CONFIG_HOME") {
        Ok(xdg) => PathBuf::from(xdg),
        Err(_) => {
            let home = std::env::var("HOME")
                .map_err(|_| BackupError::Config("HOME environment variable not set".into()))?;
            PathBuf::from(home).join(".config")
        }
    };
    Ok(config_base.join("fitness-backup"))
}

/// Resolve the default data directory path based on platform
#[cfg(windows)]
fn resolve_default_path() -> Result<PathBuf, BackupError> {
    let appdata = std::env::var("APPDATA")
        .map_err(|_| BackupError::Config("Could not determine APPDATA directory".into()))?;
    Ok(PathBuf::from(appdata).join("fitness-backup"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_custom_base_dir() {
        let temp_dir = TempDir::new().unwrap();
        let paths = FitnessPaths::with_base_dir(temp_dir.path().to_path_buf());

        assert_eq!(paths.base_dir(), temp_dir.path());
        assert_eq!(paths.store_dir(), temp_dir.path().join("store"));
        assert_eq!(paths.export_dir(), temp_dir.path().join("backups"));
        assert_eq!(paths.settings_file(), temp_dir.path().join("config.json"));
    }

    #[test]
    fn test_ensure_directories() {
        let temp_dir = TempDir::new().unwrap();
        let paths = FitnessPaths::with_base_dir(temp_dir.path().join("nested"));

        paths.ensure_directories().unwrap();

        assert!(paths.store_dir().exists());
        assert!(paths.export_dir().exists());
    }
}
