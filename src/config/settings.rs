//! User settings and the backup configuration object
//!
//! `Settings` is what gets persisted to `config.json`. `BackupConfig` is the
//! explicit configuration handed to every backup component.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::paths::FitnessPaths;
use crate::error::BackupError;

/// Backup format version this build writes and accepts
pub const BACKUP_FORMAT_VERSION: &str = "1.0";

/// Label used for `createdBy` when the user profile has no name
pub const DEFAULT_AUTHOR: &str = "Fitness App User";

/// Description stamped into exported backups
pub const DEFAULT_DESCRIPTION: &str = "Fitness tracker backup";

/// How a backup whose version differs from ours is treated
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum VersionPolicy {
    /// Any version difference makes the backup invalid
    #[default]
    Strict,
    /// A version difference is reported as a warning only
    Lenient,
}

impl fmt::Display for VersionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VersionPolicy::Strict => write!(f, "strict"),
            VersionPolicy::Lenient => write!(f, "lenient"),
        }
    }
}

/// Configuration injected into the assembler, validator and restore coordinator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackupConfig {
    /// Format version written into new backups and required of imported ones
    pub format_version: String,
    /// Application version, also used as the cache-version marker
    pub app_version: String,
    pub version_policy: VersionPolicy,
    /// `createdBy` fallback
    pub fallback_author: String,
    pub description: String,
}

impl Default for BackupConfig {
    fn default() -> Self {
        Self {
            format_version: BACKUP_FORMAT_VERSION.to_string(),
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            version_policy: VersionPolicy::default(),
            fallback_author: DEFAULT_AUTHOR.to_string(),
            description: DEFAULT_DESCRIPTION.to_string(),
        }
    }
}

impl BackupConfig {
    /// Same config with a different version policy
    pub fn with_version_policy(mut self, policy: VersionPolicy) -> Self {
        self.version_policy = policy;
        self
    }
}

/// User settings for fitness-backup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Treatment of version mismatches on import
    #[serde(default)]
    pub version_policy: VersionPolicy,

    /// Pretty-print exported JSON
    #[serde(default = "default_pretty_export")]
    pub pretty_export: bool,

    /// Where exports go when no `--output` is given
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub export_dir: Option<PathBuf>,

    /// `createdBy` label when the profile has no name
    #[serde(default = "default_author")]
    pub fallback_author: String,
}

fn default_schema_version() -> u32 {
    1
}

fn default_pretty_export() -> bool {
    true
}

fn default_author() -> String {
    DEFAULT_AUTHOR.to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            version_policy: VersionPolicy::default(),
            pretty_export: default_pretty_export(),
            export_dir: None,
            fallback_author: default_author(),
        }
    }
}

impl Settings {
    /// Load settings from disk, or create default settings if file doesn't exist
    pub fn load_or_create(paths: &FitnessPaths) -> Result<Self, BackupError> {
        let settings_path = paths.settings_file();

        if settings_path.exists() {
            let contents = std::fs::read_to_string(&settings_path)
                .map_err(|e| BackupError::Io(format!("Failed to read settings file: {}", e)))?;

            let settings: Settings = serde_json::from_str(&contents).map_err(|e| {
                BackupError::Config(format!("Failed to parse settings file: {}", e))
            })?;

            Ok(settings)
        } else {
            // Don't save yet - let caller decide when to persist
            Ok(Settings::default())
        }
    }

    /// Save settings to disk
    pub fn save(&self, paths: &FitnessPaths) -> Result<(), BackupError> {
        paths.ensure_directories()?;

        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| BackupError::Config(format!("Failed to serialize settings: {}", e)))?;

        std::fs::write(paths.settings_file(), contents)
            .map_err(|e| BackupError::Io(format!("Failed to write settings file: {}", e)))?;

        Ok(())
    }

    /// Directory exports are written to
    pub fn export_dir(&self, paths: &FitnessPaths) -> PathBuf {
        self.export_dir
            .clone()
            .unwrap_or_else(|| paths.export_dir())
    }

    /// Build the configuration object the backup components consume
    pub fn backup_config(&self) -> BackupConfig {
        BackupConfig {
            version_policy: self.version_policy,
            fallback_author: self.fallback_author.clone(),
            ..BackupConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.version_policy, VersionPolicy::Strict);
        assert!(settings.pretty_export);
        assert_eq!(settings.fallback_author, DEFAULT_AUTHOR);
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let paths = FitnessPaths::with_base_dir(temp_dir.path().to_path_buf());

        let mut settings = Settings::default();
        settings.version_policy = VersionPolicy::Lenient;
        settings.pretty_export = false;

        settings.save(&paths).unwrap();

        let loaded = Settings::load_or_create(&paths).unwrap();
        assert_eq!(loaded.version_policy, VersionPolicy::Lenient);
        assert!(!loaded.pretty_export);
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let settings: Settings = serde_json::from_str(r#"{"version_policy":"lenient"}"#).unwrap();
        assert_eq!(settings.version_policy, VersionPolicy::Lenient);
        assert!(settings.pretty_export);
        assert_eq!(settings.schema_version, 1);
    }

    #[test]
    fn test_backup_config_from_settings() {
        let settings = Settings {
            fallback_author: "Coach".into(),
            version_policy: VersionPolicy::Lenient,
            ..Settings::default()
        };

        let config = settings.backup_config();
        assert_eq!(config.fallback_author, "Coach");
        assert_eq!(config.version_policy, VersionPolicy::Lenient);
        assert_eq!(config.format_version, BACKUP_FORMAT_VERSION);
    }
}
