//! Custom error types for fitness-backup
//!
//! This module defines the error hierarchy for the backup pipeline using
//! thiserror for ergonomic error definitions.

use thiserror::Error;

use crate::backup::ValidationIssue;

/// The main error type for backup operations
#[derive(Error, Debug)]
pub enum BackupError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// The uploaded document could not be read as a backup at all
    #[error("Parse error: {0}")]
    Parse(String),

    /// Key-value store errors
    #[error("Storage error: {0}")]
    Storage(String),

    /// Document failed validation
    #[error("Invalid backup: {} issue(s)", .issues.len())]
    InvalidBackup { issues: Vec<ValidationIssue> },

    /// Backup format version this build cannot read
    #[error("Unsupported backup version '{found}' (supported: {supported})")]
    UnsupportedVersion { found: String, supported: String },

    /// Writing one domain during a restore failed
    #[error("Failed to restore {domain}: {message}")]
    DomainRestore {
        domain: &'static str,
        message: String,
    },

    /// Entity not found errors
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: &'static str,
        identifier: String,
    },
}

impl BackupError {
    /// Create a "not found" error for backup files and snapshots
    pub fn backup_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Backup",
            identifier: identifier.into(),
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this error was raised before any data was touched
    pub fn is_parse(&self) -> bool {
        matches!(self, Self::Parse(_))
    }
}

impl From<std::io::Error> for BackupError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for BackupError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

/// Result type alias for backup operations
pub type BackupResult<T> = Result<T, BackupError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backup::Severity;

    #[test]
    fn test_error_display() {
        let err = BackupError::Config("test error".into());
        assert_eq!(err.to_string(), "Configuration error: test error");
    }

    #[test]
    fn test_not_found_error() {
        let err = BackupError::backup_not_found("latest");
        assert_eq!(err.to_string(), "Backup not found: latest");
        assert!(err.is_not_found());
    }

    #[test]
    fn test_domain_restore_error() {
        let err = BackupError::DomainRestore {
            domain: "Nutrition data",
            message: "disk full".into(),
        };
        assert_eq!(err.to_string(), "Failed to restore Nutrition data: disk full");
    }

    #[test]
    fn test_invalid_backup_counts_issues() {
        let err = BackupError::InvalidBackup {
            issues: vec![ValidationIssue::new("data", Severity::Error, "missing")],
        };
        assert_eq!(err.to_string(), "Invalid backup: 1 issue(s)");
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: BackupError = io_err.into();
        assert!(matches!(err, BackupError::Io(_)));
    }
}
