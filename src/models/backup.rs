//! Backup document format
//!
//! A backup is `{ metadata, data: { workout?, nutrition?, gamification? } }`
//! serialized with camelCase keys. Once assembled it is never mutated.

use chrono::{DateTime, Utc};
use log::warn;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::{BackupConfig, VersionPolicy, BACKUP_FORMAT_VERSION};
use crate::error::{BackupError, BackupResult};

use super::domain::{Domain, DomainState};

/// Descriptive header of a backup
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Metadata {
    /// Backup format version
    pub version: String,
    /// Version of the application that produced the backup
    pub app_version: String,
    pub created_at: DateTime<Utc>,
    pub created_by: String,
    pub description: String,
}

/// The three domain snapshots; absent domains are simply not restored
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BackupData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workout: Option<DomainState>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nutrition: Option<DomainState>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gamification: Option<DomainState>,
}

impl BackupData {
    /// Snapshot of one domain, if present
    pub fn domain(&self, domain: Domain) -> Option<&DomainState> {
        match domain {
            Domain::Workout => self.workout.as_ref(),
            Domain::Nutrition => self.nutrition.as_ref(),
            Domain::Gamification => self.gamification.as_ref(),
        }
    }

    /// Whether the backup carries data for this domain
    pub fn has(&self, domain: Domain) -> bool {
        self.domain(domain).is_some()
    }
}

/// A complete backup document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Backup {
    #[serde(default)]
    pub metadata: Metadata,
    pub data: BackupData,
}

impl Backup {
    /// Serialize to JSON text
    pub fn to_json(&self, pretty: bool) -> BackupResult<String> {
        let json = if pretty {
            serde_json::to_string_pretty(self)
        } else {
            serde_json::to_string(self)
        };
        json.map_err(|e| BackupError::Json(format!("Failed to serialize backup: {}", e)))
    }

    /// Serialize to an untyped JSON value, the shape the validator consumes
    pub fn to_value(&self) -> BackupResult<Value> {
        serde_json::to_value(self)
            .map_err(|e| BackupError::Json(format!("Failed to serialize backup: {}", e)))
    }
}

/// Backup formats this build can read
///
/// New formats become new variants with an upgrade path in `into_backup`.
#[derive(Debug, Clone, PartialEq)]
pub enum VersionedBackup {
    V1(Backup),
}

impl VersionedBackup {
    /// Read the version tag of an untyped document and decode it
    ///
    /// Under a lenient policy an unknown version is decoded as the current
    /// format on a best-effort basis.
    pub fn from_value(value: Value, config: &BackupConfig) -> BackupResult<Self> {
        let version = value
            .get("metadata")
            .and_then(|m| m.get("version"))
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();

        let known = version == config.format_version || version == BACKUP_FORMAT_VERSION;
        if !known {
            if config.version_policy == VersionPolicy::Strict {
                return Err(BackupError::UnsupportedVersion {
                    found: version,
                    supported: config.format_version.clone(),
                });
            }
            warn!(
                "Reading backup version '{}' as format {}",
                version, config.format_version
            );
        }

        let backup: Backup = serde_json::from_value(value)
            .map_err(|e| BackupError::Parse(format!("Backup does not match format: {}", e)))?;
        Ok(Self::V1(backup))
    }

    /// The document in the current format
    pub fn into_backup(self) -> Backup {
        match self {
            Self::V1(backup) => backup,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Value {
        json!({
            "metadata": {
                "version": "1.0",
                "appVersion": "2.3.0",
                "createdAt": "2024-05-01T10:00:00.000Z",
                "createdBy": "Sam",
                "description": "Fitness tracker backup"
            },
            "data": {
                "workout": { "exercises": [{ "id": "e1", "name": "Squat" }] },
                "gamification": { "userPoints": 10, "theme": "dark" }
            }
        })
    }

    #[test]
    fn test_decode_current_version() {
        let backup = VersionedBackup::from_value(sample(), &BackupConfig::default())
            .unwrap()
            .into_backup();

        assert_eq!(backup.metadata.created_by, "Sam");
        assert_eq!(backup.metadata.app_version, "2.3.0");
        assert!(backup.data.has(Domain::Workout));
        assert!(!backup.data.has(Domain::Nutrition));
        // Unknown fields survive
        assert_eq!(
            backup.data.gamification.as_ref().unwrap()["theme"],
            json!("dark")
        );
    }

    #[test]
    fn test_strict_rejects_other_version() {
        let mut doc = sample();
        doc["metadata"]["version"] = json!("2.0");

        let err = VersionedBackup::from_value(doc, &BackupConfig::default()).unwrap_err();
        assert!(matches!(err, BackupError::UnsupportedVersion { .. }));
    }

    #[test]
    fn test_lenient_accepts_other_version() {
        let mut doc = sample();
        doc["metadata"]["version"] = json!("1.1");

        let config = BackupConfig::default().with_version_policy(VersionPolicy::Lenient);
        let backup = VersionedBackup::from_value(doc, &config).unwrap().into_backup();
        assert_eq!(backup.metadata.version, "1.1");
    }

    #[test]
    fn test_missing_domains_are_not_serialized() {
        let backup = Backup {
            metadata: Metadata::default(),
            data: BackupData {
                workout: Some(DomainState::new()),
                ..BackupData::default()
            },
        };

        let value = backup.to_value().unwrap();
        assert!(value["data"].get("workout").is_some());
        assert!(value["data"].get("nutrition").is_none());
        assert!(value["metadata"].get("createdAt").is_some());
    }
}
