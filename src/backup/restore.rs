//! Backup restoration
//!
//! Writes a validated backup back into the domain stores. Before anything is
//! touched the current stores are copied under the safety-snapshot key. Each
//! domain is then replaced or merged on its own, so one failing domain does
//! not stop the others.

use std::fmt;

use log::{info, warn};
use serde_json::Value;

use crate::config::BackupConfig;
use crate::error::{BackupError, BackupResult};
use crate::models::{Backup, Domain, DomainState, VersionedBackup};
use crate::storage::{KeyValueStore, APP_VERSION_KEY, SAFETY_SNAPSHOT_KEY};

use super::assemble::{assemble_with_description, read_domain};
use super::merge::merge_domain;

/// Description stamped into safety snapshots
pub const SAFETY_SNAPSHOT_DESCRIPTION: &str = "Automatic backup before restore";

/// Which domains to restore and how
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RestoreOptions {
    pub restore_workout: bool,
    pub restore_nutrition: bool,
    pub restore_gamification: bool,
    /// Merge record-by-record instead of replacing each domain wholesale
    pub merge_data: bool,
}

impl Default for RestoreOptions {
    fn default() -> Self {
        Self {
            restore_workout: true,
            restore_nutrition: true,
            restore_gamification: true,
            merge_data: false,
        }
    }
}

impl RestoreOptions {
    /// Whether this domain is selected for restore
    pub fn includes(&self, domain: Domain) -> bool {
        match domain {
            Domain::Workout => self.restore_workout,
            Domain::Nutrition => self.restore_nutrition,
            Domain::Gamification => self.restore_gamification,
        }
    }
}

/// Whether the pre-restore copy of the current stores was written
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SnapshotOutcome {
    Saved,
    Failed(String),
}

impl SnapshotOutcome {
    pub fn is_saved(&self) -> bool {
        matches!(self, Self::Saved)
    }
}

impl fmt::Display for SnapshotOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Saved => write!(f, "saved"),
            Self::Failed(reason) => write!(f, "failed ({})", reason),
        }
    }
}

/// Result of a restore operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestoreReport {
    /// True only if no domain failed
    pub success: bool,
    /// Labels of the domains actually written
    pub restored: Vec<String>,
    /// One message per failed domain
    pub errors: Vec<String>,
    pub safety_snapshot: SnapshotOutcome,
    /// Whether the cache-version marker was bumped
    pub cache_marker_updated: bool,
}

impl RestoreReport {
    /// Get a summary of what was restored
    pub fn summary(&self) -> String {
        let restored = if self.restored.is_empty() {
            "nothing".to_string()
        } else {
            self.restored.join(", ")
        };

        if self.success {
            format!("Restored: {}", restored)
        } else {
            format!(
                "Restored: {}; {} domain(s) failed",
                restored,
                self.errors.len()
            )
        }
    }
}

/// Applies backups to the domain stores
pub struct RestoreCoordinator<'a> {
    store: &'a dyn KeyValueStore,
    config: &'a BackupConfig,
}

impl<'a> RestoreCoordinator<'a> {
    pub fn new(store: &'a dyn KeyValueStore, config: &'a BackupConfig) -> Self {
        Self { store, config }
    }

    /// Restore a validated backup
    ///
    /// Never fails as a whole: per-domain failures are collected in the
    /// report. The backup itself is not modified.
    pub fn restore(&self, backup: &Backup, options: &RestoreOptions) -> RestoreReport {
        let safety_snapshot = self.save_safety_snapshot();

        let mut restored = Vec::new();
        let mut errors = Vec::new();

        for domain in Domain::ALL {
            if !options.includes(domain) {
                continue;
            }
            let Some(incoming) = backup.data.domain(domain) else {
                continue;
            };

            match self.restore_domain(domain, incoming, options.merge_data) {
                Ok(()) => {
                    info!(
                        "{} {}",
                        if options.merge_data { "Merged" } else { "Replaced" },
                        domain.label()
                    );
                    restored.push(domain.label().to_string());
                }
                Err(e) => {
                    let err = BackupError::DomainRestore {
                        domain: domain.label(),
                        message: e.to_string(),
                    };
                    warn!("{}", err);
                    errors.push(err.to_string());
                }
            }
        }

        let cache_marker_updated = !restored.is_empty() && self.bump_cache_marker();

        RestoreReport {
            success: errors.is_empty(),
            restored,
            errors,
            safety_snapshot,
            cache_marker_updated,
        }
    }

    /// Read back the copy taken before the last restore
    pub fn safety_snapshot(&self) -> BackupResult<Option<Backup>> {
        let Some(raw) = self.store.get(SAFETY_SNAPSHOT_KEY)? else {
            return Ok(None);
        };

        let value: Value = serde_json::from_str(&raw)
            .map_err(|e| BackupError::Parse(format!("Safety snapshot is not valid JSON: {}", e)))?;
        Ok(Some(VersionedBackup::from_value(value, self.config)?.into_backup()))
    }

    fn save_safety_snapshot(&self) -> SnapshotOutcome {
        let snapshot =
            assemble_with_description(self.store, self.config, SAFETY_SNAPSHOT_DESCRIPTION);

        let written = snapshot
            .to_json(false)
            .and_then(|json| self.store.set(SAFETY_SNAPSHOT_KEY, &json));

        match written {
            Ok(()) => SnapshotOutcome::Saved,
            Err(e) => {
                warn!("Could not save safety snapshot, continuing restore: {}", e);
                SnapshotOutcome::Failed(e.to_string())
            }
        }
    }

    fn restore_domain(
        &self,
        domain: Domain,
        incoming: &DomainState,
        merge: bool,
    ) -> BackupResult<()> {
        let state = if merge {
            let current = self.read_current(domain)?;
            merge_domain(domain, &current, incoming)
        } else {
            incoming.clone()
        };

        let json = serde_json::to_string(&state)?;
        self.store.set(domain.storage_key(), &json)
    }

    /// Current state for merging; unlike assembly, garbage here is an error
    fn read_current(&self, domain: Domain) -> BackupResult<DomainState> {
        let Some(raw) = self.store.get(domain.storage_key())? else {
            return Ok(DomainState::new());
        };

        match serde_json::from_str::<Value>(&raw) {
            Ok(Value::Object(map)) => Ok(map),
            Ok(Value::Null) => Ok(DomainState::new()),
            Ok(_) => Err(BackupError::Parse(format!(
                "Current {} is not a JSON object",
                domain.storage_key()
            ))),
            Err(e) => Err(BackupError::Parse(format!(
                "Current {} is not valid JSON: {}",
                domain.storage_key(),
                e
            ))),
        }
    }

    fn bump_cache_marker(&self) -> bool {
        match self.store.set(APP_VERSION_KEY, &self.config.app_version) {
            Ok(()) => true,
            Err(e) => {
                warn!("Could not update cache-version marker: {}", e);
                false
            }
        }
    }

    /// Current state of one domain, as the assembler would see it
    pub fn current_domain(&self, domain: Domain) -> DomainState {
        read_domain(self.store, domain)
    }
}
