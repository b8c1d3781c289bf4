//! Import pipeline: validate an uploaded document, then restore it

use log::{info, warn};
use serde_json::Value;

use crate::backup::{
    validate_document, RestoreCoordinator, RestoreOptions, RestoreReport, ValidationReport,
};
use crate::config::{BackupConfig, VersionPolicy};
use crate::error::{BackupError, BackupResult};
use crate::models::VersionedBackup;
use crate::storage::KeyValueStore;

/// What an import did
#[derive(Debug, Clone)]
pub struct ImportOutcome {
    pub validation: ValidationReport,
    pub restore: RestoreReport,
}

/// Validate `doc` and restore it into `store`
///
/// An invalid document is rejected before anything is written, unless
/// `force` is set, in which case it is restored on a best-effort basis.
pub fn import_backup(
    doc: Value,
    store: &dyn KeyValueStore,
    config: &BackupConfig,
    options: &RestoreOptions,
    force: bool,
) -> BackupResult<ImportOutcome> {
    let validation = validate_document(&doc, config);

    if !validation.is_valid {
        if !force {
            return Err(BackupError::InvalidBackup {
                issues: validation.issues,
            });
        }
        warn!("Importing backup despite {} issue(s)", validation.issues.len());
    }

    let decode_config = if force {
        config.clone().with_version_policy(VersionPolicy::Lenient)
    } else {
        config.clone()
    };
    let backup = VersionedBackup::from_value(doc, &decode_config)?.into_backup();

    let restore = RestoreCoordinator::new(store, config).restore(&backup, options);
    info!("{}", restore.summary());

    Ok(ImportOutcome { validation, restore })
}
