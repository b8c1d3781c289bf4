//! CLI command for exporting a backup

use std::path::PathBuf;

use chrono::Utc;
use log::warn;

use crate::backup::{assemble_backup, backup_stats};
use crate::config::BackupConfig;
use crate::error::BackupResult;
use crate::export::{record_backup_time, write_backup_file};
use crate::storage::KeyValueStore;

use super::backup::print_stats;

/// Handle `export`
///
/// Returns the path of the written file.
pub fn handle_export(
    store: &dyn KeyValueStore,
    config: &BackupConfig,
    output_dir: PathBuf,
    pretty: bool,
) -> BackupResult<PathBuf> {
    let backup = assemble_backup(store, config);
    let path = write_backup_file(&backup, &output_dir, pretty)?;

    if let Err(e) = record_backup_time(store, Utc::now()) {
        warn!("Could not record last backup time: {}", e);
    }

    println!("Backup exported: {}", path.display());
    println!();
    print_stats(&backup_stats(&backup));

    Ok(path)
}
