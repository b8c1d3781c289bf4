//! JSON export and parsing of backup files
//!
//! Writes a backup to a writer or to a dated file, and reads an uploaded file
//! back into an untyped document for validation.

use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local, Utc};
use log::{info, warn};
use serde_json::Value;

use crate::error::{BackupError, BackupResult};
use crate::models::Backup;
use crate::storage::{write_string_atomic, KeyValueStore, LAST_BACKUP_TIME_KEY};

/// Extension every backup file carries
pub const BACKUP_EXTENSION: &str = "json";

/// File name for a backup taken at `at`: `fitness-backup-yyyy-MM-dd-HH-mm-ss.json`
pub fn export_filename(at: DateTime<Local>) -> String {
    format!(
        "fitness-backup-{}.{}",
        at.format("%Y-%m-%d-%H-%M-%S"),
        BACKUP_EXTENSION
    )
}

/// First free path for a backup taken at `at`
///
/// A second export within the same second gets a `-1`, `-2`, ... suffix
/// instead of replacing the earlier file.
pub fn unique_backup_path(dir: &Path, at: DateTime<Local>) -> PathBuf {
    let path = dir.join(export_filename(at));
    if !path.exists() {
        return path;
    }

    let stem = format!("fitness-backup-{}", at.format("%Y-%m-%d-%H-%M-%S"));
    let mut n = 1u32;
    loop {
        let candidate = dir.join(format!("{}-{}.{}", stem, n, BACKUP_EXTENSION));
        if !candidate.exists() {
            warn!(
                "{} already exists, writing {} instead",
                path.display(),
                candidate.display()
            );
            return candidate;
        }
        n += 1;
    }
}

/// Serialize a backup to a writer
pub fn export_backup_json<W: Write>(
    backup: &Backup,
    writer: &mut W,
    pretty: bool,
) -> BackupResult<()> {
    if pretty {
        serde_json::to_writer_pretty(writer, backup)
    } else {
        serde_json::to_writer(writer, backup)
    }
    .map_err(|e| BackupError::Json(format!("Failed to write backup: {}", e)))?;

    Ok(())
}

/// Write a backup into `dir` under the dated file name
///
/// Returns the path to the created file.
pub fn write_backup_file(backup: &Backup, dir: &Path, pretty: bool) -> BackupResult<PathBuf> {
    std::fs::create_dir_all(dir)
        .map_err(|e| BackupError::Io(format!("Failed to create export directory: {}", e)))?;

    let path = unique_backup_path(dir, Local::now());
    write_string_atomic(&path, &backup.to_json(pretty)?)?;

    info!("Exported backup to {}", path.display());
    Ok(path)
}

/// Remember when the last successful export happened
pub fn record_backup_time(store: &dyn KeyValueStore, at: DateTime<Utc>) -> BackupResult<()> {
    store.set(LAST_BACKUP_TIME_KEY, &at.to_rfc3339())
}

/// Parse uploaded text into an untyped document
pub fn parse_document(text: &str) -> BackupResult<Value> {
    serde_json::from_str(text)
        .map_err(|e| BackupError::Parse(format!("Backup file is not valid JSON: {}", e)))
}

/// Read and parse a backup file; only `.json` files are accepted
pub fn read_backup_file(path: &Path) -> BackupResult<Value> {
    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case(BACKUP_EXTENSION));
    if !is_json {
        return Err(BackupError::Parse(format!(
            "Expected a .{} backup file: {}",
            BACKUP_EXTENSION,
            path.display()
        )));
    }

    if !path.exists() {
        return Err(BackupError::backup_not_found(path.display().to_string()));
    }

    let contents = std::fs::read_to_string(path)
        .map_err(|e| BackupError::Io(format!("Failed to read backup file: {}", e)))?;

    parse_document(&contents)
}
