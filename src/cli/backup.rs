//! Backup CLI commands
//!
//! Implements validate, stats, restore and undo on top of the backup pipeline.

use std::path::{Path, PathBuf};

use clap::Args;
use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::backup::{
    backup_stats, validate_document, BackupStats, RestoreCoordinator, RestoreOptions,
    RestoreReport, ValidationReport,
};
use crate::config::{BackupConfig, VersionPolicy};
use crate::error::{BackupError, BackupResult};
use crate::export::{import_backup, read_backup_file};
use crate::models::{Domain, VersionedBackup};
use crate::storage::KeyValueStore;

/// Arguments of `restore`
#[derive(Args, Debug)]
pub struct RestoreArgs {
    /// Backup file to restore
    pub file: PathBuf,

    /// Merge records into the current data instead of replacing it
    #[arg(short, long)]
    pub merge: bool,

    /// Leave workout data untouched
    #[arg(long)]
    pub skip_workout: bool,

    /// Leave nutrition data untouched
    #[arg(long)]
    pub skip_nutrition: bool,

    /// Leave gamification data untouched
    #[arg(long)]
    pub skip_gamification: bool,

    /// Restore even if validation reported errors
    #[arg(short, long)]
    pub force: bool,
}

impl RestoreArgs {
    fn options(&self) -> RestoreOptions {
        RestoreOptions {
            restore_workout: !self.skip_workout,
            restore_nutrition: !self.skip_nutrition,
            restore_gamification: !self.skip_gamification,
            merge_data: self.merge,
        }
    }
}

#[derive(Tabled)]
struct StatRow {
    #[tabled(rename = "Item")]
    item: &'static str,
    #[tabled(rename = "Value")]
    value: String,
}

/// Handle `validate FILE`
///
/// Returns whether the document is valid.
pub fn handle_validate(file: &Path, config: &BackupConfig) -> BackupResult<bool> {
    let doc = read_backup_file(file)?;
    let report = validate_document(&doc, config);

    println!("Backup Validation");
    println!("=================");
    println!("File: {}", file.display());
    print_validation(&report);

    Ok(report.is_valid)
}

/// Handle `stats FILE`
///
/// Validation issues are shown as warnings; the table is still printed
/// as long as the document can be decoded.
pub fn handle_stats(file: &Path, config: &BackupConfig) -> BackupResult<()> {
    let doc = read_backup_file(file)?;
    let report = validate_document(&doc, config);
    if !report.issues.is_empty() {
        println!("Warning: backup has validation issues");
        print_validation(&report);
        println!();
    }

    let lenient = config.clone().with_version_policy(VersionPolicy::Lenient);
    let backup = VersionedBackup::from_value(doc, &lenient)?.into_backup();

    println!("Backup Details");
    println!("==============");
    println!("File: {}", file.display());
    println!(
        "Created: {} by {}",
        backup.metadata.created_at.format("%Y-%m-%d %H:%M:%S UTC"),
        backup.metadata.created_by
    );
    println!("Version: {} (app {})", backup.metadata.version, backup.metadata.app_version);
    println!();
    print_stats(&backup_stats(&backup));

    Ok(())
}

/// Handle `restore FILE`
pub fn handle_restore(
    store: &dyn KeyValueStore,
    config: &BackupConfig,
    args: &RestoreArgs,
) -> BackupResult<bool> {
    let doc = read_backup_file(&args.file)?;

    match import_backup(doc, store, config, &args.options(), args.force) {
        Ok(outcome) => {
            if !outcome.validation.issues.is_empty() {
                print_validation(&outcome.validation);
                println!();
            }
            print_restore(&outcome.restore);
            Ok(outcome.restore.success)
        }
        Err(BackupError::InvalidBackup { issues }) => {
            println!("Backup failed validation:");
            for issue in &issues {
                println!("  [{}] {}", issue.severity, issue);
            }
            println!();
            println!("Nothing was restored. To restore anyway, run again with --force:");
            println!("  fitness-backup restore {} --force", args.file.display());
            Err(BackupError::InvalidBackup { issues })
        }
        Err(e) => Err(e),
    }
}

/// Handle `undo`: restore the copy taken before the last restore
pub fn handle_undo(
    store: &dyn KeyValueStore,
    config: &BackupConfig,
    force: bool,
) -> BackupResult<bool> {
    let coordinator = RestoreCoordinator::new(store, config);
    let snapshot = coordinator
        .safety_snapshot()?
        .ok_or_else(|| BackupError::backup_not_found("pre-restore snapshot"))?;

    println!(
        "Pre-restore snapshot from {}",
        snapshot.metadata.created_at.format("%Y-%m-%d %H:%M:%S UTC")
    );

    if !force {
        println!("WARNING: This will overwrite ALL current data!");
        println!("To proceed, run again with --force flag:");
        println!("  fitness-backup undo --force");
        return Ok(true);
    }

    let report = coordinator.restore(&snapshot, &RestoreOptions::default());
    print_restore(&report);
    Ok(report.success)
}

fn print_validation(report: &ValidationReport) {
    for issue in &report.issues {
        println!("  [{}] {}", issue.severity, issue);
    }
    let contents: Vec<String> = Domain::ALL
        .iter()
        .map(|d| {
            format!(
                "{}: {}",
                d.label(),
                if report.has_domain(*d) { "Yes" } else { "No" }
            )
        })
        .collect();
    println!("Contents: {}", contents.join(", "));
    println!("Status: {}", report.summary());
}

fn print_restore(report: &RestoreReport) {
    println!("Safety snapshot: {}", report.safety_snapshot);
    for label in &report.restored {
        println!("  restored  {}", label);
    }
    for error in &report.errors {
        println!("  FAILED    {}", error);
    }
    println!("{}", report.summary());
}

/// Print the stats table
pub fn print_stats(stats: &BackupStats) {
    let rows: Vec<StatRow> = stats
        .rows()
        .into_iter()
        .map(|(item, value)| StatRow { item, value })
        .collect();

    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{}", table);
}
