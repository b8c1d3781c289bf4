//! Backup pipeline for the fitness planner
//!
//! Snapshots the three domain stores into one versioned document and
//! reconciles an uploaded document back into live state.
//!
//! # Architecture
//!
//! - `assemble`: reads the domain stores into a `Backup`
//! - `validate`: structural and per-domain checks on an untyped document
//! - `merge`: record-level reconciliation of one domain
//! - `restore`: safety snapshot, then replace or merge each domain
//! - `stats`: counts and size of a backup
//!
//! # Example
//!
//! ```rust,ignore
//! use fitness_backup::backup::{
//!     assemble_backup, validate_backup, RestoreCoordinator, RestoreOptions,
//! };
//! use fitness_backup::config::BackupConfig;
//! use fitness_backup::storage::MemoryStore;
//!
//! let store = MemoryStore::new();
//! let config = BackupConfig::default();
//!
//! let backup = assemble_backup(&store, &config);
//! assert!(validate_backup(&backup, &config)?.is_valid);
//!
//! let report = RestoreCoordinator::new(&store, &config)
//!     .restore(&backup, &RestoreOptions::default());
//! println!("{}", report.summary());
//! ```

mod assemble;
mod merge;
mod restore;
mod stats;
mod validate;

pub use assemble::{assemble_backup, assemble_with_description};
pub use merge::{max_counter, merge_domain, merge_records, merge_settings};
pub use restore::{
    RestoreCoordinator, RestoreOptions, RestoreReport, SnapshotOutcome,
    SAFETY_SNAPSHOT_DESCRIPTION,
};
pub use stats::{backup_stats, format_size, BackupStats};
pub use validate::{
    validate_backup, validate_document, Severity, ValidationIssue, ValidationReport,
};
