//! fitness-backup - backup, export and restore for a fitness planner
//!
//! The planner keeps its state in a key-value store split into three domain
//! stores: workout, nutrition and gamification. This crate snapshots those
//! stores into one versioned JSON document and safely reconciles an uploaded
//! document back into live state, either by replacing each domain or by
//! merging it record by record.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Paths, persisted settings and the injected `BackupConfig`
//! - `error`: Custom error types
//! - `models`: The backup document and the per-domain field-policy tables
//! - `storage`: The `KeyValueStore` trait and its in-memory and file backends
//! - `backup`: Assembly, validation, merging, restore and statistics
//! - `export`: Backup files and the validate-then-restore import pipeline
//! - `cli`: Command handlers for the `fitness-backup` binary
//!
//! # Example
//!
//! ```rust,ignore
//! use fitness_backup::backup::assemble_backup;
//! use fitness_backup::config::{FitnessPaths, Settings};
//! use fitness_backup::export::write_backup_file;
//! use fitness_backup::storage::FileStore;
//!
//! let paths = FitnessPaths::new()?;
//! let settings = Settings::load_or_create(&paths)?;
//! let store = FileStore::new(paths.store_dir());
//!
//! let backup = assemble_backup(&store, &settings.backup_config());
//! let path = write_backup_file(&backup, &paths.export_dir(), true)?;
//! ```

pub mod backup;
pub mod cli;
pub mod config;
pub mod error;
pub mod export;
pub mod models;
pub mod storage;

pub use error::{BackupError, BackupResult};
