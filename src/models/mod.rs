//! Data models for backup documents
//!
//! - `backup`: the document itself (`Backup`, `Metadata`, `BackupData`) and
//!   the version-tagged `VersionedBackup`
//! - `domain`: the three domains and their field-policy tables
//! - `record`: helpers for id-bearing records

pub mod backup;
pub mod domain;
pub mod record;

pub use backup::{Backup, BackupData, Metadata, VersionedBackup};
pub use domain::{is_streak_maximum, Domain, DomainState, FieldPolicy, FieldSpec};
pub use record::{has_name, id_key, record_id};
