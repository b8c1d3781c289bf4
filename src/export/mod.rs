//! Export and import of backup files
//!
//! - `json`: writing backups to files, file naming, parsing uploads
//! - `import`: the validate-then-restore pipeline for uploaded documents

pub mod import;
pub mod json;

pub use import::{import_backup, ImportOutcome};
pub use json::{
    export_backup_json, export_filename, parse_document, read_backup_file, record_backup_time,
    unique_backup_path, write_backup_file, BACKUP_EXTENSION,
};
