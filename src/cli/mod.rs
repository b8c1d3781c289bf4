//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the backup pipeline.

pub mod backup;
pub mod config;
pub mod export;

pub use backup::{handle_restore, handle_stats, handle_undo, handle_validate, RestoreArgs};
pub use config::{handle_config, ConfigArgs};
pub use export::handle_export;
