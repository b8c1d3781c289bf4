//! `config` command: show and change persisted settings

use std::path::{Path, PathBuf};

use clap::Args;

use crate::config::{FitnessPaths, Settings, VersionPolicy};
use crate::error::BackupResult;

/// Arguments of `config`; with no setter given the settings are only shown
#[derive(Args, Debug, Default)]
pub struct ConfigArgs {
    /// How a backup with a different format version is treated
    #[arg(long, value_enum)]
    pub version_policy: Option<VersionPolicy>,

    /// `createdBy` label used when the user profile has no name
    #[arg(long)]
    pub fallback_author: Option<String>,

    /// Default directory for exports
    #[arg(long)]
    pub export_dir: Option<PathBuf>,

    /// Pretty-print exports by default
    #[arg(long)]
    pub pretty_export: Option<bool>,
}

impl ConfigArgs {
    /// Apply the given setters; returns whether anything changed
    pub fn apply(&self, settings: &mut Settings) -> bool {
        let mut changed = false;

        if let Some(policy) = self.version_policy {
            settings.version_policy = policy;
            changed = true;
        }
        if let Some(author) = &self.fallback_author {
            settings.fallback_author = author.clone();
            changed = true;
        }
        if let Some(dir) = &self.export_dir {
            settings.export_dir = Some(dir.clone());
            changed = true;
        }
        if let Some(pretty) = self.pretty_export {
            settings.pretty_export = pretty;
            changed = true;
        }

        changed
    }
}

/// Handle `config`
pub fn handle_config(
    paths: &FitnessPaths,
    mut settings: Settings,
    store_dir: &Path,
    args: &ConfigArgs,
) -> BackupResult<()> {
    if args.apply(&mut settings) {
        settings.save(paths)?;
        println!("Settings saved to {}", paths.settings_file().display());
        println!();
    }

    let config = settings.backup_config();

    println!("fitness-backup Configuration");
    println!("============================");
    println!("Settings file:    {}", paths.settings_file().display());
    println!("Store directory:  {}", store_dir.display());
    println!("Export directory: {}", settings.export_dir(paths).display());
    println!();
    println!("Settings:");
    println!("  Backup format version: {}", config.format_version);
    println!("  Version policy:        {}", settings.version_policy);
    println!("  Pretty export:         {}", settings.pretty_export);
    println!("  Fallback author:       {}", settings.fallback_author);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_no_setters_leave_settings_alone() {
        let mut settings = Settings::default();
        assert!(!ConfigArgs::default().apply(&mut settings));
        assert_eq!(settings.version_policy, VersionPolicy::Strict);
    }

    #[test]
    fn test_setters_are_persisted() {
        let temp_dir = TempDir::new().unwrap();
        let paths = FitnessPaths::with_base_dir(temp_dir.path().join("base"));
        let args = ConfigArgs {
            version_policy: Some(VersionPolicy::Lenient),
            fallback_author: Some("Coach".into()),
            pretty_export: Some(false),
            ..ConfigArgs::default()
        };

        handle_config(&paths, Settings::default(), &paths.store_dir(), &args).unwrap();

        let loaded = Settings::load_or_create(&paths).unwrap();
        assert_eq!(loaded.version_policy, VersionPolicy::Lenient);
        assert_eq!(loaded.fallback_author, "Coach");
        assert!(!loaded.pretty_export);
        assert!(paths.export_dir().exists());
    }
}
