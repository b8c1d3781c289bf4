use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use fitness_backup::cli::{
    handle_config, handle_export, handle_restore, handle_stats, handle_undo, handle_validate,
    ConfigArgs, RestoreArgs,
};
use fitness_backup::config::{FitnessPaths, Settings};
use fitness_backup::storage::FileStore;

#[derive(Parser)]
#[command(
    name = "fitness-backup",
    version,
    about = "Backup, export and restore for the fitness planner",
    long_about = "Snapshots the workout, nutrition and gamification stores into one \
                  versioned JSON file, and validates and restores such files by \
                  replacing or merging each domain."
)]
struct Cli {
    /// Directory holding the key-value store (defaults to <base>/store)
    #[arg(long, global = true, env = "FITNESS_BACKUP_STORE")]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Export the current data to a dated backup file
    Export {
        /// Directory to write the backup into
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Pretty-print the JSON output
        #[arg(long, conflicts_with = "compact")]
        pretty: bool,

        /// Write compact JSON on a single line
        #[arg(long)]
        compact: bool,
    },

    /// Check a backup file and list any issues
    Validate {
        /// Backup file
        file: PathBuf,
    },

    /// Show counts and size of a backup file
    Stats {
        /// Backup file
        file: PathBuf,
    },

    /// Restore a backup file into the current data
    Restore(RestoreArgs),

    /// Restore the snapshot taken before the last restore
    Undo {
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },

    /// Show current configuration and paths, or change settings
    Config(ConfigArgs),
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    let paths = FitnessPaths::new()?;
    let settings = Settings::load_or_create(&paths)?;
    let config = settings.backup_config();

    let store_dir = cli.data_dir.unwrap_or_else(|| paths.store_dir());
    let store = FileStore::new(store_dir);

    let ok = match cli.command {
        Some(Commands::Export {
            output,
            pretty,
            compact,
        }) => {
            let output = output.unwrap_or_else(|| settings.export_dir(&paths));
            let pretty = if compact {
                false
            } else {
                pretty || settings.pretty_export
            };
            handle_export(&store, &config, output, pretty)?;
            true
        }
        Some(Commands::Validate { file }) => handle_validate(&file, &config)?,
        Some(Commands::Stats { file }) => {
            handle_stats(&file, &config)?;
            true
        }
        Some(Commands::Restore(args)) => handle_restore(&store, &config, &args)?,
        Some(Commands::Undo { force }) => handle_undo(&store, &config, force)?,
        Some(Commands::Config(args)) => {
            handle_config(&paths, settings, store.dir(), &args)?;
            true
        }
        None => {
            println!("fitness-backup - backup and restore for the fitness planner");
            println!();
            println!("Run 'fitness-backup --help' for usage information.");
            true
        }
    };

    if !ok {
        std::process::exit(1);
    }

    Ok(())
}
