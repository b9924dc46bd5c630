//! remmina-applet entry point.

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use remmina_applet::config::{ConfigStore, PrefKey};
use remmina_applet::runtime::Runtime;

#[derive(Parser)]
#[command(name = "remmina-applet")]
#[command(about = "Panel applet listing Remmina connections")]
#[command(version)]
struct Cli {
    /// Config file to use instead of the default location
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory holding .remmina profiles
    #[arg(long)]
    profile_dir: Option<PathBuf>,

    /// Program started for connections
    #[arg(long)]
    launcher: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the tray icon (default)
    Run,

    /// Print every preference
    Prefs,

    /// Print one preference
    Get {
        /// Preference key, e.g. applet_quick_ontop
        key: String,
    },

    /// Change one preference
    Set {
        /// Preference key, e.g. applet_quick_ontop
        key: String,
        #[arg(action = clap::ArgAction::Set)]
        value: bool,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let store = match cli.config {
        Some(path) => ConfigStore::new(path),
        None => ConfigStore::default_location(),
    };
    let mut config = store
        .load()
        .with_context(|| format!("failed to load {}", store.path().display()))?;
    tracing::debug!(path = %store.path().display(), "configuration loaded");

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => {
            if let Some(dir) = cli.profile_dir {
                config.paths.profile_dir = Some(dir);
            }
            if let Some(launcher) = cli.launcher {
                config.paths.launcher = launcher;
            }

            tracing::info!(version = env!("CARGO_PKG_VERSION"), "starting remmina-applet");
            Runtime::new(config, store).run()?;
        }
        Commands::Prefs => {
            for key in PrefKey::ALL {
                println!("{key} = {}", config.preferences.get(key));
            }
        }
        Commands::Get { key } => {
            println!("{}", config.preferences.get_by_name(&key)?);
        }
        Commands::Set { key, value } => {
            config.preferences.set_by_name(&key, value)?;
            store
                .save(&config)
                .with_context(|| format!("failed to save {}", store.path().display()))?;
        }
    }

    Ok(())
}
