//! CLI entry and dispatch.

use anyhow::{Context, Result};
use clap::Parser;
use muster_core::config::Config;
use muster_core::credentials::CredentialStore;

mod commands;

#[derive(Parser)]
#[command(name = "muster")]
#[command(version)]
#[command(about = "Terminal dashboard for an attendance service")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Log in to the attendance backend (stores the session token)
    Login {
        /// Administrator e-mail
        #[arg(long)]
        email: String,
    },

    /// Log out (clears the stored session; no network call)
    Logout,

    /// List attendance records as a table
    Records {
        /// Show only rows whose name contains this text (case-insensitive)
        #[arg(long, value_name = "TEXT")]
        filter: Option<String>,
    },

    /// Download the attendance report as a CSV file
    Export {
        /// Output path (default: export_path from config)
        #[arg(long, value_name = "PATH")]
        output: Option<String>,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(clap::Subcommand)]
enum ConfigCommands {
    /// Show the path to the config file
    Path,
    /// Initialize a default config file (if not present)
    Init,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    // one tokio runtime for everything
    let rt = tokio::runtime::Runtime::new().context("create tokio runtime")?;

    rt.block_on(async move { dispatch(cli).await })
}

async fn dispatch(cli: Cli) -> Result<()> {
    let config = Config::load().context("load config")?;
    let _log_guard = muster_core::logging::init(&config).context("init logging")?;

    let store = CredentialStore::open_default();

    // default to the dashboard
    let Some(command) = cli.command else {
        return dashboard(&config, store).await;
    };

    match command {
        Commands::Login { email } => commands::auth::login(&config, &store, &email).await,
        Commands::Logout => commands::auth::logout(&store),
        Commands::Records { filter } => {
            commands::records::run(&config, &store, filter.as_deref()).await
        }
        Commands::Export { output } => {
            commands::export::run(&config, &store, output.as_deref()).await
        }
        Commands::Config { command } => match command {
            ConfigCommands::Path => commands::config::path(),
            ConfigCommands::Init => commands::config::init(),
        },
    }
}

#[cfg(feature = "tui")]
async fn dashboard(config: &Config, store: CredentialStore) -> Result<()> {
    let client = muster_core::api::ApiClient::from_config(config)?;
    let export_path = std::path::PathBuf::from(&config.export_path);
    muster_tui::run(client, store, export_path).await
}

#[cfg(not(feature = "tui"))]
async fn dashboard(_config: &Config, _store: CredentialStore) -> Result<()> {
    anyhow::bail!("This build has no dashboard; use a subcommand (see --help)")
}
