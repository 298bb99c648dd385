use anyhow::Result;
use clap::{Parser, Subcommand};
use peti_core::Config;
use peti_engine::{cleanup, update, UpdateOptions};
use std::path::PathBuf;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "peti-sync")]
#[command(about = "Manages Resilio Sync folders for the ETI LAN-party launcher")]
#[command(version = "0.1.0")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long, default_value = "/app/eti-config.yaml")]
    config: PathBuf,

    /// Log level
    #[arg(short, long, default_value = "info")]
    log_level: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Align the daemon's folder list with configuration and game database
    Update {
        /// Don't remove discarded games from sync
        #[arg(long)]
        keep_discarded_games: bool,
    },
    /// Remove all managed folders and their data (asks for confirmation)
    Cleanup,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(cli.log_level.clone()));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = Config::load(&cli.config).await.map_err(|e| {
        error!("Configuration error: {}", e);
        e
    })?;

    match cli.command {
        Commands::Update {
            keep_discarded_games,
        } => {
            let options = UpdateOptions {
                keep_discarded_games,
            };
            let report = update::run(&config, &options).await?;
            if report.failed > 0 {
                error!("{} folder operations failed", report.failed);
                std::process::exit(1);
            }
            info!(
                "Update complete: {} added, {} removed, {} unchanged",
                report.added, report.removed, report.unchanged
            );
            Ok(())
        }
        Commands::Cleanup => {
            let report = cleanup::run(&config).await?;
            if !report.confirmed {
                info!("Cleanup was not confirmed, no data removed");
                return Ok(());
            }
            if report.failed > 0 {
                error!("{} folders could not be removed", report.failed);
                std::process::exit(1);
            }
            info!("Cleanup complete: {} folders removed", report.removed);
            Ok(())
        }
    }
}
