use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use notecraft::commands;

#[derive(Parser)]
#[command(name = "notecraft")]
#[command(version, about = "Handwritten study-memo image generator", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP API
    Serve {
        /// Config file (default: ./notecraft.toml if present)
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Port to listen on (overrides [server].port)
        #[arg(short, long)]
        port: Option<u16>,
        /// Address to bind (overrides [server].host)
        #[arg(long)]
        host: Option<String>,
    },
    /// Upgrade legacy catalog records and provision genre folders
    Migrate {
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Validate the configuration
    Check {
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { config, port, host } => {
            commands::serve::execute(config.as_deref(), port, host.as_deref()).await
        },
        Commands::Migrate { config } => commands::migrate::execute(config.as_deref()).await,
        Commands::Check { config } => commands::check::execute(config.as_deref()),
    }
}
