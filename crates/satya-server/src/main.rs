//! Satya server binary
//!
//! Starts the HTTP verification service.

use anyhow::{Context, Result};
use clap::Parser;
use satya_server::{config::ServerConfig, init_tracing, start_server};
use std::path::PathBuf;
use tracing::warn;

/// Multilingual fact-checking service
#[derive(Parser, Debug)]
#[command(name = "satya-server", about = "Multilingual fact-checking service", version)]
struct Args {
    /// TOML configuration file
    #[arg(short, long, env = "SATYA_CONFIG")]
    config: Option<PathBuf>,

    /// Listen address as host:port (overrides the config file)
    #[arg(short, long, env = "SATYA_BIND")]
    bind: Option<String>,

    /// SQLite database path (overrides the config file)
    #[arg(short, long, env = "SATYA_DATABASE")]
    database: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing();

    let mut config = match &args.config {
        Some(path) => ServerConfig::from_file(path)
            .with_context(|| format!("Failed to load {}", path.display()))?,
        None => {
            warn!("No config file specified, using defaults");
            ServerConfig::default()
        }
    };
    config
        .apply_overrides(args.bind.as_deref(), args.database.as_deref())
        .context("Invalid command-line override")?;

    start_server(config).await.context("Server failed")?;
    Ok(())
}
