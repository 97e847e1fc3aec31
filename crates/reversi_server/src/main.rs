//! Reversi server binary.

#![warn(missing_docs)]

mod cli;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Command, ConfigArgs};
use reversi_server::{ReversiService, ServerConfig, SqliteStore, api};
use tracing::{info, instrument};
use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "info,reversi=debug,reversi_server=debug";

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER)),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Serve { config, host, port } => {
            let config = load_config(config, host, port)?;
            serve(config).await
        }
        Command::Migrate { config } => {
            let config = load_config(config, None, None)?;
            migrate(&config)
        }
    }
}

fn load_config(args: ConfigArgs, host: Option<String>, port: Option<u16>) -> Result<ServerConfig> {
    let config = ServerConfig::load(args.config.as_deref())?;
    Ok(config.with_overrides(host, port, args.database_url))
}

/// Applies pending migrations.
#[instrument(skip(config), fields(database_url = %config.database_url()))]
fn migrate(config: &ServerConfig) -> Result<()> {
    let applied = SqliteStore::new(config.database_url()).run_migrations()?;
    info!(applied, "Database is up to date");
    Ok(())
}

/// Runs the HTTP server until it is stopped.
#[instrument(skip(config), fields(addr = %config.bind_addr()))]
async fn serve(config: ServerConfig) -> Result<()> {
    let store = SqliteStore::new(config.database_url());
    store.run_migrations()?;

    let app = api::router(ReversiService::new(store));
    let listener = tokio::net::TcpListener::bind(config.bind_addr()).await?;
    info!(addr = %listener.local_addr()?, "Reversi server listening");

    axum::serve(listener, app).await?;
    Ok(())
}
