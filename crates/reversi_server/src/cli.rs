//! Command-line interface for reversi_server.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Reversi server - REST API over a SQLite game history
#[derive(Parser, Debug)]
#[command(name = "reversi_server")]
#[command(about = "Reversi game server", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run migrations and serve the REST API
    Serve {
        /// Shared config options
        #[command(flatten)]
        config: ConfigArgs,

        /// Host to bind to
        #[arg(long)]
        host: Option<String>,

        /// Port to bind to
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Apply pending migrations and exit
    Migrate {
        /// Shared config options
        #[command(flatten)]
        config: ConfigArgs,
    },
}

/// Options shared by every command.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    /// Path to a TOML config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Path to the database file (created if it doesn't exist)
    #[arg(long)]
    pub database_url: Option<String>,
}
