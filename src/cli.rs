//! Command-line interface for noughts.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Noughts - noughts and crosses server with a validated rules engine
#[derive(Parser, Debug)]
#[command(name = "noughts")]
#[command(about = "Noughts and crosses board server", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the HTTP board server
    Serve {
        /// Path to a TOML config file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Host to bind to
        #[arg(long)]
        host: Option<String>,

        /// Port to bind to
        #[arg(short, long)]
        port: Option<u16>,

        /// SQLite database file (boards are kept in memory otherwise)
        #[arg(long)]
        db_path: Option<String>,
    },

    /// Play a local game on this terminal
    Play,

    /// Apply database migrations and exit
    Migrate {
        /// SQLite database file
        #[arg(long, default_value = "noughts.db")]
        db_path: String,
    },
}
