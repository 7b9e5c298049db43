//! Noughts - Unified CLI
//!
//! Board server, local hot-seat game and database maintenance.

#![warn(missing_docs)]

mod cli;

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Command};
use noughts::{
    BoardStore, ConfigOverrides, MemoryBoardStore, ServerConfig, SqliteBoardStore, router,
    run_hotseat,
};
use tracing::{info, instrument};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Command::Serve {
            config,
            host,
            port,
            db_path,
        } => {
            let overrides = ConfigOverrides {
                host,
                port,
                database: db_path,
            };
            let config = ServerConfig::load(config.as_deref(), overrides)?;
            init_tracing(config.log_filter());
            run_server(config).await
        }
        Command::Play => {
            init_tracing("warn");
            let stdin = std::io::stdin();
            run_hotseat(stdin.lock(), std::io::stdout())?;
            Ok(())
        }
        Command::Migrate { db_path } => {
            init_tracing("info");
            SqliteBoardStore::open(db_path)?;
            info!("Database is up to date");
            Ok(())
        }
    }
}

/// Installs the subscriber, preferring `RUST_LOG` over the fallback filter.
fn init_tracing(fallback: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback)),
        )
        .init();
}

/// Run the HTTP board server
#[instrument(skip_all, fields(address = %config.bind_address()))]
async fn run_server(config: ServerConfig) -> Result<()> {
    let store: Arc<dyn BoardStore> = match config.database() {
        Some(path) => {
            info!(path = %path, "Using SQLite board store");
            Arc::new(SqliteBoardStore::open(path.clone())?)
        }
        None => {
            info!("Using in-memory board store");
            Arc::new(MemoryBoardStore::new())
        }
    };

    let app = router(store);
    let listener = tokio::net::TcpListener::bind(config.bind_address()).await?;
    info!("Server ready at http://{}/", config.bind_address());

    axum::serve(listener, app).await?;
    Ok(())
}
