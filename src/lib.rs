//! Noughts library - board server around the `noughts_rules` engine
//!
//! # Architecture
//!
//! - **Rules**: the pure engine lives in the `noughts_rules` crate
//! - **Store**: versioned board persistence (in memory or SQLite)
//! - **Referee**: loads a board, runs one move through the engine, commits it
//! - **Server**: axum REST API over a store
//! - **Hot-seat**: two players sharing one terminal
//!
//! # Example
//!
//! ```
//! use noughts::{BoardStore, MemoryBoardStore, NewBoard, make_a_play};
//!
//! # fn example() -> anyhow::Result<()> {
//! let store = MemoryBoardStore::new();
//! let record = store.create(NewBoard::new("erick", "ana")?)?;
//!
//! let report = make_a_play(&store, *record.id(), "erick", "B_2")?;
//! assert_eq!(report.message(), "Great! Now wait for your opponent to play.");
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Private module declarations
mod config;
mod db;
mod hotseat;
mod referee;
mod server;
mod store;

// Crate-level exports - Configuration
pub use config::{ConfigError, ConfigOverrides, DATABASE_URL_VAR, ServerConfig};

// Crate-level exports - Persistence
pub use db::{DbError, MIGRATIONS, SqliteBoardStore};
pub use store::{BoardFilter, BoardRecord, BoardStore, MemoryBoardStore, NewBoard, StoreError};

// Crate-level exports - Referee
pub use referee::{PlayError, PlayReport, make_a_play};

// Crate-level exports - HTTP API
pub use server::{
    ApiError, AppState, BoardView, CreateBoardRequest, MakeAPlayRequest, PlayResponse, router,
};

// Crate-level exports - Hot-seat
pub use hotseat::run_hotseat;

// Crate-level exports - Rules engine
pub use noughts_rules;
