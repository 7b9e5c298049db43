//! SQLite persistence for boards.

mod error;
mod models;
mod repository;
mod schema; // Diesel generated schema - internal use only

pub use error::DbError;
pub use repository::{MIGRATIONS, SqliteBoardStore};
