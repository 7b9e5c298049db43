//! Board persistence.
//!
//! The engine is stateless, so every board lives in a [`BoardStore`]
//! between moves. Stores guarantee at most one applied move per board per
//! turn with an optimistic version check on [`BoardStore::commit`].

mod error;
mod memory;
mod record;

pub use error::StoreError;
pub use memory::MemoryBoardStore;
pub use record::{BoardFilter, BoardRecord, NewBoard};

use noughts_rules::{Board, TurnState};

/// Storage for board records.
pub trait BoardStore: Send + Sync {
    /// Creates a fresh board for two players, circle to move.
    fn create(&self, new_board: NewBoard) -> Result<BoardRecord, StoreError>;

    /// Loads a board by ID.
    fn get(&self, id: i32) -> Result<BoardRecord, StoreError>;

    /// Lists boards matching the filter, newest first.
    fn list(&self, filter: &BoardFilter) -> Result<Vec<BoardRecord>, StoreError>;

    /// Writes a new board and turn state if the stored version still equals
    /// `expected_version`, bumping the version.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ConcurrentModification`] when another write
    /// landed first; nothing is written in that case.
    fn commit(
        &self,
        id: i32,
        expected_version: i32,
        board: &Board,
        turn: &TurnState,
    ) -> Result<BoardRecord, StoreError>;
}
