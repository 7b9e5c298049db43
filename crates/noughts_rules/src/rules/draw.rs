//! Draw detection.

use super::super::Board;
use super::win::check_winner;
use tracing::instrument;

/// Number of cells on a 3x3 board.
pub const CELL_COUNT: usize = 9;

/// Checks if all nine cells are occupied.
#[instrument(skip(board))]
pub fn is_full(board: &Board) -> bool {
    board.occupied_count() == CELL_COUNT
}

/// A full board with no winner.
#[instrument(skip(board))]
pub fn is_draw(board: &Board) -> bool {
    is_full(board) && check_winner(board).is_none()
}
