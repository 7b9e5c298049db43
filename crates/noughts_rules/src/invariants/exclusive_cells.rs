//! Exclusive cells invariant: no cell belongs to both sides.

use super::super::Board;
use super::Invariant;

/// Invariant: a cell appears in at most one side's positions.
pub struct ExclusiveCellsInvariant;

impl Invariant<Board> for ExclusiveCellsInvariant {
    fn holds(board: &Board) -> bool {
        board.circle().cells().all(|cell| !board.cross().contains(cell))
    }

    fn description() -> &'static str {
        "No cell is held by both sides"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Positions, Status};

    #[test]
    fn test_disjoint_sides_hold() {
        let board = Board::from_parts(
            Positions::from_columns(vec![1], vec![], vec![]),
            Positions::from_columns(vec![2], vec![], vec![]),
            Status::Unfinished,
        );
        assert!(ExclusiveCellsInvariant::holds(&board));
    }

    #[test]
    fn test_shared_cell_violates() {
        let board = Board::from_parts(
            Positions::from_columns(vec![], vec![2], vec![]),
            Positions::from_columns(vec![], vec![2], vec![]),
            Status::Unfinished,
        );
        assert!(!ExclusiveCellsInvariant::holds(&board));
    }
}
