//! Balanced counts invariant: circle moves first, then sides alternate.

use super::super::Board;
use super::Invariant;

/// Invariant: circle holds as many cells as cross, or exactly one more.
pub struct BalancedCountsInvariant;

impl Invariant<Board> for BalancedCountsInvariant {
    fn holds(board: &Board) -> bool {
        let circle = board.circle().len();
        let cross = board.cross().len();
        circle == cross || circle == cross + 1
    }

    fn description() -> &'static str {
        "Circle holds as many cells as cross, or one more"
    }
}
