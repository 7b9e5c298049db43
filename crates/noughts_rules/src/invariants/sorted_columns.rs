//! Sorted columns invariant: every column list is strictly ascending within 1-3.

use super::super::{Board, Column, ROWS, Side};
use super::Invariant;

/// Invariant: each column list is ascending, duplicate-free, and only holds rows 1-3.
///
/// Strictly ascending rows within 1-3 also bound each list to three entries.
pub struct SortedColumnsInvariant;

impl Invariant<Board> for SortedColumnsInvariant {
    fn holds(board: &Board) -> bool {
        [Side::Circle, Side::Cross].into_iter().all(|side| {
            Column::ALL.into_iter().all(|column| {
                let rows = board.positions(side).column(column);
                rows.iter().all(|row| ROWS.contains(row))
                    && rows.windows(2).all(|pair| pair[0] < pair[1])
            })
        })
    }

    fn description() -> &'static str {
        "Column lists are ascending, duplicate-free and within rows 1-3"
    }
}
