//! Win detection.
//!
//! A side wins with a diagonal, a full column, or a row present in all
//! three columns.

use super::super::{Board, Column, Positions, Side};
use std::collections::BTreeSet;
use tracing::instrument;

const DIAGONALS: [[(Column, u8); 3]; 2] = [
    [(Column::A, 1), (Column::B, 2), (Column::C, 3)],
    [(Column::A, 3), (Column::B, 2), (Column::C, 1)],
];

/// `(A,1)&(B,2)&(C,3)` or `(A,3)&(B,2)&(C,1)`.
pub fn has_diagonal(positions: &Positions) -> bool {
    DIAGONALS.iter().any(|line| {
        line.iter()
            .all(|(column, row)| positions.column(*column).contains(row))
    })
}

/// Some column holds exactly rows 1, 2 and 3.
pub fn has_column(positions: &Positions) -> bool {
    Column::ALL
        .into_iter()
        .any(|column| positions.column(column) == [1u8, 2, 3])
}

/// Some row is held in columns A, B and C.
pub fn has_row(positions: &Positions) -> bool {
    let [a, b, c] = Column::ALL.map(|column| {
        positions
            .column(column)
            .iter()
            .copied()
            .collect::<BTreeSet<u8>>()
    });
    a.intersection(&b).any(|row| c.contains(row))
}

/// Any winning pattern.
pub fn is_winning(positions: &Positions) -> bool {
    has_diagonal(positions) || has_column(positions) || has_row(positions)
}

/// Returns the winning side. Circle is checked first.
#[instrument(skip(board))]
pub fn check_winner(board: &Board) -> Option<Side> {
    [Side::Circle, Side::Cross]
        .into_iter()
        .find(|side| is_winning(board.positions(*side)))
}
