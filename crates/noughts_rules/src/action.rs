//! Move requests and the errors that reject them.
//!
//! A move carries raw column and row values so that malformed input can
//! reach validation and be rejected with a precise error.

use super::{Cell, Side, Status};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// A side's request to mark a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    /// Column label, legal values are `A`, `B` and `C`.
    pub column: char,
    /// Row number, legal values are 1-3.
    pub row: u8,
    /// The side making the move.
    pub side: Side,
}

impl Move {
    /// Creates a move from raw parts.
    pub fn new(side: Side, column: char, row: u8) -> Self {
        Self { column, row, side }
    }

    /// Creates a move targeting a known-good cell.
    pub fn at(side: Side, cell: Cell) -> Self {
        Self::new(side, cell.column().as_char(), cell.row())
    }

    /// Parses the wire form `"<column>_<row>"`, e.g. `"A_1"`.
    ///
    /// Only the shape is checked here: `"D_1"` parses and is rejected later
    /// by validation. A string without a single-character column, an
    /// underscore and an integer row is `InvalidPosition`.
    #[instrument]
    pub fn parse(side: Side, position: &str) -> Result<Self, MoveError> {
        let invalid = || MoveError::InvalidPosition(position.to_string());

        let (column, row) = position.trim().split_once('_').ok_or_else(invalid)?;
        let mut chars = column.chars();
        let column = match (chars.next(), chars.next()) {
            (Some(c), None) => c,
            _ => return Err(invalid()),
        };
        let row = row.parse::<u8>().map_err(|_| invalid())?;

        debug!(%column, row, "Parsed move position");
        Ok(Self::new(side, column, row))
    }

    /// The targeted cell, if the position is legal.
    pub fn cell(&self) -> Result<Cell, MoveError> {
        Cell::from_raw(self.column, self.row).ok_or_else(|| {
            MoveError::InvalidPosition(format!("{}_{}", self.column, self.row))
        })
    }
}

impl std::fmt::Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} -> {}_{}", self.side, self.column, self.row)
    }
}

/// Why a move was rejected.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum MoveError {
    /// Column or row outside the legal alphabet, or an unparseable position.
    #[display("Invalid position '{}': column must be A-C and row 1-3", _0)]
    InvalidPosition(String),

    /// The board is already won or drawn.
    #[display("Game is already finished ({})", _0)]
    GameAlreadyFinished(Status),

    /// Either side already holds the cell.
    #[display("Position {} is already taken", _0)]
    PositionTaken(Cell),

    /// The acting side is not the side to move.
    #[display("It's not {}'s turn", _0)]
    NotYourTurn(Side),
}

impl std::error::Error for MoveError {}
