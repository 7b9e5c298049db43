//! Noughts and crosses rules engine.
//!
//! A pure, persistence-agnostic engine for the 3x3 game. Callers hand in a
//! board snapshot, the turn state and a proposed move; the engine answers
//! whether the move is legal and what the board looks like afterwards.
//!
//! # Example
//!
//! ```
//! use noughts_rules::{Board, Move, Side, Status, TurnState, apply_move, advance_turn, validate_move};
//!
//! let board = Board::new();
//! let turn = TurnState::new();
//! let action = Move::parse(Side::Circle, "B_2")?;
//!
//! validate_move(&board, &turn, &action)?;
//! let board = apply_move(&board, &action);
//! let turn = advance_turn(turn, board.status());
//!
//! assert_eq!(board.status(), Status::Unfinished);
//! assert_eq!(turn.next(), Some(Side::Cross));
//! # Ok::<(), noughts_rules::MoveError>(())
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod action;
mod engine;
pub mod invariants;
pub mod rules;
mod types;

pub use action::{Move, MoveError};
pub use engine::{Transition, advance_turn, apply_move, evaluate_status, play, validate_move};
pub use invariants::{BoardInvariants, Invariant, InvariantSet, InvariantViolation};
pub use types::{
    Board, Cell, Column, Outcome, Positions, ROWS, Side, Status, StatusCodeError, TurnState,
};
