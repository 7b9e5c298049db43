//! The rules engine: validate, apply, evaluate, advance.
//!
//! Every function takes snapshots and returns new values. Nothing here
//! keeps state between calls, so callers are free to store boards and turn
//! state wherever they like.

use super::action::{Move, MoveError};
use super::invariants::{BoardInvariants, InvariantSet};
use super::rules;
use super::{Board, Status, TurnState};
use tracing::{debug, error, info, instrument, warn};

/// Checks a proposed move against the board and turn order.
///
/// Checks run in order and stop at the first failure:
/// 1. position legal, else [`MoveError::InvalidPosition`]
/// 2. board unfinished, else [`MoveError::GameAlreadyFinished`]
/// 3. cell free, else [`MoveError::PositionTaken`]
/// 4. acting side is next, else [`MoveError::NotYourTurn`]
#[instrument(skip(board, turn), fields(status = %board.status(), next = ?turn.next()))]
pub fn validate_move(board: &Board, turn: &TurnState, action: &Move) -> Result<(), MoveError> {
    let cell = action.cell()?;

    if board.status().is_terminal() {
        debug!("Board is terminal");
        return Err(MoveError::GameAlreadyFinished(board.status()));
    }

    if board.is_occupied(cell) {
        debug!(%cell, "Cell already occupied");
        return Err(MoveError::PositionTaken(cell));
    }

    if turn.next() != Some(action.side) {
        debug!(side = %action.side, "Out of turn");
        return Err(MoveError::NotYourTurn(action.side));
    }

    Ok(())
}

/// Places the move and recomputes the status.
///
/// The caller must have validated the move against this board. The row is
/// inserted in ascending order; inserting an existing row is a no-op. A
/// position outside the board cannot be placed and yields an unchanged copy.
#[instrument(skip(board), fields(status = %board.status()))]
pub fn apply_move(board: &Board, action: &Move) -> Board {
    let cell = match action.cell() {
        Ok(cell) => cell,
        Err(e) => {
            warn!(error = %e, "Unvalidated move reached apply_move, board unchanged");
            return board.clone();
        }
    };

    let mut next = board.clone();
    next.positions_mut(action.side).insert(cell);
    next.status = evaluate_status(&next);

    if let Err(violations) = BoardInvariants::check_all(&next) {
        let descriptions = violations
            .iter()
            .map(|v| v.description.as_str())
            .collect::<Vec<_>>()
            .join("; ");
        error!(violations = %descriptions, "Board invariants violated after move");
    }

    info!(%cell, side = %action.side, status = %next.status, "Move applied");
    next
}

/// Computes the status from both sides' positions.
///
/// Circle is checked before cross. With no winner the board is a draw once
/// all nine cells are taken.
#[instrument(skip(board))]
pub fn evaluate_status(board: &Board) -> Status {
    if let Some(winner) = rules::check_winner(board) {
        return Status::won_by(winner);
    }

    if rules::is_full(board) {
        Status::Draw
    } else {
        Status::Unfinished
    }
}

/// Turn state after a move that produced `status`.
#[instrument]
pub fn advance_turn(previous: TurnState, status: Status) -> TurnState {
    if status.is_terminal() {
        return TurnState::finished();
    }

    match previous.next() {
        Some(side) => TurnState::to_move(side.opponent()),
        None => TurnState::finished(),
    }
}

/// New board and turn state after an accepted move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    /// Board with the move placed and status recomputed.
    pub board: Board,
    /// Turn state after the move.
    pub turn: TurnState,
}

impl Transition {
    /// Status of the new board.
    pub fn status(&self) -> Status {
        self.board.status()
    }
}

/// Validates, applies and advances in one step.
#[instrument(skip(board, turn))]
pub fn play(board: &Board, turn: &TurnState, action: &Move) -> Result<Transition, MoveError> {
    validate_move(board, turn, action)?;
    let board = apply_move(board, action);
    let turn = advance_turn(*turn, board.status());
    Ok(Transition { board, turn })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Cell, Column, Positions, Side};

    #[test]
    fn test_validate_accepts_first_circle_move() {
        let action = Move::new(Side::Circle, 'B', 2);
        assert!(validate_move(&Board::new(), &TurnState::new(), &action).is_ok());
    }

    #[test]
    fn test_invalid_position_checked_before_turn() {
        // Cross is out of turn too, but the position check runs first.
        let action = Move::new(Side::Cross, 'D', 1);
        assert_eq!(
            validate_move(&Board::new(), &TurnState::new(), &action),
            Err(MoveError::InvalidPosition("D_1".to_string()))
        );
    }

    #[test]
    fn test_finished_checked_before_occupancy() {
        let board = Board::from_parts(
            Positions::from_columns(vec![1, 2, 3], vec![], vec![]),
            Positions::from_columns(vec![], vec![1, 2], vec![]),
            Status::CircleWins,
        );
        let action = Move::new(Side::Cross, 'A', 1);
        assert_eq!(
            validate_move(&board, &TurnState::finished(), &action),
            Err(MoveError::GameAlreadyFinished(Status::CircleWins))
        );
    }

    #[test]
    fn test_occupancy_checked_before_turn() {
        let board = apply_move(&Board::new(), &Move::new(Side::Circle, 'A', 1));
        // Circle again, on its own cell: taken wins over out-of-turn.
        let action = Move::new(Side::Circle, 'A', 1);
        assert_eq!(
            validate_move(&board, &TurnState::to_move(Side::Cross), &action),
            Err(MoveError::PositionTaken(Cell::new(Column::A, 1).unwrap()))
        );
    }

    #[test]
    fn test_no_side_to_move_rejects_everyone() {
        let action = Move::new(Side::Circle, 'A', 1);
        assert_eq!(
            validate_move(&Board::new(), &TurnState::finished(), &action),
            Err(MoveError::NotYourTurn(Side::Circle))
        );
    }

    #[test]
    fn test_apply_keeps_column_sorted() {
        let mut board = Board::new();
        for row in [3, 1] {
            board = apply_move(&board, &Move::new(Side::Cross, 'C', row));
        }
        assert_eq!(board.cross().column(Column::C), &[1, 3]);
        assert_eq!(board.status(), Status::Unfinished);
    }

    #[test]
    fn test_apply_does_not_mutate_input() {
        let board = Board::new();
        let next = apply_move(&board, &Move::new(Side::Circle, 'A', 1));
        assert_eq!(board, Board::new());
        assert_eq!(next.occupied_count(), 1);
    }

    #[test]
    fn test_apply_ignores_unplaceable_position() {
        let board = Board::new();
        let next = apply_move(&board, &Move::new(Side::Circle, 'Z', 9));
        assert_eq!(next, board);
    }

    #[test]
    fn test_advance_flips_on_unfinished() {
        assert_eq!(
            advance_turn(TurnState::new(), Status::Unfinished),
            TurnState::to_move(Side::Cross)
        );
        assert_eq!(
            advance_turn(TurnState::to_move(Side::Cross), Status::Unfinished),
            TurnState::to_move(Side::Circle)
        );
    }

    #[test]
    fn test_advance_clears_on_terminal() {
        for status in [Status::CircleWins, Status::CrossWins, Status::Draw] {
            assert_eq!(advance_turn(TurnState::new(), status), TurnState::finished());
        }
    }

    #[test]
    fn test_play_composes_the_steps() {
        let transition = play(
            &Board::new(),
            &TurnState::new(),
            &Move::new(Side::Circle, 'B', 2),
        )
        .unwrap();
        assert_eq!(transition.turn, TurnState::to_move(Side::Cross));
        assert_eq!(transition.status(), Status::Unfinished);
        assert_eq!(
            transition.board.occupant(Cell::new(Column::B, 2).unwrap()),
            Some(Side::Circle)
        );
    }
}
