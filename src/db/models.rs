//! Database models for boards.

use std::str::FromStr;

use chrono::NaiveDateTime;
use derive_new::new;
use diesel::prelude::*;
use noughts_rules::{
    Board, BoardInvariants, InvariantSet, Positions, Side, Status, TurnState,
};
use tracing::{instrument, warn};

use crate::db::schema;
use crate::store::{BoardRecord, NewBoard, StoreError};

/// Board row as stored.
///
/// Positions are JSON objects (`{"A": [..], "B": [..], "C": [..]}`), the
/// status is its numeric code, and the next player is `"circle"`, `"cross"`
/// or NULL once the game is over.
#[derive(Debug, Clone, Queryable, Identifiable, Selectable)]
#[diesel(table_name = schema::boards)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct BoardRow {
    id: i32,
    player_circle: String,
    player_cross: String,
    positions_circle: String,
    positions_cross: String,
    status: i32,
    next_player: Option<String>,
    version: i32,
    created_at: NaiveDateTime,
}

impl BoardRow {
    /// Decodes the row into a record.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Corrupt`] if a column fails to decode or the
    /// positions break the board invariants.
    #[instrument(skip(self), fields(board_id = self.id))]
    pub fn into_record(self) -> Result<BoardRecord, StoreError> {
        let id = self.id;
        let corrupt = |message: String| {
            warn!(board_id = id, %message, "Corrupt board row");
            StoreError::Corrupt(id, message)
        };

        let circle: Positions = serde_json::from_str(&self.positions_circle)
            .map_err(|e| corrupt(format!("positions_circle: {}", e)))?;
        let cross: Positions = serde_json::from_str(&self.positions_cross)
            .map_err(|e| corrupt(format!("positions_cross: {}", e)))?;
        let status = u8::try_from(self.status)
            .ok()
            .and_then(|code| Status::try_from(code).ok())
            .ok_or_else(|| corrupt(format!("status code {}", self.status)))?;
        let turn = match self.next_player.as_deref() {
            None => TurnState::finished(),
            Some(raw) => Side::from_str(raw)
                .map(TurnState::to_move)
                .map_err(|_| corrupt(format!("next_player '{}'", raw)))?,
        };

        let board = Board::from_parts(circle, cross, status);
        if let Err(violations) = BoardInvariants::check_all(&board) {
            let descriptions = violations
                .iter()
                .map(|v| v.description.as_str())
                .collect::<Vec<_>>()
                .join("; ");
            return Err(corrupt(descriptions));
        }

        Ok(BoardRecord::new(
            id,
            self.player_circle,
            self.player_cross,
            board,
            turn,
            self.version,
            self.created_at,
        ))
    }
}

/// Insertable board row for a new game.
#[derive(Debug, Clone, Insertable, new)]
#[diesel(table_name = schema::boards)]
pub struct NewBoardRow {
    player_circle: String,
    player_cross: String,
    positions_circle: String,
    positions_cross: String,
    status: i32,
    next_player: Option<String>,
}

impl NewBoardRow {
    /// Encodes a fresh board for the two players.
    #[instrument(skip(new_board))]
    pub fn fresh(new_board: &NewBoard) -> Result<Self, StoreError> {
        let board = Board::new();
        let turn = TurnState::new();
        let (positions_circle, positions_cross) = encode_positions(&board)?;
        Ok(Self::new(
            new_board.player_circle().clone(),
            new_board.player_cross().clone(),
            positions_circle,
            positions_cross,
            i32::from(board.status().code()),
            encode_turn(&turn),
        ))
    }
}

/// Board columns changed by a move.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = schema::boards)]
#[diesel(treat_none_as_null = true)]
pub struct BoardChanges {
    positions_circle: String,
    positions_cross: String,
    status: i32,
    next_player: Option<String>,
    version: i32,
}

impl BoardChanges {
    /// Encodes the new board and turn state at the next version.
    #[instrument(skip(board, turn))]
    pub fn encode(board: &Board, turn: &TurnState, version: i32) -> Result<Self, StoreError> {
        let (positions_circle, positions_cross) = encode_positions(board)?;
        Ok(Self {
            positions_circle,
            positions_cross,
            status: i32::from(board.status().code()),
            next_player: encode_turn(turn),
            version,
        })
    }
}

fn encode_positions(board: &Board) -> Result<(String, String), StoreError> {
    Ok((
        serde_json::to_string(board.circle())?,
        serde_json::to_string(board.cross())?,
    ))
}

fn encode_turn(turn: &TurnState) -> Option<String> {
    turn.next().map(|side| side.to_string())
}
