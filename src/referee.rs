//! Referee: runs one move against a stored board.
//!
//! Loads the board, works out which side the acting user plays, lets the
//! rules engine judge the move and commits the result at the version that
//! was read. A failed attempt leaves the stored board unchanged.

use noughts_rules::{Move, MoveError, Side, play};
use tracing::{info, instrument, warn};

use crate::store::{BoardRecord, BoardStore, StoreError};

/// Why a play was refused.
#[derive(Debug, Clone, derive_more::Display, derive_more::From)]
pub enum PlayError {
    /// The position is not of the form `<column>_<row>`.
    #[display("Malformed position '{}': expected <column>_<row>, e.g. A_1", _0)]
    Malformed(String),

    /// The rules engine rejected the move.
    #[display("{}", _0)]
    #[from]
    Move(MoveError),

    /// The board could not be loaded or written.
    #[display("{}", _0)]
    #[from]
    Store(StoreError),

    /// The user plays neither side of the board.
    #[display("{} is not a player of board {}", player, board_id)]
    NotAPlayer {
        /// Board that was addressed.
        board_id: i32,
        /// User that tried to move.
        player: String,
    },
}

impl std::error::Error for PlayError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Move(e) => Some(e),
            Self::Store(e) => Some(e),
            Self::Malformed(_) | Self::NotAPlayer { .. } => None,
        }
    }
}

/// Result of an accepted play.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayReport {
    /// Board as committed.
    pub record: BoardRecord,
    /// Side that moved.
    pub side: Side,
}

impl PlayReport {
    /// Message for the player who moved.
    ///
    /// A move can only win for the side that made it, so any winner is the
    /// mover.
    pub fn message(&self) -> &'static str {
        let status = self.record.board().status();
        match status.winner() {
            Some(_) => "Your Victory!",
            None if status.is_terminal() => "Draw.",
            None => "Great! Now wait for your opponent to play.",
        }
    }
}

/// Plays `position` (wire form, e.g. `"B_2"`) for `player` on a stored board.
///
/// # Errors
///
/// Returns [`PlayError::NotAPlayer`] when `player` holds neither side,
/// [`PlayError::Malformed`] when `position` is not `<column>_<row>`,
/// [`PlayError::Move`] when the engine rejects the move (including a
/// well-formed position off the board), and
/// [`PlayError::Store`] when the board is missing or was changed by another
/// writer between load and commit.
#[instrument(skip(store))]
pub fn make_a_play(
    store: &dyn BoardStore,
    board_id: i32,
    player: &str,
    position: &str,
) -> Result<PlayReport, PlayError> {
    let record = store.get(board_id)?;

    let side = record.side_of(player).ok_or_else(|| {
        warn!(board_id, player, "User is not a player of this board");
        PlayError::NotAPlayer {
            board_id,
            player: player.to_string(),
        }
    })?;

    let action = Move::parse(side, position).map_err(|e| {
        warn!(board_id, position, error = %e, "Malformed position");
        PlayError::Malformed(position.to_string())
    })?;
    let transition = play(record.board(), record.turn(), &action).inspect_err(|e| {
        warn!(board_id, %side, error = %e, "Move rejected");
    })?;

    let committed = store.commit(
        board_id,
        *record.version(),
        &transition.board,
        &transition.turn,
    )?;

    info!(
        board_id,
        %side,
        position,
        status = %committed.board().status(),
        "Play accepted"
    );
    Ok(PlayReport {
        record: committed,
        side,
    })
}
