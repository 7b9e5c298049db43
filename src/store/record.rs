//! Stored board records and the requests that create and list them.

use chrono::NaiveDateTime;
use derive_getters::Getters;
use derive_new::new;
use noughts_rules::{Board, Outcome, Side, TurnState};
use serde::{Deserialize, Serialize};
use tracing::{instrument, warn};

use super::StoreError;

/// A board with its players, turn state and write version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters, new)]
pub struct BoardRecord {
    id: i32,
    player_circle: String,
    player_cross: String,
    board: Board,
    turn: TurnState,
    version: i32,
    created_at: NaiveDateTime,
}

impl BoardRecord {
    /// Side played by the user, if they are one of the two players.
    #[instrument(skip(self), fields(board_id = self.id))]
    pub fn side_of(&self, player: &str) -> Option<Side> {
        if self.player_circle == player {
            Some(Side::Circle)
        } else if self.player_cross == player {
            Some(Side::Cross)
        } else {
            None
        }
    }

    /// User playing the given side.
    pub fn player(&self, side: Side) -> &str {
        match side {
            Side::Circle => &self.player_circle,
            Side::Cross => &self.player_cross,
        }
    }

    /// User expected to move next, `None` once the game is over.
    pub fn next_player(&self) -> Option<&str> {
        self.turn.next().map(|side| self.player(side))
    }
}

/// Request to create a board, checked to have two distinct players.
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct NewBoard {
    player_circle: String,
    player_cross: String,
}

impl NewBoard {
    /// Pairs two users.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::SamePlayer`] if both sides name the same user.
    #[instrument]
    pub fn new(
        player_circle: impl Into<String> + std::fmt::Debug,
        player_cross: impl Into<String> + std::fmt::Debug,
    ) -> Result<Self, StoreError> {
        let player_circle = player_circle.into();
        let player_cross = player_cross.into();
        if player_circle == player_cross {
            warn!(player = %player_circle, "Same user on both sides");
            return Err(StoreError::SamePlayer);
        }
        Ok(Self {
            player_circle,
            player_cross,
        })
    }
}

/// Filter for listing boards.
///
/// `side` and `outcome` are read from `player`'s point of view and are
/// ignored when no player is given.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardFilter {
    /// Only boards this user plays in.
    #[serde(default)]
    pub player: Option<String>,
    /// Only boards where the player holds this side.
    #[serde(default, rename = "player_type")]
    pub side: Option<Side>,
    /// Only finished boards with this outcome for the player.
    #[serde(default, rename = "won")]
    pub outcome: Option<Outcome>,
}

impl BoardFilter {
    /// Filter on boards involving a user.
    pub fn for_player(player: impl Into<String>) -> Self {
        Self {
            player: Some(player.into()),
            ..Self::default()
        }
    }

    /// Narrows to the side the player holds.
    pub fn with_side(mut self, side: Side) -> Self {
        self.side = Some(side);
        self
    }

    /// Narrows to an outcome for the player.
    pub fn with_outcome(mut self, outcome: Outcome) -> Self {
        self.outcome = Some(outcome);
        self
    }

    /// Checks whether a record passes the filter.
    pub fn matches(&self, record: &BoardRecord) -> bool {
        let Some(player) = self.player.as_deref() else {
            return true;
        };
        let Some(side) = record.side_of(player) else {
            return false;
        };
        if self.side.is_some_and(|wanted| wanted != side) {
            return false;
        }
        match self.outcome {
            Some(wanted) => record.board.status().outcome_for(side) == Some(wanted),
            None => true,
        }
    }
}
