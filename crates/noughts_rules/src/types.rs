//! Core domain types for noughts and crosses.

use serde::{Deserialize, Serialize};
use tracing::instrument;

/// One of the two sides of a game.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Side {
    /// Circle (side A, moves first).
    Circle,
    /// Cross (side B).
    Cross,
}

impl Side {
    /// Returns the other side.
    pub fn opponent(self) -> Self {
        match self {
            Side::Circle => Side::Cross,
            Side::Cross => Side::Circle,
        }
    }

    /// Mark drawn on the board for this side.
    pub fn mark(self) -> char {
        match self {
            Side::Circle => 'O',
            Side::Cross => 'X',
        }
    }
}

/// A vertical lane of the board.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumIter,
)]
pub enum Column {
    /// Left column.
    A,
    /// Middle column.
    B,
    /// Right column.
    C,
}

impl Column {
    /// All columns, left to right.
    pub const ALL: [Column; 3] = [Column::A, Column::B, Column::C];

    /// Parses a column label. Only capital `A`, `B` and `C` are accepted.
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            'A' => Some(Column::A),
            'B' => Some(Column::B),
            'C' => Some(Column::C),
            _ => None,
        }
    }

    /// Column label.
    pub fn as_char(self) -> char {
        match self {
            Column::A => 'A',
            Column::B => 'B',
            Column::C => 'C',
        }
    }
}

/// Legal row numbers, top to bottom.
pub const ROWS: [u8; 3] = [1, 2, 3];

/// A validated board cell.
///
/// Only constructible from a legal column and a row in 1-3.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Cell {
    column: Column,
    row: u8,
}

impl Cell {
    /// Creates a cell, or `None` if the row is outside 1-3.
    pub fn new(column: Column, row: u8) -> Option<Self> {
        ROWS.contains(&row).then_some(Self { column, row })
    }

    /// Creates a cell from raw input, or `None` if either part is illegal.
    pub fn from_raw(column: char, row: u8) -> Option<Self> {
        Column::from_char(column).and_then(|column| Self::new(column, row))
    }

    /// Returns the column.
    pub fn column(&self) -> Column {
        self.column
    }

    /// Returns the row (1-3).
    pub fn row(&self) -> u8 {
        self.row
    }

    /// All nine cells in column-then-row order.
    pub fn all() -> impl Iterator<Item = Cell> {
        Column::ALL
            .into_iter()
            .flat_map(|column| ROWS.into_iter().map(move |row| Cell { column, row }))
    }
}

impl std::fmt::Display for Cell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}_{}", self.column, self.row)
    }
}

/// Rows occupied by one side, per column.
///
/// Serializes as `{"A": [..], "B": [..], "C": [..]}`. Each list is kept
/// ascending and duplicate-free by the engine.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Positions {
    #[serde(rename = "A", default)]
    a: Vec<u8>,
    #[serde(rename = "B", default)]
    b: Vec<u8>,
    #[serde(rename = "C", default)]
    c: Vec<u8>,
}

impl Positions {
    /// Creates empty positions.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds positions from raw column lists, as read from storage.
    ///
    /// The lists are taken as-is; use the board invariants to check them.
    pub fn from_columns(a: Vec<u8>, b: Vec<u8>, c: Vec<u8>) -> Self {
        Self { a, b, c }
    }

    /// Rows occupied in the given column.
    pub fn column(&self, column: Column) -> &[u8] {
        match column {
            Column::A => &self.a,
            Column::B => &self.b,
            Column::C => &self.c,
        }
    }

    fn column_mut(&mut self, column: Column) -> &mut Vec<u8> {
        match column {
            Column::A => &mut self.a,
            Column::B => &mut self.b,
            Column::C => &mut self.c,
        }
    }

    /// Checks whether the cell is occupied by this side.
    pub fn contains(&self, cell: Cell) -> bool {
        self.column(cell.column).contains(&cell.row)
    }

    /// Inserts a row keeping the column ascending. Returns false if it was already present.
    pub(crate) fn insert(&mut self, cell: Cell) -> bool {
        let rows = self.column_mut(cell.column);
        match rows.binary_search(&cell.row) {
            Ok(_) => false,
            Err(at) => {
                rows.insert(at, cell.row);
                true
            }
        }
    }

    /// Number of occupied cells.
    pub fn len(&self) -> usize {
        self.a.len() + self.b.len() + self.c.len()
    }

    /// True if no cell is occupied.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Occupied cells, skipping any row outside 1-3.
    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        Column::ALL.into_iter().flat_map(move |column| {
            self.column(column)
                .iter()
                .filter_map(move |&row| Cell::new(column, row))
        })
    }
}

/// Game status with the numeric codes used in storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Status {
    /// Game is ongoing (code 1).
    Unfinished,
    /// Cross won (code 2).
    CrossWins,
    /// Circle won (code 3).
    CircleWins,
    /// Board full with no winner (code 4).
    Draw,
}

impl Status {
    /// Numeric code (1-4).
    pub fn code(self) -> u8 {
        match self {
            Status::Unfinished => 1,
            Status::CrossWins => 2,
            Status::CircleWins => 3,
            Status::Draw => 4,
        }
    }

    /// Human-readable label.
    pub fn label(self) -> &'static str {
        match self {
            Status::Unfinished => "Unfinished",
            Status::CrossWins => "Cross Victory",
            Status::CircleWins => "Circle Victory",
            Status::Draw => "Draw",
        }
    }

    /// True for any status other than `Unfinished`.
    pub fn is_terminal(self) -> bool {
        self != Status::Unfinished
    }

    /// Winning side, if any.
    pub fn winner(self) -> Option<Side> {
        match self {
            Status::CircleWins => Some(Side::Circle),
            Status::CrossWins => Some(Side::Cross),
            Status::Unfinished | Status::Draw => None,
        }
    }

    /// Status for a win by the given side.
    pub fn won_by(side: Side) -> Self {
        match side {
            Side::Circle => Status::CircleWins,
            Side::Cross => Status::CrossWins,
        }
    }

    /// Outcome from one side's perspective. `None` while unfinished.
    #[instrument]
    pub fn outcome_for(self, side: Side) -> Option<Outcome> {
        match self {
            Status::Unfinished => None,
            Status::Draw => Some(Outcome::Draw),
            won => match won.winner() {
                Some(winner) if winner == side => Some(Outcome::Victory),
                _ => Some(Outcome::Defeat),
            },
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl From<Status> for u8 {
    fn from(status: Status) -> Self {
        status.code()
    }
}

/// A status code outside 1-4.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
#[display("Invalid status code {}, expected 1-4", _0)]
pub struct StatusCodeError(pub u8);

impl std::error::Error for StatusCodeError {}

impl TryFrom<u8> for Status {
    type Error = StatusCodeError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            1 => Ok(Status::Unfinished),
            2 => Ok(Status::CrossWins),
            3 => Ok(Status::CircleWins),
            4 => Ok(Status::Draw),
            other => Err(StatusCodeError(other)),
        }
    }
}

/// Result of a finished game from one side's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    /// The side won.
    #[serde(rename = "won")]
    Victory,
    /// The side lost.
    #[serde(rename = "loss")]
    Defeat,
    /// Nobody won.
    #[serde(rename = "draw")]
    Draw,
}

/// 3x3 board snapshot: both sides' positions plus the status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    #[serde(rename = "positions_circle")]
    pub(crate) circle: Positions,
    #[serde(rename = "positions_cross")]
    pub(crate) cross: Positions,
    pub(crate) status: Status,
}

impl Board {
    /// Creates an empty, unfinished board.
    pub fn new() -> Self {
        Self {
            circle: Positions::new(),
            cross: Positions::new(),
            status: Status::Unfinished,
        }
    }

    /// Rebuilds a board from stored parts.
    pub fn from_parts(circle: Positions, cross: Positions, status: Status) -> Self {
        Self {
            circle,
            cross,
            status,
        }
    }

    /// Circle's positions.
    pub fn circle(&self) -> &Positions {
        &self.circle
    }

    /// Cross's positions.
    pub fn cross(&self) -> &Positions {
        &self.cross
    }

    /// Positions of the given side.
    pub fn positions(&self, side: Side) -> &Positions {
        match side {
            Side::Circle => &self.circle,
            Side::Cross => &self.cross,
        }
    }

    pub(crate) fn positions_mut(&mut self, side: Side) -> &mut Positions {
        match side {
            Side::Circle => &mut self.circle,
            Side::Cross => &mut self.cross,
        }
    }

    /// Current status.
    pub fn status(&self) -> Status {
        self.status
    }

    /// Side occupying the cell, if any.
    pub fn occupant(&self, cell: Cell) -> Option<Side> {
        if self.circle.contains(cell) {
            Some(Side::Circle)
        } else if self.cross.contains(cell) {
            Some(Side::Cross)
        } else {
            None
        }
    }

    /// Checks whether either side holds the cell.
    pub fn is_occupied(&self, cell: Cell) -> bool {
        self.occupant(cell).is_some()
    }

    /// Total occupied cells across both sides.
    pub fn occupied_count(&self) -> usize {
        self.circle.len() + self.cross.len()
    }

    /// Open cells in column-then-row order.
    #[instrument(skip(self))]
    pub fn free_cells(&self) -> Vec<Cell> {
        Cell::all().filter(|cell| !self.is_occupied(*cell)).collect()
    }

    /// Renders the board as a text grid.
    ///
    /// ```text
    ///   A B C
    /// 1 O . X
    /// 2 . O .
    /// 3 X . .
    /// ```
    pub fn render(&self) -> String {
        let mut out = String::from("  A B C");
        for row in ROWS {
            out.push('\n');
            out.push_str(&row.to_string());
            for column in Column::ALL {
                let mark = Cell::new(column, row)
                    .and_then(|cell| self.occupant(cell))
                    .map(Side::mark)
                    .unwrap_or('.');
                out.push(' ');
                out.push(mark);
            }
        }
        out
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

/// Whose turn it is, tracked alongside the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TurnState {
    next: Option<Side>,
}

impl TurnState {
    /// Turn state of a fresh game: circle to move.
    pub fn new() -> Self {
        Self {
            next: Some(Side::Circle),
        }
    }

    /// Turn state with the given side to move.
    pub fn to_move(side: Side) -> Self {
        Self { next: Some(side) }
    }

    /// Turn state of a terminal board.
    pub fn finished() -> Self {
        Self { next: None }
    }

    /// Side to move next, `None` once the game is over.
    pub fn next(&self) -> Option<Side> {
        self.next
    }
}

impl Default for TurnState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_keeps_column_sorted() {
        let mut positions = Positions::new();
        for row in [3, 1, 2] {
            assert!(positions.insert(Cell::new(Column::A, row).unwrap()));
        }
        assert_eq!(positions.column(Column::A), &[1, 2, 3]);
    }

    #[test]
    fn test_insert_rejects_duplicate() {
        let mut positions = Positions::new();
        let cell = Cell::new(Column::B, 2).unwrap();
        assert!(positions.insert(cell));
        assert!(!positions.insert(cell));
        assert_eq!(positions.column(Column::B), &[2]);
    }

    #[test]
    fn test_cell_rejects_illegal_values() {
        assert!(Cell::from_raw('D', 1).is_none());
        assert!(Cell::from_raw('a', 1).is_none());
        assert!(Cell::from_raw('A', 0).is_none());
        assert!(Cell::from_raw('A', 4).is_none());
        assert_eq!(Cell::from_raw('C', 3).unwrap().to_string(), "C_3");
    }

    #[test]
    fn test_status_codes_round_trip() {
        for code in 1..=4u8 {
            let status = Status::try_from(code).unwrap();
            assert_eq!(status.code(), code);
        }
        assert_eq!(Status::try_from(0), Err(StatusCodeError(0)));
        assert_eq!(Status::try_from(5), Err(StatusCodeError(5)));
    }

    #[test]
    fn test_outcome_for_each_side() {
        assert_eq!(Status::Unfinished.outcome_for(Side::Circle), None);
        assert_eq!(Status::CircleWins.outcome_for(Side::Circle), Some(Outcome::Victory));
        assert_eq!(Status::CircleWins.outcome_for(Side::Cross), Some(Outcome::Defeat));
        assert_eq!(Status::CrossWins.outcome_for(Side::Cross), Some(Outcome::Victory));
        assert_eq!(Status::Draw.outcome_for(Side::Cross), Some(Outcome::Draw));
    }

    #[test]
    fn test_board_serializes_like_stored_json() {
        let mut board = Board::new();
        board.circle.insert(Cell::new(Column::A, 1).unwrap());
        let json = serde_json::to_value(&board).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "positions_circle": {"A": [1], "B": [], "C": []},
                "positions_cross": {"A": [], "B": [], "C": []},
                "status": 1
            })
        );
    }

    #[test]
    fn test_render_marks_both_sides() {
        let mut board = Board::new();
        board.circle.insert(Cell::new(Column::A, 1).unwrap());
        board.cross.insert(Cell::new(Column::C, 3).unwrap());
        assert_eq!(board.render(), "  A B C\n1 O . .\n2 . . .\n3 . . X");
    }

    #[test]
    fn test_free_cells_excludes_occupied() {
        let mut board = Board::new();
        board.cross.insert(Cell::new(Column::B, 2).unwrap());
        let free = board.free_cells();
        assert_eq!(free.len(), 8);
        assert!(!free.contains(&Cell::new(Column::B, 2).unwrap()));
    }
}
