//! Game rules for noughts and crosses.
//!
//! Pure functions over position lists. They never look at the stored
//! status, so the engine can call them on a freshly applied board.

pub mod draw;
pub mod win;

pub use draw::{is_draw, is_full};
pub use win::{check_winner, has_column, has_diagonal, has_row, is_winning};
