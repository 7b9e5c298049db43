//! Store error types.

use crate::db::DbError;

/// Errors surfaced by a [`BoardStore`](super::BoardStore).
#[derive(Debug, Clone, derive_more::Display, derive_more::From)]
pub enum StoreError {
    /// No board with this ID.
    #[display("Board {} does not exist", _0)]
    NotFound(i32),

    /// Both sides were assigned to the same user.
    #[display("A single user can't play both teams.")]
    SamePlayer,

    /// The board changed between read and write.
    #[display(
        "Board {} was modified concurrently (expected version {}, found {})",
        board_id,
        expected,
        found
    )]
    ConcurrentModification {
        /// Board that was written.
        board_id: i32,
        /// Version the writer read.
        expected: i32,
        /// Version currently stored.
        found: i32,
    },

    /// Stored data failed to decode or breaks board invariants.
    #[display("Board {} holds corrupt data: {}", _0, _1)]
    Corrupt(i32, String),

    /// A board could not be encoded for storage.
    #[display("Board could not be encoded: {}", _0)]
    Encoding(String),

    /// Underlying database failure.
    #[display("{}", _0)]
    #[from]
    Db(DbError),
}

impl std::error::Error for StoreError {}

impl From<diesel::result::Error> for StoreError {
    #[track_caller]
    fn from(err: diesel::result::Error) -> Self {
        Self::Db(DbError::from(err))
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        Self::Encoding(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_failure_is_encoding_error() {
        let json_error = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let error = StoreError::from(json_error);
        assert!(matches!(error, StoreError::Encoding(_)));
        assert!(error.to_string().starts_with("Board could not be encoded"));
    }

    #[test]
    fn test_diesel_failure_is_db_error() {
        let error = StoreError::from(diesel::result::Error::NotFound);
        assert!(matches!(error, StoreError::Db(_)));
        assert!(error.to_string().starts_with("Board database error"));
    }
}
