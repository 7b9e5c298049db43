//! SQLite board store.

use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use noughts_rules::{Board, TurnState};
use tracing::{debug, info, instrument, warn};

use crate::db::models::{BoardChanges, BoardRow, NewBoardRow};
use crate::db::{DbError, schema};
use crate::store::{BoardFilter, BoardRecord, BoardStore, NewBoard, StoreError};

/// Migrations bundled into the binary.
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// How long a connection waits for another writer's lock, in milliseconds.
const BUSY_TIMEOUT_MS: u32 = 5_000;

/// Board store backed by a SQLite file.
#[derive(Debug, Clone)]
pub struct SqliteBoardStore {
    db_path: String,
}

impl SqliteBoardStore {
    /// Opens the database at `db_path` and applies pending migrations.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the database can't be opened or migrated.
    #[instrument(skip(db_path), fields(db_path = %db_path))]
    pub fn open(db_path: String) -> Result<Self, DbError> {
        info!(path = %db_path, "Opening board database");
        let store = Self { db_path };
        store.run_migrations()?;
        Ok(store)
    }

    /// Applies pending migrations.
    #[instrument(skip(self))]
    pub fn run_migrations(&self) -> Result<(), DbError> {
        let mut conn = self.connection()?;
        let applied = conn
            .run_pending_migrations(MIGRATIONS)
            .map_err(|e| DbError::new(format!("Migrations failed: {}", e)))?;
        info!(count = applied.len(), "Migrations applied");
        Ok(())
    }

    /// Establishes a database connection.
    ///
    /// Writers queue on the database lock for up to [`BUSY_TIMEOUT_MS`], so a
    /// losing concurrent commit reaches the version check instead of failing
    /// with `database is locked`.
    #[instrument(skip(self))]
    fn connection(&self) -> Result<SqliteConnection, DbError> {
        debug!(path = %self.db_path, "Establishing connection");
        let mut conn = SqliteConnection::establish(&self.db_path)
            .map_err(|e| DbError::new(format!("Failed to connect to '{}': {}", self.db_path, e)))?;
        conn.batch_execute(&format!("PRAGMA busy_timeout = {};", BUSY_TIMEOUT_MS))?;
        Ok(conn)
    }
}

impl BoardStore for SqliteBoardStore {
    #[instrument(skip(self, new_board), fields(circle = %new_board.player_circle(), cross = %new_board.player_cross()))]
    fn create(&self, new_board: NewBoard) -> Result<BoardRecord, StoreError> {
        let mut conn = self.connection()?;
        let row = NewBoardRow::fresh(&new_board)?;

        let created = diesel::insert_into(schema::boards::table)
            .values(&row)
            .returning(BoardRow::as_returning())
            .get_result::<BoardRow>(&mut conn)?
            .into_record()?;

        info!(board_id = created.id(), "Board created");
        Ok(created)
    }

    #[instrument(skip(self))]
    fn get(&self, id: i32) -> Result<BoardRecord, StoreError> {
        let mut conn = self.connection()?;

        schema::boards::table
            .find(id)
            .select(BoardRow::as_select())
            .first::<BoardRow>(&mut conn)
            .optional()?
            .ok_or_else(|| {
                debug!(board_id = id, "Board not found");
                StoreError::NotFound(id)
            })?
            .into_record()
    }

    #[instrument(skip(self))]
    fn list(&self, filter: &BoardFilter) -> Result<Vec<BoardRecord>, StoreError> {
        use schema::boards::dsl;

        let mut conn = self.connection()?;
        let mut query = dsl::boards.select(BoardRow::as_select()).into_boxed();
        if let Some(player) = filter.player.clone() {
            query = query.filter(
                dsl::player_circle
                    .eq(player.clone())
                    .or(dsl::player_cross.eq(player)),
            );
        }

        let records = query
            .order((dsl::created_at.desc(), dsl::id.desc()))
            .load::<BoardRow>(&mut conn)?
            .into_iter()
            .map(BoardRow::into_record)
            .filter(|record| record.as_ref().map_or(true, |r| filter.matches(r)))
            .collect::<Result<Vec<_>, _>>()?;

        debug!(count = records.len(), "Boards listed");
        Ok(records)
    }

    #[instrument(skip(self, board, turn), fields(status = %board.status()))]
    fn commit(
        &self,
        id: i32,
        expected_version: i32,
        board: &Board,
        turn: &TurnState,
    ) -> Result<BoardRecord, StoreError> {
        use schema::boards::dsl;

        let mut conn = self.connection()?;
        let changes = BoardChanges::encode(board, turn, expected_version + 1)?;

        let row = conn.immediate_transaction::<_, StoreError, _>(|conn| {
            let found = dsl::boards
                .find(id)
                .select(dsl::version)
                .first::<i32>(conn)
                .optional()?
                .ok_or(StoreError::NotFound(id))?;

            if found != expected_version {
                warn!(board_id = id, expected = expected_version, found, "Stale write rejected");
                return Err(StoreError::ConcurrentModification {
                    board_id: id,
                    expected: expected_version,
                    found,
                });
            }

            Ok(diesel::update(
                dsl::boards
                    .filter(dsl::id.eq(id))
                    .filter(dsl::version.eq(expected_version)),
            )
            .set(&changes)
            .returning(BoardRow::as_returning())
            .get_result::<BoardRow>(conn)?)
        })?;

        let committed = row.into_record()?;
        debug!(board_id = id, version = committed.version(), "Board committed");
        Ok(committed)
    }
}
