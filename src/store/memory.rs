//! In-memory board store.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::Utc;
use noughts_rules::{Board, TurnState};
use tracing::{debug, info, instrument, warn};

use super::{BoardFilter, BoardRecord, BoardStore, NewBoard, StoreError};

#[derive(Debug, Default)]
struct Inner {
    boards: HashMap<i32, BoardRecord>,
    last_id: i32,
}

/// Board store backed by a shared map.
///
/// Clones share the same boards. The version check and the write happen
/// under one lock.
#[derive(Debug, Clone, Default)]
pub struct MemoryBoardStore {
    inner: Arc<Mutex<Inner>>,
}

impl MemoryBoardStore {
    /// Creates an empty store.
    #[instrument]
    pub fn new() -> Self {
        info!("Creating in-memory board store");
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl BoardStore for MemoryBoardStore {
    #[instrument(skip(self, new_board), fields(circle = %new_board.player_circle(), cross = %new_board.player_cross()))]
    fn create(&self, new_board: NewBoard) -> Result<BoardRecord, StoreError> {
        let mut inner = self.lock();
        inner.last_id += 1;
        let record = BoardRecord::new(
            inner.last_id,
            new_board.player_circle().clone(),
            new_board.player_cross().clone(),
            Board::new(),
            TurnState::new(),
            0,
            Utc::now().naive_utc(),
        );
        inner.boards.insert(*record.id(), record.clone());
        info!(board_id = record.id(), "Board created");
        Ok(record)
    }

    #[instrument(skip(self))]
    fn get(&self, id: i32) -> Result<BoardRecord, StoreError> {
        self.lock().boards.get(&id).cloned().ok_or_else(|| {
            debug!(board_id = id, "Board not found");
            StoreError::NotFound(id)
        })
    }

    #[instrument(skip(self))]
    fn list(&self, filter: &BoardFilter) -> Result<Vec<BoardRecord>, StoreError> {
        let mut records: Vec<_> = self
            .lock()
            .boards
            .values()
            .filter(|record| filter.matches(record))
            .cloned()
            .collect();
        records.sort_by(|a, b| {
            b.created_at()
                .cmp(a.created_at())
                .then_with(|| b.id().cmp(a.id()))
        });
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
        let mut inner = self.lock();
        let stored = inner.boards.get_mut(&id).ok_or(StoreError::NotFound(id))?;

        if *stored.version() != expected_version {
            warn!(
                board_id = id,
                expected = expected_version,
                found = stored.version(),
                "Stale write rejected"
            );
            return Err(StoreError::ConcurrentModification {
                board_id: id,
                expected: expected_version,
                found: *stored.version(),
            });
        }

        let updated = BoardRecord::new(
            id,
            stored.player_circle().clone(),
            stored.player_cross().clone(),
            board.clone(),
            *turn,
            expected_version + 1,
            *stored.created_at(),
        );
        *stored = updated.clone();
        debug!(board_id = id, version = updated.version(), "Board committed");
        Ok(updated)
    }
}
