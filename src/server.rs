//! HTTP API for boards.
//!
//! Handlers run store calls on the blocking pool; the referee and both
//! stores are synchronous.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, Query, State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument, warn};

use crate::referee::{PlayError, make_a_play};
use crate::store::{BoardFilter, BoardRecord, BoardStore, NewBoard, StoreError};
use noughts_rules::MoveError;

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    store: Arc<dyn BoardStore>,
}

/// Builds the API router over a board store.
#[instrument(skip(store))]
pub fn router(store: Arc<dyn BoardStore>) -> Router {
    info!("Building board API router");
    Router::new()
        .route("/api/boards", post(create_board).get(list_boards))
        .route("/api/boards/{id}", get(get_board))
        .route("/api/make-a-play", post(play_move))
        .route("/api/schema/make-a-play", get(make_a_play_schema))
        .with_state(AppState { store })
}

/// Request to create a board.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CreateBoardRequest {
    /// User playing circle, who moves first.
    pub player_circle: String,
    /// User playing cross.
    pub player_cross: String,
}

/// Request to play one move.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct MakeAPlayRequest {
    /// Board to play on.
    pub board_id: i32,
    /// Target cell as `<column>_<row>`, e.g. `"A_1"`.
    pub position: String,
    /// Acting user.
    pub player: String,
}

/// Response to an accepted move.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayResponse {
    /// Always `true`; failures use the error body.
    pub success: bool,
    /// Message for the player who moved.
    pub message: String,
}

/// A board record with its rendered grid.
#[derive(Debug, Clone, Serialize)]
pub struct BoardView {
    /// Stored record.
    #[serde(flatten)]
    pub record: BoardRecord,
    /// Human-readable status.
    pub status_label: &'static str,
    /// Text grid of the board.
    pub rendered: String,
}

impl From<BoardRecord> for BoardView {
    fn from(record: BoardRecord) -> Self {
        let status_label = record.board().status().label();
        let rendered = record.board().render();
        Self {
            record,
            status_label,
            rendered,
        }
    }
}

/// Error body `{type, errors}` with its status code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    status: StatusCode,
    errors: Vec<String>,
}

impl ApiError {
    /// Creates an error with a single message.
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            errors: vec![message.into()],
        }
    }

    /// Status code of the response.
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Machine-readable kind, e.g. `BAD_REQUEST`.
    pub fn kind(&self) -> String {
        self.status
            .canonical_reason()
            .unwrap_or("Unknown")
            .to_uppercase()
            .replace(' ', "_")
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = serde_json::json!({
            "type": self.kind(),
            "errors": self.errors,
        });
        (self.status, Json(body)).into_response()
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        let status = match &err {
            StoreError::NotFound(_) => StatusCode::NOT_FOUND,
            StoreError::SamePlayer => StatusCode::BAD_REQUEST,
            StoreError::ConcurrentModification { .. } => StatusCode::CONFLICT,
            StoreError::Corrupt(..) | StoreError::Encoding(_) | StoreError::Db(_) => {
                error!(error = %err, "Store failure");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        Self::new(status, err.to_string())
    }
}

impl From<PlayError> for ApiError {
    fn from(err: PlayError) -> Self {
        match err {
            PlayError::Malformed(_) => Self::new(StatusCode::PRECONDITION_FAILED, err.to_string()),
            PlayError::Move(_) | PlayError::NotAPlayer { .. } => {
                Self::new(StatusCode::BAD_REQUEST, err.to_string())
            }
            PlayError::Store(StoreError::NotFound(_)) => {
                Self::new(StatusCode::BAD_REQUEST, err.to_string())
            }
            PlayError::Store(store) => Self::from(store),
        }
    }
}

impl From<tokio::task::JoinError> for ApiError {
    fn from(err: tokio::task::JoinError) -> Self {
        error!(error = %err, "Blocking task failed");
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal error")
    }
}

#[instrument(skip(state, request), fields(circle = %request.player_circle, cross = %request.player_cross))]
async fn create_board(
    State(state): State<AppState>,
    Json(request): Json<CreateBoardRequest>,
) -> Result<(StatusCode, Json<BoardView>), ApiError> {
    let new_board = NewBoard::new(request.player_circle, request.player_cross)?;
    let store = state.store.clone();
    let record = tokio::task::spawn_blocking(move || store.create(new_board)).await??;
    info!(board_id = record.id(), "Board created via API");
    Ok((StatusCode::CREATED, Json(BoardView::from(record))))
}

#[instrument(skip(state))]
async fn list_boards(
    State(state): State<AppState>,
    Query(filter): Query<BoardFilter>,
) -> Result<Json<Vec<BoardView>>, ApiError> {
    let store = state.store.clone();
    let records = tokio::task::spawn_blocking(move || store.list(&filter)).await??;
    debug!(count = records.len(), "Boards listed via API");
    Ok(Json(records.into_iter().map(BoardView::from).collect()))
}

#[instrument(skip(state))]
async fn get_board(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<BoardView>, ApiError> {
    let store = state.store.clone();
    let record = tokio::task::spawn_blocking(move || store.get(id)).await??;
    Ok(Json(BoardView::from(record)))
}

#[instrument(skip(state, payload))]
async fn play_move(
    State(state): State<AppState>,
    payload: Result<Json<MakeAPlayRequest>, JsonRejection>,
) -> Result<Json<PlayResponse>, ApiError> {
    let Json(request) = payload.map_err(|rejection| {
        warn!(error = %rejection.body_text(), "Malformed play request");
        ApiError::new(StatusCode::PRECONDITION_FAILED, rejection.body_text())
    })?;

    let store = state.store.clone();
    let report = tokio::task::spawn_blocking(move || {
        make_a_play(
            store.as_ref(),
            request.board_id,
            &request.player,
            &request.position,
        )
    })
    .await??;

    Ok(Json(PlayResponse {
        success: true,
        message: report.message().to_string(),
    }))
}

async fn make_a_play_schema() -> Json<schemars::Schema> {
    Json(schemars::schema_for!(MakeAPlayRequest))
}

#[cfg(test)]
mod tests {
    use super::*;
    use noughts_rules::Side;

    #[test]
    fn test_error_kinds() {
        assert_eq!(
            ApiError::new(StatusCode::PRECONDITION_FAILED, "x").kind(),
            "PRECONDITION_FAILED"
        );
        assert_eq!(ApiError::new(StatusCode::BAD_REQUEST, "x").kind(), "BAD_REQUEST");
        assert_eq!(ApiError::new(StatusCode::CONFLICT, "x").kind(), "CONFLICT");
    }

    #[test]
    fn test_play_error_status_mapping() {
        let cases = [
            (
                PlayError::Malformed("A 1".to_string()),
                StatusCode::PRECONDITION_FAILED,
            ),
            (
                PlayError::Move(MoveError::InvalidPosition("D_1".to_string())),
                StatusCode::BAD_REQUEST,
            ),
            (
                PlayError::Move(MoveError::NotYourTurn(Side::Cross)),
                StatusCode::BAD_REQUEST,
            ),
            (
                PlayError::NotAPlayer {
                    board_id: 1,
                    player: "mallory".to_string(),
                },
                StatusCode::BAD_REQUEST,
            ),
            (
                PlayError::Store(StoreError::NotFound(4)),
                StatusCode::BAD_REQUEST,
            ),
            (
                PlayError::Store(StoreError::ConcurrentModification {
                    board_id: 1,
                    expected: 0,
                    found: 1,
                }),
                StatusCode::CONFLICT,
            ),
        ];
        for (err, status) in cases {
            assert_eq!(ApiError::from(err).status(), status);
        }
    }
}
