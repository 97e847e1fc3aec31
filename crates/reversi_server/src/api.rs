//! REST API over [`ReversiService`].

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use chrono::NaiveDateTime;
use reversi::{Disc, Point};
use serde::{Deserialize, Serialize};
use tracing::{error, instrument, warn};

use crate::repository::{GameSummary, Store};
use crate::service::{ReversiService, TurnSnapshot};
use crate::ServiceError;

/// Builds the router for the game API.
pub fn router<S: Store + 'static>(service: ReversiService<S>) -> Router {
    Router::new()
        .route("/api/games", post(start_game::<S>).get(last_games::<S>))
        .route(
            "/api/games/latest/turns/{turn_count}",
            get(find_turn::<S>),
        )
        .route("/api/games/latest/turns", post(register_turn::<S>))
        .with_state(Arc::new(service))
}

/// Turn as returned by `GET /api/games/latest/turns/{turnCount}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TurnResponse {
    /// Position in the game's history.
    pub turn_count: u32,
    /// 8x8 disc codes, rows top to bottom.
    pub board: Vec<Vec<u8>>,
    /// Next mover code, `null` once ended.
    pub next_disc: Option<u8>,
    /// Winner code once ended, `null` otherwise or on a draw.
    pub winner_disc: Option<u8>,
}

impl From<TurnSnapshot> for TurnResponse {
    fn from(snapshot: TurnSnapshot) -> Self {
        Self {
            turn_count: *snapshot.turn_count(),
            board: snapshot
                .board()
                .discs()
                .iter()
                .map(|row| row.iter().map(|d| d.code()).collect())
                .collect(),
            next_disc: snapshot.next_disc().map(Disc::code),
            winner_disc: snapshot.winner_disc().map(Disc::code),
        }
    }
}

/// Body of `POST /api/games/latest/turns`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterTurnRequest {
    /// Count of the turn being created.
    pub turn_count: u32,
    /// Move to play.
    #[serde(rename = "move")]
    pub mv: MoveBody,
}

/// Move inside a [`RegisterTurnRequest`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MoveBody {
    /// Disc code, 1 (Dark) or 2 (Light).
    pub disc: i32,
    /// Column, 0 to 7.
    pub x: i32,
    /// Row, 0 to 7.
    pub y: i32,
}

impl MoveBody {
    fn point(&self) -> Point {
        // Values outside u8 saturate and are still rejected as off board.
        let coord = |v: i32| u8::try_from(v).unwrap_or(u8::MAX);
        Point::new(coord(self.x), coord(self.y))
    }
}

/// Row of `GET /api/games`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSummaryResponse {
    /// Game identifier.
    pub game_id: i32,
    /// Moves played by Dark.
    pub dark_move_count: u32,
    /// Moves played by Light.
    pub light_move_count: u32,
    /// Winner code, `null` for a draw or an unfinished game.
    pub winner_disc: Option<u8>,
    /// Start time.
    pub started_at: NaiveDateTime,
    /// End time, `null` while running.
    pub end_at: Option<NaiveDateTime>,
}

impl From<GameSummary> for GameSummaryResponse {
    fn from(summary: GameSummary) -> Self {
        Self {
            game_id: *summary.game_id(),
            dark_move_count: *summary.dark_move_count(),
            light_move_count: *summary.light_move_count(),
            winner_disc: summary.winner_disc().map(Disc::code),
            started_at: *summary.started_at(),
            end_at: *summary.end_at(),
        }
    }
}

#[instrument(skip(service))]
async fn start_game<S: Store + 'static>(
    State(service): State<Arc<ReversiService<S>>>,
) -> Result<StatusCode, ApiError> {
    blocking(service, |s| s.start_new_game()).await?;
    Ok(StatusCode::CREATED)
}

#[instrument(skip(service))]
async fn last_games<S: Store + 'static>(
    State(service): State<Arc<ReversiService<S>>>,
) -> Result<Json<Vec<GameSummaryResponse>>, ApiError> {
    let games = blocking(service, |s| s.find_last_games()).await?;
    Ok(Json(games.into_iter().map(GameSummaryResponse::from).collect()))
}

#[instrument(skip(service))]
async fn find_turn<S: Store + 'static>(
    State(service): State<Arc<ReversiService<S>>>,
    turn_count: Result<Path<u32>, PathRejection>,
) -> Result<Json<TurnResponse>, ApiError> {
    let Path(turn_count) = turn_count?;
    let snapshot =
        blocking(service, move |s| s.find_latest_game_turn_by_turn_count(turn_count)).await?;
    Ok(Json(snapshot.into()))
}

#[instrument(skip(service))]
async fn register_turn<S: Store + 'static>(
    State(service): State<Arc<ReversiService<S>>>,
    request: Result<Json<RegisterTurnRequest>, JsonRejection>,
) -> Result<StatusCode, ApiError> {
    let Json(request) = request?;
    let disc = Disc::from_move_code(request.mv.disc).map_err(ServiceError::from)?;
    let point = request.mv.point();
    blocking(service, move |s| s.register_turn(request.turn_count, disc, point)).await?;
    Ok(StatusCode::CREATED)
}

/// Runs a synchronous service call off the async runtime.
async fn blocking<S, T, F>(service: Arc<ReversiService<S>>, f: F) -> Result<T, ApiError>
where
    S: Store + 'static,
    T: Send + 'static,
    F: FnOnce(&ReversiService<S>) -> Result<T, ServiceError> + Send + 'static,
{
    tokio::task::spawn_blocking(move || f(&service))
        .await
        .map_err(|e| ApiError::Internal(format!("Service task failed: {}", e)))?
        .map_err(ApiError::Service)
}

/// Error response: `{ "error": <kind>, "message": <text> }`.
#[derive(Debug, derive_more::Display)]
pub enum ApiError {
    /// Error from the service or the engine.
    #[display("{}", _0)]
    Service(ServiceError),
    /// The path or body did not match the expected shape.
    #[display("{}", _0)]
    InvalidRequest(String),
    /// The request could not be executed.
    #[display("{}", _0)]
    Internal(String),
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        Self::Service(err)
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        Self::InvalidRequest(rejection.body_text())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::InvalidRequest(rejection.body_text())
    }
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            Self::Service(ServiceError::Domain(e)) if e.is_validation() => StatusCode::BAD_REQUEST,
            Self::Service(ServiceError::InvalidTurnCount) | Self::InvalidRequest(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::Service(ServiceError::LatestGameNotFound)
            | Self::Service(ServiceError::TurnNotFound { .. }) => StatusCode::NOT_FOUND,
            Self::Service(ServiceError::Conflict(_)) => StatusCode::CONFLICT,
            Self::Service(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            Self::Service(e) => e.kind(),
            Self::InvalidRequest(_) => "InvalidRequest",
            Self::Internal(_) => "InternalError",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status();
        if status.is_server_error() {
            error!(%status, error = %self, "Request failed");
        } else {
            warn!(%status, error = %self, "Request rejected");
        }

        (
            status,
            Json(serde_json::json!({
                "error": self.kind(),
                "message": self.to_string(),
            })),
        )
            .into_response()
    }
}
