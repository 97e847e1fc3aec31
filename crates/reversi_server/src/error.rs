//! Use-case level errors.

use reversi::{DomainError, GameId};
use tracing::warn;

use crate::db::DbError;

/// Error returned by the service and the persistence boundary.
///
/// Engine errors pass through unchanged in [`ServiceError::Domain`].
#[derive(Debug, Clone, derive_more::Display)]
pub enum ServiceError {
    /// The engine rejected the move or the state.
    #[display("{}", _0)]
    Domain(DomainError),

    /// No game has been started yet.
    #[display("Latest game not found")]
    LatestGameNotFound,

    /// The requested turn does not exist.
    #[display("Turn {} of game {} not found", turn_count, game_id)]
    TurnNotFound {
        /// Game that was searched.
        game_id: GameId,
        /// Turn count that was requested.
        turn_count: u32,
    },

    /// Turn 0 is created by starting a game and cannot be registered.
    #[display("Turn count must be at least 1")]
    InvalidTurnCount,

    /// A different turn or result already occupies the key being written.
    #[display("Conflict: {}", _0)]
    Conflict(String),

    /// Storage failure.
    #[display("{}", _0)]
    Db(DbError),
}

impl std::error::Error for ServiceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Domain(e) => Some(e),
            Self::Db(e) => Some(e),
            _ => None,
        }
    }
}

impl ServiceError {
    /// Stable name of the error kind, used in API error bodies.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Domain(e) => e.kind(),
            Self::LatestGameNotFound => "LatestGameNotFound",
            Self::TurnNotFound { .. } => "TurnNotFound",
            Self::InvalidTurnCount => "InvalidTurnCount",
            Self::Conflict(_) => "Conflict",
            Self::Db(_) => "StorageError",
        }
    }
}

impl From<DomainError> for ServiceError {
    fn from(err: DomainError) -> Self {
        Self::Domain(err)
    }
}

impl From<DbError> for ServiceError {
    fn from(err: DbError) -> Self {
        if err.is_unique_violation() {
            warn!(message = %err.message, "Write collided with an existing row");
            Self::Conflict(err.message)
        } else {
            Self::Db(err)
        }
    }
}

impl From<diesel::result::Error> for ServiceError {
    #[track_caller]
    fn from(err: diesel::result::Error) -> Self {
        DbError::from(err).into()
    }
}

impl From<diesel::ConnectionError> for ServiceError {
    #[track_caller]
    fn from(err: diesel::ConnectionError) -> Self {
        DbError::from(err).into()
    }
}
