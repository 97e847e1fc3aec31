//! Game (match) aggregate.

use chrono::{NaiveDateTime, Utc};
use derive_getters::Getters;
use derive_new::new;

/// Identifier assigned to a game by the persistence layer.
pub type GameId = i32;

/// One playthrough: identity and start time.
///
/// Turns and the final result refer to a game by its id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Getters, new)]
pub struct Game {
    /// Identifier assigned by storage.
    id: GameId,
    /// When the game was started.
    started_at: NaiveDateTime,
}

/// A game that has not been stored yet and so has no id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Getters, new)]
pub struct NewGame {
    /// When the game was started.
    started_at: NaiveDateTime,
}

impl NewGame {
    /// Creates a game starting now (UTC).
    pub fn now() -> Self {
        Self::new(Utc::now().naive_utc())
    }

    /// Attaches the id assigned by storage.
    pub fn with_id(self, id: GameId) -> Game {
        Game::new(id, self.started_at)
    }
}
