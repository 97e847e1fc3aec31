//! Persistence boundary: transactional repository sessions.

use chrono::NaiveDateTime;
use derive_getters::Getters;
use derive_new::new;
use reversi::{Disc, Game, GameId, GameResult, NewGame, Turn};

use crate::ServiceError;

/// One unit of work against game storage.
///
/// Obtained from [`Store::transaction`]; every call shares the same
/// transaction.
pub trait Repository {
    /// Returns the most recently started game, if any.
    fn find_latest_game(&mut self) -> Result<Option<Game>, ServiceError>;

    /// Stores a new game and returns it with its assigned id.
    fn save_game(&mut self, game: NewGame) -> Result<Game, ServiceError>;

    /// Loads the turn `turn_count` of `game_id`.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::TurnNotFound`] if no such turn is stored.
    fn find_turn(&mut self, game_id: GameId, turn_count: u32) -> Result<Turn, ServiceError>;

    /// Appends a turn.
    ///
    /// Storing a turn identical to the stored one is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Conflict`] if a different turn is already
    /// stored under the same game and turn count.
    fn save_turn(&mut self, turn: &Turn) -> Result<(), ServiceError>;

    /// Returns the recorded result of a game, if it has ended.
    fn find_game_result(&mut self, game_id: GameId) -> Result<Option<GameResult>, ServiceError>;

    /// Records a game result, at most once per game.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Conflict`] if a different result is already
    /// recorded for the game.
    fn save_game_result(&mut self, result: &GameResult) -> Result<(), ServiceError>;

    /// Summaries of the `limit` most recent games, newest first.
    fn find_last_games(&mut self, limit: usize) -> Result<Vec<GameSummary>, ServiceError>;
}

/// Source of [`Repository`] sessions.
pub trait Store: Send + Sync {
    /// Runs `f` atomically, serialized with other transactions on this store.
    ///
    /// Writes made by `f` are discarded if it returns an error.
    fn transaction<T, F>(&self, f: F) -> Result<T, ServiceError>
    where
        F: FnOnce(&mut dyn Repository) -> Result<T, ServiceError>;
}

/// One row of the recent games listing.
#[derive(Debug, Clone, PartialEq, Eq, Getters, new)]
pub struct GameSummary {
    /// Game identifier.
    game_id: GameId,
    /// Number of moves Dark played.
    dark_move_count: u32,
    /// Number of moves Light played.
    light_move_count: u32,
    /// Winner, `None` for a draw or an unfinished game.
    winner_disc: Option<Disc>,
    /// When the game was started.
    started_at: NaiveDateTime,
    /// When the game ended, `None` while it is still running.
    end_at: Option<NaiveDateTime>,
}

/// Two turns for the same key carry the same placement.
///
/// The timestamp is ignored so a retried submission is recognised.
pub(crate) fn same_placement(stored: &Turn, incoming: &Turn) -> bool {
    stored.board() == incoming.board()
        && stored.next_disc() == incoming.next_disc()
        && stored.mv() == incoming.mv()
}
