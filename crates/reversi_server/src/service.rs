//! Use cases: start a game, read a turn, register a move, list recent games.

use derive_getters::Getters;
use derive_new::new;
use reversi::{Board, Disc, GameResult, NewGame, Point, Turn};
use tracing::{debug, info, instrument, warn};

use crate::repository::{GameSummary, Store};
use crate::ServiceError;

/// Number of games returned by [`ReversiService::find_last_games`].
pub const LAST_GAMES_LIMIT: usize = 10;

/// A turn of the latest game as shown to players.
#[derive(Debug, Clone, PartialEq, Eq, Getters, new)]
pub struct TurnSnapshot {
    /// Position in the game's history.
    turn_count: u32,
    /// Board after the turn.
    board: Board,
    /// Next mover, `None` once the game has ended.
    next_disc: Option<Disc>,
    /// Winner once the game has ended, `None` otherwise or on a draw.
    winner_disc: Option<Disc>,
}

/// Orchestrates the engine against a [`Store`].
///
/// Each use case runs in a single store transaction.
#[derive(Debug)]
pub struct ReversiService<S> {
    store: S,
}

impl<S: Store> ReversiService<S> {
    /// Creates a service over `store`.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Starts a game and stores its initial turn.
    #[instrument(skip(self))]
    pub fn start_new_game(&self) -> Result<Turn, ServiceError> {
        self.store.transaction(|repo| {
            let game = repo.save_game(NewGame::now())?;
            let first = Turn::first(*game.id(), *game.started_at());
            repo.save_turn(&first)?;
            info!(game_id = game.id(), "Game started");
            Ok(first)
        })
    }

    /// Reads turn `turn_count` of the latest game.
    ///
    /// # Errors
    ///
    /// [`ServiceError::LatestGameNotFound`] before any game was started,
    /// [`ServiceError::TurnNotFound`] if the turn has not been played.
    #[instrument(skip(self))]
    pub fn find_latest_game_turn_by_turn_count(
        &self,
        turn_count: u32,
    ) -> Result<TurnSnapshot, ServiceError> {
        self.store.transaction(|repo| {
            let game = repo
                .find_latest_game()?
                .ok_or(ServiceError::LatestGameNotFound)?;
            let turn = repo.find_turn(*game.id(), turn_count)?;

            let winner_disc = if turn.game_ended() {
                match repo.find_game_result(*game.id())? {
                    Some(result) => *result.winner_disc(),
                    None => {
                        warn!(game_id = game.id(), "Ended game has no stored result");
                        turn.winner_disc()?
                    }
                }
            } else {
                None
            };

            debug!(game_id = game.id(), next_disc = ?turn.next_disc(), "Turn loaded");
            Ok(TurnSnapshot::new(
                turn.turn_count(),
                *turn.board(),
                turn.next_disc(),
                winner_disc,
            ))
        })
    }

    /// Plays `disc` at `point` as turn `turn_count` of the latest game.
    ///
    /// Records the game result when the move ends the game.
    ///
    /// # Errors
    ///
    /// - [`ServiceError::InvalidTurnCount`] for turn 0
    /// - [`ServiceError::LatestGameNotFound`], [`ServiceError::TurnNotFound`]
    ///   if the previous turn is missing
    /// - [`ServiceError::Domain`] if the engine rejects the move
    /// - [`ServiceError::Conflict`] if another turn already took this count
    #[instrument(skip(self))]
    pub fn register_turn(
        &self,
        turn_count: u32,
        disc: Disc,
        point: Point,
    ) -> Result<Turn, ServiceError> {
        let Some(previous_count) = turn_count.checked_sub(1) else {
            warn!("Turn 0 cannot be registered");
            return Err(ServiceError::InvalidTurnCount);
        };

        self.store.transaction(|repo| {
            let game = repo
                .find_latest_game()?
                .ok_or(ServiceError::LatestGameNotFound)?;
            let previous = repo.find_turn(*game.id(), previous_count)?;

            let next = previous.place_next(disc, point)?;
            repo.save_turn(&next)?;
            info!(
                game_id = game.id(),
                turn_count = next.turn_count(),
                next_disc = ?next.next_disc(),
                "Turn registered"
            );

            if next.game_ended() {
                let result = GameResult::from_final_turn(&next)?;
                repo.save_game_result(&result)?;
                info!(game_id = game.id(), winner = ?result.winner_disc(), "Game result recorded");
            }

            Ok(next)
        })
    }

    /// Summaries of the most recent games, newest first.
    #[instrument(skip(self))]
    pub fn find_last_games(&self) -> Result<Vec<GameSummary>, ServiceError> {
        self.store
            .transaction(|repo| repo.find_last_games(LAST_GAMES_LIMIT))
    }
}
