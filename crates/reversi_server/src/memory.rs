//! In-memory store for tests and ephemeral servers.

use std::collections::BTreeMap;
use std::sync::{Mutex, PoisonError};

use reversi::{Disc, Game, GameId, GameResult, NewGame, Turn};
use tracing::{debug, instrument, warn};

use crate::repository::{GameSummary, Repository, Store, same_placement};
use crate::ServiceError;

#[derive(Debug, Clone, Default)]
struct MemoryTables {
    games: Vec<Game>,
    turns: BTreeMap<(GameId, u32), Turn>,
    results: BTreeMap<GameId, GameResult>,
}

/// Mutex-guarded tables.
///
/// A transaction holds the lock for its whole duration and works on a copy
/// that replaces the tables only if it succeeds.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: Mutex<MemoryTables>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl Store for MemoryStore {
    #[instrument(skip_all)]
    fn transaction<T, F>(&self, f: F) -> Result<T, ServiceError>
    where
        F: FnOnce(&mut dyn Repository) -> Result<T, ServiceError>,
    {
        let mut tables = self.tables.lock().unwrap_or_else(PoisonError::into_inner);
        let mut working = tables.clone();

        let value = f(&mut MemoryRepository {
            tables: &mut working,
        })?;

        *tables = working;
        debug!("Transaction committed");
        Ok(value)
    }
}

struct MemoryRepository<'a> {
    tables: &'a mut MemoryTables,
}

impl MemoryRepository<'_> {
    fn move_count(&self, game_id: GameId, disc: Disc) -> u32 {
        let count = self
            .tables
            .turns
            .range((game_id, 0)..=(game_id, u32::MAX))
            .filter(|(_, turn)| turn.mv().is_some_and(|mv| mv.disc() == disc))
            .count();
        u32::try_from(count).unwrap_or(u32::MAX)
    }
}

impl Repository for MemoryRepository<'_> {
    fn find_latest_game(&mut self) -> Result<Option<Game>, ServiceError> {
        Ok(self.tables.games.last().copied())
    }

    fn save_game(&mut self, game: NewGame) -> Result<Game, ServiceError> {
        let id = self.tables.games.last().map_or(1, |g| *g.id() + 1);
        let game = game.with_id(id);
        self.tables.games.push(game);
        Ok(game)
    }

    fn find_turn(&mut self, game_id: GameId, turn_count: u32) -> Result<Turn, ServiceError> {
        self.tables
            .turns
            .get(&(game_id, turn_count))
            .cloned()
            .ok_or(ServiceError::TurnNotFound {
                game_id,
                turn_count,
            })
    }

    fn save_turn(&mut self, turn: &Turn) -> Result<(), ServiceError> {
        let key = (turn.game_id(), turn.turn_count());
        match self.tables.turns.get(&key) {
            Some(stored) if same_placement(stored, turn) => {
                debug!(game_id = key.0, turn_count = key.1, "Turn already stored");
                Ok(())
            }
            Some(_) => {
                warn!(game_id = key.0, turn_count = key.1, "Turn already stored with other content");
                Err(ServiceError::Conflict(format!(
                    "turn {} of game {} already exists",
                    key.1, key.0
                )))
            }
            None => {
                self.tables.turns.insert(key, turn.clone());
                Ok(())
            }
        }
    }

    fn find_game_result(&mut self, game_id: GameId) -> Result<Option<GameResult>, ServiceError> {
        Ok(self.tables.results.get(&game_id).copied())
    }

    fn save_game_result(&mut self, result: &GameResult) -> Result<(), ServiceError> {
        let game_id = *result.game_id();
        match self.tables.results.get(&game_id) {
            Some(stored) if stored.winner_disc() == result.winner_disc() => Ok(()),
            Some(_) => Err(ServiceError::Conflict(format!(
                "game {} already has a different result",
                game_id
            ))),
            None => {
                self.tables.results.insert(game_id, *result);
                Ok(())
            }
        }
    }

    fn find_last_games(&mut self, limit: usize) -> Result<Vec<GameSummary>, ServiceError> {
        let summaries = self
            .tables
            .games
            .iter()
            .rev()
            .take(limit)
            .map(|game| {
                let result = self.tables.results.get(game.id());
                GameSummary::new(
                    *game.id(),
                    self.move_count(*game.id(), Disc::Dark),
                    self.move_count(*game.id(), Disc::Light),
                    result.and_then(|r| *r.winner_disc()),
                    *game.started_at(),
                    result.map(|r| *r.end_at()),
                )
            })
            .collect();
        Ok(summaries)
    }
}
