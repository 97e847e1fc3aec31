//! SQLite store backed by diesel.

use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use reversi::{Disc, Game, GameId, GameResult, NewGame, Turn};
use tracing::{debug, info, instrument, warn};

use crate::ServiceError;
use crate::db::models::{
    GameRecord, GameResultRecord, MoveRecord, NewGameRecord, NewGameResultRecord,
    NewMoveRecord, NewSquareRecord, NewTurnRecord, SquareRecord, TurnRecord,
};
use crate::db::{DbError, DbErrorKind, schema};
use crate::repository::{GameSummary, Repository, Store, same_placement};

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Store backed by a SQLite database file.
///
/// Every transaction opens its own connection and runs as
/// `BEGIN IMMEDIATE`, so writers queue on the database lock.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    database_url: String,
}

impl SqliteStore {
    /// Creates a store for the database at the given path.
    ///
    /// The file is created on first connection if it does not exist.
    #[instrument(skip(database_url), fields(database_url = %database_url.as_ref()))]
    pub fn new(database_url: impl AsRef<str>) -> Self {
        info!("Creating SqliteStore");
        Self {
            database_url: database_url.as_ref().to_string(),
        }
    }

    /// Path or URL of the database.
    pub fn database_url(&self) -> &str {
        &self.database_url
    }

    /// Applies pending migrations and returns how many were applied.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if connecting or migrating fails.
    #[instrument(skip(self), fields(database_url = %self.database_url))]
    pub fn run_migrations(&self) -> Result<usize, DbError> {
        let mut conn = self.connection()?;
        let applied = conn
            .run_pending_migrations(MIGRATIONS)
            .map_err(|e| DbError::new(DbErrorKind::Migration, format!("Migration failed: {}", e)))?;
        info!(count = applied.len(), "Migrations applied");
        Ok(applied.len())
    }

    /// Establishes a connection with foreign keys and a busy timeout enabled.
    #[instrument(skip(self))]
    fn connection(&self) -> Result<SqliteConnection, DbError> {
        debug!(path = %self.database_url, "Establishing connection");
        let mut conn = SqliteConnection::establish(&self.database_url).map_err(|e| {
            DbError::new(
                DbErrorKind::Connection,
                format!("Failed to connect to '{}': {}", self.database_url, e),
            )
        })?;
        conn.batch_execute("PRAGMA foreign_keys = ON; PRAGMA busy_timeout = 5000;")
            .map_err(|e| DbError::new(DbErrorKind::Connection, format!("Pragma failed: {}", e)))?;
        Ok(conn)
    }
}

impl Store for SqliteStore {
    #[instrument(skip_all, fields(database_url = %self.database_url))]
    fn transaction<T, F>(&self, f: F) -> Result<T, ServiceError>
    where
        F: FnOnce(&mut dyn Repository) -> Result<T, ServiceError>,
    {
        let mut conn = self.connection()?;
        conn.immediate_transaction(|conn| f(&mut SqliteRepository { conn }))
    }
}

struct SqliteRepository<'a> {
    conn: &'a mut SqliteConnection,
}

impl SqliteRepository<'_> {
    fn find_turn_record(
        &mut self,
        game_id: GameId,
        turn_count: i32,
    ) -> Result<Option<TurnRecord>, ServiceError> {
        let record = schema::turns::table
            .filter(schema::turns::game_id.eq(game_id))
            .filter(schema::turns::turn_count.eq(turn_count))
            .select(TurnRecord::as_select())
            .first(self.conn)
            .optional()?;
        Ok(record)
    }

    fn load_turn(&mut self, record: TurnRecord) -> Result<Turn, ServiceError> {
        let squares = SquareRecord::belonging_to(&record)
            .select(SquareRecord::as_select())
            .order((schema::squares::y.asc(), schema::squares::x.asc()))
            .load(self.conn)?;
        let mv = MoveRecord::belonging_to(&record)
            .select(MoveRecord::as_select())
            .first(self.conn)
            .optional()?;
        Ok(record.into_turn(squares, mv)?)
    }

    fn move_count(&mut self, game_id: GameId, disc: Disc) -> Result<u32, ServiceError> {
        let count: i64 = schema::moves::table
            .inner_join(schema::turns::table)
            .filter(schema::turns::game_id.eq(game_id))
            .filter(schema::moves::disc.eq(i32::from(disc.code())))
            .count()
            .get_result(self.conn)?;
        Ok(u32::try_from(count).unwrap_or(u32::MAX))
    }
}

impl Repository for SqliteRepository<'_> {
    #[instrument(skip(self))]
    fn find_latest_game(&mut self) -> Result<Option<Game>, ServiceError> {
        let record = schema::games::table
            .order(schema::games::id.desc())
            .select(GameRecord::as_select())
            .first(self.conn)
            .optional()?;
        Ok(record.map(Game::from))
    }

    #[instrument(skip(self))]
    fn save_game(&mut self, game: NewGame) -> Result<Game, ServiceError> {
        let record = diesel::insert_into(schema::games::table)
            .values(&NewGameRecord::new(*game.started_at()))
            .returning(GameRecord::as_returning())
            .get_result(self.conn)?;
        let game = Game::from(record);
        debug!(game_id = game.id(), "Game stored");
        Ok(game)
    }

    #[instrument(skip(self))]
    fn find_turn(&mut self, game_id: GameId, turn_count: u32) -> Result<Turn, ServiceError> {
        let not_found = ServiceError::TurnNotFound {
            game_id,
            turn_count,
        };
        let Ok(count) = i32::try_from(turn_count) else {
            return Err(not_found);
        };
        match self.find_turn_record(game_id, count)? {
            Some(record) => self.load_turn(record),
            None => Err(not_found),
        }
    }

    #[instrument(skip(self, turn), fields(game_id = turn.game_id(), turn_count = turn.turn_count()))]
    fn save_turn(&mut self, turn: &Turn) -> Result<(), ServiceError> {
        let header = NewTurnRecord::from_turn(turn)?;

        if let Some(existing) = self.find_turn_record(turn.game_id(), *header.turn_count())? {
            let stored = self.load_turn(existing)?;
            if same_placement(&stored, turn) {
                debug!("Turn already stored");
                return Ok(());
            }
            warn!("Turn already stored with other content");
            return Err(ServiceError::Conflict(format!(
                "turn {} of game {} already exists",
                turn.turn_count(),
                turn.game_id()
            )));
        }

        let record = diesel::insert_into(schema::turns::table)
            .values(&header)
            .returning(TurnRecord::as_returning())
            .get_result(self.conn)?;

        diesel::insert_into(schema::squares::table)
            .values(&NewSquareRecord::from_board(record.id(), turn.board()))
            .execute(self.conn)?;

        if let Some(mv) = turn.mv() {
            diesel::insert_into(schema::moves::table)
                .values(&NewMoveRecord::from_move(record.id(), &mv))
                .execute(self.conn)?;
        }

        debug!(turn_id = record.id(), "Turn stored");
        Ok(())
    }

    #[instrument(skip(self))]
    fn find_game_result(&mut self, game_id: GameId) -> Result<Option<GameResult>, ServiceError> {
        let record = schema::game_results::table
            .filter(schema::game_results::game_id.eq(game_id))
            .select(GameResultRecord::as_select())
            .first(self.conn)
            .optional()?;
        Ok(record.map(GameResult::try_from).transpose()?)
    }

    #[instrument(skip(self, result), fields(game_id = result.game_id()))]
    fn save_game_result(&mut self, result: &GameResult) -> Result<(), ServiceError> {
        if let Some(stored) = self.find_game_result(*result.game_id())? {
            if stored.winner_disc() == result.winner_disc() {
                debug!("Result already stored");
                return Ok(());
            }
            warn!("Game already has a different result");
            return Err(ServiceError::Conflict(format!(
                "game {} already has a different result",
                result.game_id()
            )));
        }

        diesel::insert_into(schema::game_results::table)
            .values(&NewGameResultRecord::from(result))
            .execute(self.conn)?;
        Ok(())
    }

    #[instrument(skip(self))]
    fn find_last_games(&mut self, limit: usize) -> Result<Vec<GameSummary>, ServiceError> {
        let games = schema::games::table
            .order(schema::games::id.desc())
            .limit(i64::try_from(limit).unwrap_or(i64::MAX))
            .select(GameRecord::as_select())
            .load(self.conn)?;

        let mut summaries = Vec::with_capacity(games.len());
        for game in games.into_iter().map(Game::from) {
            let result = self.find_game_result(*game.id())?;
            summaries.push(GameSummary::new(
                *game.id(),
                self.move_count(*game.id(), Disc::Dark)?,
                self.move_count(*game.id(), Disc::Light)?,
                result.and_then(|r| *r.winner_disc()),
                *game.started_at(),
                result.map(|r| *r.end_at()),
            ));
        }

        debug!(count = summaries.len(), "Recent games loaded");
        Ok(summaries)
    }
}
