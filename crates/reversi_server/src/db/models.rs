//! Database rows and their conversion to engine types.

use chrono::NaiveDateTime;
use derive_getters::Getters;
use derive_new::new;
use diesel::prelude::*;
use reversi::{BOARD_SIZE, Board, Disc, Game, GameId, GameResult, Move, Point, Turn};
use tracing::instrument;

use crate::db::{DbError, schema};

/// Stored game.
#[derive(Debug, Clone, Queryable, Identifiable, Selectable)]
#[diesel(table_name = schema::games)]
pub struct GameRecord {
    id: i32,
    started_at: NaiveDateTime,
}

impl From<GameRecord> for Game {
    fn from(record: GameRecord) -> Self {
        Game::new(record.id, record.started_at)
    }
}

/// Insertable game.
#[derive(Debug, Clone, Insertable, new)]
#[diesel(table_name = schema::games)]
pub struct NewGameRecord {
    started_at: NaiveDateTime,
}

/// Stored turn header. The board and move live in their own tables.
#[derive(Debug, Clone, Queryable, Identifiable, Selectable)]
#[diesel(table_name = schema::turns)]
pub struct TurnRecord {
    id: i32,
    game_id: i32,
    turn_count: i32,
    next_disc: Option<i32>,
    end_at: NaiveDateTime,
}

impl TurnRecord {
    /// Row id, referenced by squares and moves.
    pub fn id(&self) -> i32 {
        self.id
    }

    /// Rebuilds the engine turn from this header, its 64 squares and its move.
    ///
    /// # Errors
    ///
    /// Returns a corrupt-row [`DbError`] if any stored value cannot be decoded.
    #[instrument(skip(self, squares, mv), fields(turn_id = self.id, squares = squares.len()))]
    pub fn into_turn(
        self,
        squares: Vec<SquareRecord>,
        mv: Option<MoveRecord>,
    ) -> Result<Turn, DbError> {
        let mut discs = [[Disc::Empty; BOARD_SIZE]; BOARD_SIZE];
        if squares.len() != BOARD_SIZE * BOARD_SIZE {
            return Err(DbError::corrupt(format!(
                "turn {} has {} squares",
                self.id,
                squares.len()
            )));
        }
        for square in squares {
            let point = decode_point(square.x, square.y)?;
            discs[usize::from(point.y())][usize::from(point.x())] = decode_disc(square.disc)?;
        }
        let board = Board::from_discs(discs).map_err(|e| DbError::corrupt(e.to_string()))?;

        let next_disc = self.next_disc.map(decode_disc).transpose()?;
        let mv = mv.map(MoveRecord::into_move).transpose()?;
        let turn_count = u32::try_from(self.turn_count)
            .map_err(|_| DbError::corrupt(format!("negative turn count {}", self.turn_count)))?;

        Ok(Turn::restore(
            self.game_id,
            turn_count,
            next_disc,
            mv,
            board,
            self.end_at,
        ))
    }
}

/// Insertable turn header.
#[derive(Debug, Clone, Insertable, Getters, new)]
#[diesel(table_name = schema::turns)]
pub struct NewTurnRecord {
    game_id: i32,
    turn_count: i32,
    next_disc: Option<i32>,
    end_at: NaiveDateTime,
}

impl NewTurnRecord {
    /// Header row for `turn`.
    pub fn from_turn(turn: &Turn) -> Result<Self, DbError> {
        let turn_count = i32::try_from(turn.turn_count())
            .map_err(|_| DbError::corrupt(format!("turn count {} too large", turn.turn_count())))?;
        Ok(Self::new(
            turn.game_id(),
            turn_count,
            turn.next_disc().map(|d| i32::from(d.code())),
            turn.end_at(),
        ))
    }
}

/// One cell of a stored board.
#[derive(Debug, Clone, Queryable, Identifiable, Associations, Selectable)]
#[diesel(table_name = schema::squares)]
#[diesel(belongs_to(TurnRecord, foreign_key = turn_id))]
pub struct SquareRecord {
    id: i32,
    turn_id: i32,
    x: i32,
    y: i32,
    disc: i32,
}

/// Insertable board cell.
#[derive(Debug, Clone, Insertable, new)]
#[diesel(table_name = schema::squares)]
pub struct NewSquareRecord {
    turn_id: i32,
    x: i32,
    y: i32,
    disc: i32,
}

impl NewSquareRecord {
    /// All 64 cells of `board`, row-major.
    pub fn from_board(turn_id: i32, board: &Board) -> Vec<Self> {
        board
            .discs()
            .iter()
            .enumerate()
            .flat_map(|(y, row)| {
                row.iter().enumerate().map(move |(x, disc)| {
                    Self::new(turn_id, x as i32, y as i32, i32::from(disc.code()))
                })
            })
            .collect()
    }
}

/// Stored move of a turn.
#[derive(Debug, Clone, Queryable, Identifiable, Associations, Selectable)]
#[diesel(table_name = schema::moves)]
#[diesel(belongs_to(TurnRecord, foreign_key = turn_id))]
pub struct MoveRecord {
    id: i32,
    turn_id: i32,
    disc: i32,
    x: i32,
    y: i32,
}

impl MoveRecord {
    fn into_move(self) -> Result<Move, DbError> {
        let disc = Disc::from_move_code(self.disc).map_err(|e| DbError::corrupt(e.to_string()))?;
        let point = decode_point(self.x, self.y)?;
        Move::new(disc, point).map_err(|e| DbError::corrupt(e.to_string()))
    }
}

/// Insertable move.
#[derive(Debug, Clone, Insertable, new)]
#[diesel(table_name = schema::moves)]
pub struct NewMoveRecord {
    turn_id: i32,
    disc: i32,
    x: i32,
    y: i32,
}

impl NewMoveRecord {
    /// Move row for `mv`, attached to `turn_id`.
    pub fn from_move(turn_id: i32, mv: &Move) -> Self {
        Self::new(
            turn_id,
            i32::from(mv.disc().code()),
            i32::from(mv.point().x()),
            i32::from(mv.point().y()),
        )
    }
}

/// Stored game result.
#[derive(Debug, Clone, Queryable, Identifiable, Selectable)]
#[diesel(table_name = schema::game_results)]
pub struct GameResultRecord {
    id: i32,
    game_id: i32,
    winner_disc: Option<i32>,
    end_at: NaiveDateTime,
}

impl TryFrom<GameResultRecord> for GameResult {
    type Error = DbError;

    fn try_from(record: GameResultRecord) -> Result<Self, Self::Error> {
        let winner_disc = record.winner_disc.map(decode_disc).transpose()?;
        Ok(GameResult::new(record.game_id, winner_disc, record.end_at))
    }
}

/// Insertable game result.
#[derive(Debug, Clone, Insertable, new)]
#[diesel(table_name = schema::game_results)]
pub struct NewGameResultRecord {
    game_id: GameId,
    winner_disc: Option<i32>,
    end_at: NaiveDateTime,
}

impl From<&GameResult> for NewGameResultRecord {
    fn from(result: &GameResult) -> Self {
        Self::new(
            *result.game_id(),
            result.winner_disc().map(|d| i32::from(d.code())),
            *result.end_at(),
        )
    }
}

fn decode_disc(code: i32) -> Result<Disc, DbError> {
    Disc::from_code(code).map_err(|e| DbError::corrupt(e.to_string()))
}

fn decode_point(x: i32, y: i32) -> Result<Point, DbError> {
    match (u8::try_from(x), u8::try_from(y)) {
        (Ok(px), Ok(py)) if Point::new(px, py).is_on_board() => Ok(Point::new(px, py)),
        _ => Err(DbError::corrupt(format!("point ({}, {}) is off the board", x, y))),
    }
}
