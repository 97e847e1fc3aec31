//! Turn state machine: one ply of a game's history.

use chrono::{NaiveDateTime, Utc};
use tracing::{debug, info, instrument, warn};

use super::contracts::{Contract, PlaceContract};
use super::{Board, Disc, DomainError, GameId, Move, Point};

/// Snapshot of a game after a move (or the initial setup).
///
/// A turn is either active (`next_disc` is `Some`) or ended (`None`).
/// Turns are never mutated; [`Turn::place_next`] returns the successor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Turn {
    game_id: GameId,
    turn_count: u32,
    next_disc: Option<Disc>,
    mv: Option<Move>,
    board: Board,
    end_at: NaiveDateTime,
}

impl Turn {
    /// Creates turn 0: the standard position with Dark to move.
    pub fn first(game_id: GameId, started_at: NaiveDateTime) -> Self {
        Self {
            game_id,
            turn_count: 0,
            next_disc: Some(Disc::Dark),
            mv: None,
            board: Board::initial(),
            end_at: started_at,
        }
    }

    /// Rebuilds a turn from stored fields without re-validating them.
    pub fn restore(
        game_id: GameId,
        turn_count: u32,
        next_disc: Option<Disc>,
        mv: Option<Move>,
        board: Board,
        end_at: NaiveDateTime,
    ) -> Self {
        Self {
            game_id,
            turn_count,
            next_disc,
            mv,
            board,
            end_at,
        }
    }

    /// Game this turn belongs to.
    pub fn game_id(&self) -> GameId {
        self.game_id
    }

    /// Zero-based position in the game's history.
    pub fn turn_count(&self) -> u32 {
        self.turn_count
    }

    /// Color expected to move next, `None` once the game has ended.
    pub fn next_disc(&self) -> Option<Disc> {
        self.next_disc
    }

    /// Move that produced this turn, `None` for turn 0.
    pub fn mv(&self) -> Option<Move> {
        self.mv
    }

    /// Board after this turn's move.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// When this turn was finalized.
    pub fn end_at(&self) -> NaiveDateTime {
        self.end_at
    }

    /// Plays `disc` at `point`, stamping the new turn with the current UTC time.
    ///
    /// # Errors
    ///
    /// See [`Turn::place_next_at`].
    pub fn place_next(&self, disc: Disc, point: Point) -> Result<Self, DomainError> {
        self.place_next_at(disc, point, Utc::now().naive_utc())
    }

    /// Plays `disc` at `point` and returns the next turn.
    ///
    /// The next mover is the opponent unless the opponent has no legal
    /// move, in which case `disc` moves again. If neither color can move
    /// the returned turn is ended.
    ///
    /// # Errors
    ///
    /// - [`DomainError::InvalidDisc`] if `disc` is not a color
    /// - [`DomainError::NotPlayersTurn`] if `disc` is not the next mover
    ///   or the game has ended
    /// - [`DomainError::PointOutOfRange`], [`DomainError::CellOccupied`],
    ///   [`DomainError::NoDiscsToFlip`] from the board
    /// - [`DomainError::TurnLimitReached`] if the turn count cannot advance
    #[instrument(skip(self), fields(game_id = self.game_id, turn_count = self.turn_count))]
    pub fn place_next_at(
        &self,
        disc: Disc,
        point: Point,
        end_at: NaiveDateTime,
    ) -> Result<Self, DomainError> {
        let mv = Move::new(disc, point)?;

        if let Err(e) = PlaceContract::pre(self, &mv) {
            warn!(error = %e, "Move rejected");
            return Err(e);
        }

        let turn_count = self
            .turn_count
            .checked_add(1)
            .ok_or(DomainError::TurnLimitReached(self.turn_count))?;
        let board = self.board.place(&mv)?;
        let next_disc = decide_next_disc(&board, disc);
        debug!(?next_disc, "Next mover decided");

        let next = Self {
            game_id: self.game_id,
            turn_count,
            next_disc,
            mv: Some(mv),
            board,
            end_at,
        };

        #[cfg(debug_assertions)]
        {
            PlaceContract::post(self, &next)?;
        }

        if next.game_ended() {
            info!(
                turn_count = next.turn_count,
                dark = next.board.count(Disc::Dark),
                light = next.board.count(Disc::Light),
                "Game ended"
            );
        }

        Ok(next)
    }

    /// Returns true once neither color has a legal move.
    pub fn game_ended(&self) -> bool {
        self.next_disc.is_none()
    }

    /// Returns the winner of an ended game, `None` for a draw.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::GameNotEnded`] while the game is still active.
    pub fn winner_disc(&self) -> Result<Option<Disc>, DomainError> {
        if !self.game_ended() {
            return Err(DomainError::GameNotEnded);
        }

        let dark = self.board.count(Disc::Dark);
        let light = self.board.count(Disc::Light);
        Ok(match dark.cmp(&light) {
            std::cmp::Ordering::Greater => Some(Disc::Dark),
            std::cmp::Ordering::Less => Some(Disc::Light),
            std::cmp::Ordering::Equal => None,
        })
    }
}

/// Opponent moves next when able; otherwise the mover again; otherwise nobody.
fn decide_next_disc(board: &Board, mover: Disc) -> Option<Disc> {
    let opponent = mover.opposite()?;
    match (
        board.exist_valid_move(opponent),
        board.exist_valid_move(mover),
    ) {
        (true, _) => Some(opponent),
        (false, true) => {
            debug!(?opponent, "Opponent has no legal move, passing");
            Some(mover)
        }
        (false, false) => None,
    }
}
