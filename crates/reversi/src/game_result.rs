//! Recorded outcome of a finished game.

use chrono::NaiveDateTime;
use derive_getters::Getters;
use derive_new::new;
use tracing::instrument;

use super::{Disc, DomainError, GameId, Turn};

/// Winner (or draw) of a game, recorded once when the game ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Getters, new)]
pub struct GameResult {
    /// Game this result belongs to.
    game_id: GameId,
    /// Winning color, `None` for a draw.
    winner_disc: Option<Disc>,
    /// When the final turn was finalized.
    end_at: NaiveDateTime,
}

impl GameResult {
    /// Derives the result from the turn that ended the game.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::GameNotEnded`] if the turn still has a next disc.
    #[instrument(skip(turn), fields(game_id = turn.game_id(), turn_count = turn.turn_count()))]
    pub fn from_final_turn(turn: &Turn) -> Result<Self, DomainError> {
        let winner_disc = turn.winner_disc()?;
        Ok(Self::new(turn.game_id(), winner_disc, turn.end_at()))
    }

    /// Returns true if the game was a draw.
    pub fn is_draw(&self) -> bool {
        self.winner_disc.is_none()
    }
}
