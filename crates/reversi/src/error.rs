//! Domain error types for the Reversi engine.

use super::{Disc, Point};

/// Error that can occur when validating or applying a move.
///
/// Every precondition violation has its own variant so callers can map
/// each kind to a specific response.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum DomainError {
    /// The target cell already holds a disc.
    #[display("Cell {} is not empty", _0)]
    CellOccupied(Point),

    /// The target cell is empty but no opposing disc would be flipped.
    #[display("Placing at {} flips no discs", _0)]
    NoDiscsToFlip(Point),

    /// The disc does not match the color expected to move next.
    #[display("It's not {:?}'s turn (next disc: {:?})", disc, expected)]
    NotPlayersTurn {
        /// Disc that attempted to move.
        disc: Disc,
        /// Disc expected to move, `None` once the game has ended.
        expected: Option<Disc>,
    },

    /// The winner was requested before the game ended.
    #[display("Game has not ended yet")]
    GameNotEnded,

    /// The point lies outside the 8x8 grid.
    #[display("Point {} is outside the board", _0)]
    PointOutOfRange(Point),

    /// A disc code or disc value is not acceptable in this position.
    #[display("Invalid disc: {}", _0)]
    InvalidDisc(i32),

    /// A board could not be restored from the given discs.
    #[display("Invalid board: {}", _0)]
    InvalidBoard(String),

    /// The turn counter cannot advance past `u32::MAX`.
    #[display("Turn {} is the last representable turn", _0)]
    TurnLimitReached(u32),

    /// A postcondition failed after a transition.
    #[display("Invariant violation: {}", _0)]
    InvariantViolation(String),
}

impl std::error::Error for DomainError {}

impl DomainError {
    /// Stable name of the error kind, used in API error bodies.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::CellOccupied(_) => "CellOccupied",
            Self::NoDiscsToFlip(_) => "NoDiscsToFlip",
            Self::NotPlayersTurn { .. } => "NotPlayersTurn",
            Self::GameNotEnded => "GameNotEnded",
            Self::PointOutOfRange(_) => "PointOutOfRange",
            Self::InvalidDisc(_) => "InvalidDisc",
            Self::InvalidBoard(_) => "InvalidBoard",
            Self::TurnLimitReached(_) => "TurnLimitReached",
            Self::InvariantViolation(_) => "InvariantViolation",
        }
    }

    /// Returns true for illegal move attempts the caller can correct.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::CellOccupied(_)
                | Self::NoDiscsToFlip(_)
                | Self::NotPlayersTurn { .. }
                | Self::PointOutOfRange(_)
                | Self::InvalidDisc(_)
        )
    }
}
