//! Reversi engine - move validation and board transitions
//!
//! Pure game rules with no I/O: given a turn and a proposed move, decide
//! whether the move is legal, flip the bracketed discs, and advance the
//! game (next mover, passes, end of game, winner).
//!
//! # Architecture
//!
//! - **Board**: immutable 8x8 grid scanned through a wall-bordered copy
//! - **Turn**: one ply of history, owns the pass and end-of-game decision
//! - **Contracts**: preconditions and debug-build postconditions for `place_next`
//!
//! # Example
//!
//! ```
//! use reversi::{Disc, Point, Turn};
//!
//! # fn example() -> Result<(), reversi::DomainError> {
//! let first = Turn::first(1, chrono::Utc::now().naive_utc());
//! let next = first.place_next(Disc::Dark, Point::new(2, 3))?;
//! assert_eq!(next.board().count(Disc::Dark), 4);
//! assert_eq!(next.next_disc(), Some(Disc::Light));
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Private module declarations
mod action;
mod board;
mod contracts;
mod disc;
mod error;
mod game;
mod game_result;
mod invariants;
mod point;
mod turn;

// Crate-level exports - Core values
pub use action::Move;
pub use board::{BOARD_SIZE, Board};
pub use disc::Disc;
pub use point::Point;

// Crate-level exports - Aggregates
pub use game::{Game, GameId, NewGame};
pub use game_result::GameResult;
pub use turn::Turn;

// Crate-level exports - Errors
pub use error::DomainError;

// Crate-level exports - Contracts and invariants
pub use contracts::{CellIsEmpty, Contract, PlaceContract, PlayersTurn};
pub use invariants::{
    DiscsConservedInvariant, Invariant, InvariantSet, InvariantViolation,
    NextDiscConsistentInvariant, Transition, TurnAdvancedInvariant, TurnInvariants,
};
