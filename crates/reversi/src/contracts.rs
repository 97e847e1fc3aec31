//! Contract-based validation for placing a disc.
//!
//! Contracts define correctness through preconditions and postconditions:
//! {P(turn, move)} place {Q(before, after)}.

use tracing::{instrument, warn};

use super::invariants::{InvariantSet, Transition, TurnInvariants};
use super::{Disc, DomainError, Move, Turn};

/// A contract defines preconditions and postconditions for state transitions.
pub trait Contract<S, A> {
    /// Checks preconditions before applying the action.
    fn pre(state: &S, action: &A) -> Result<(), DomainError>;

    /// Checks postconditions after applying the action.
    fn post(before: &S, after: &S) -> Result<(), DomainError>;
}

/// Precondition: the move's color is the one expected to move next.
pub struct PlayersTurn;

impl PlayersTurn {
    /// Fails with [`DomainError::NotPlayersTurn`], also on an ended turn.
    #[instrument(skip(turn))]
    pub fn check(mv: &Move, turn: &Turn) -> Result<(), DomainError> {
        match turn.next_disc() {
            Some(expected) if expected == mv.disc() => Ok(()),
            expected => Err(DomainError::NotPlayersTurn {
                disc: mv.disc(),
                expected,
            }),
        }
    }
}

/// Precondition: the target lies on the board and is empty.
pub struct CellIsEmpty;

impl CellIsEmpty {
    /// Fails with [`DomainError::PointOutOfRange`] or [`DomainError::CellOccupied`].
    #[instrument(skip(turn))]
    pub fn check(mv: &Move, turn: &Turn) -> Result<(), DomainError> {
        match turn.board().get(mv.point()) {
            None => Err(DomainError::PointOutOfRange(mv.point())),
            Some(Disc::Empty) => Ok(()),
            Some(_) => Err(DomainError::CellOccupied(mv.point())),
        }
    }
}

/// Contract for [`Turn::place_next`].
///
/// Preconditions:
/// - Must be the player's turn
/// - Target cell must be on the board and empty
///
/// Postconditions: every invariant in [`TurnInvariants`].
pub struct PlaceContract;

impl Contract<Turn, Move> for PlaceContract {
    fn pre(turn: &Turn, mv: &Move) -> Result<(), DomainError> {
        PlayersTurn::check(mv, turn)?;
        CellIsEmpty::check(mv, turn)
    }

    fn post(before: &Turn, after: &Turn) -> Result<(), DomainError> {
        TurnInvariants::check_all(&Transition::new(before, after)).map_err(|violations| {
            let descriptions = violations
                .iter()
                .map(|v| v.description.as_str())
                .collect::<Vec<_>>()
                .join("; ");
            warn!(%descriptions, "Postcondition failed");
            DomainError::InvariantViolation(descriptions)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Board, Point};

    fn started() -> chrono::NaiveDateTime {
        chrono::DateTime::from_timestamp(1_700_000_000, 0)
            .expect("valid timestamp")
            .naive_utc()
    }

    #[test]
    fn test_precondition_holds_for_dark_opening() {
        let turn = Turn::first(1, started());
        let mv = Move::new(Disc::Dark, Point::new(2, 3)).expect("color");
        assert!(PlaceContract::pre(&turn, &mv).is_ok());
    }

    #[test]
    fn test_precondition_wrong_turn() {
        let turn = Turn::first(1, started());
        let mv = Move::new(Disc::Light, Point::new(2, 4)).expect("color");
        assert_eq!(
            PlaceContract::pre(&turn, &mv),
            Err(DomainError::NotPlayersTurn {
                disc: Disc::Light,
                expected: Some(Disc::Dark),
            })
        );
    }

    #[test]
    fn test_precondition_occupied_cell() {
        let turn = Turn::first(1, started());
        let mv = Move::new(Disc::Dark, Point::new(3, 3)).expect("color");
        assert_eq!(
            PlaceContract::pre(&turn, &mv),
            Err(DomainError::CellOccupied(Point::new(3, 3)))
        );
    }

    #[test]
    fn test_precondition_off_board() {
        let turn = Turn::first(1, started());
        let mv = Move::new(Disc::Dark, Point::new(2, 9)).expect("color");
        assert_eq!(
            PlaceContract::pre(&turn, &mv),
            Err(DomainError::PointOutOfRange(Point::new(2, 9)))
        );
    }

    #[test]
    fn test_postcondition_holds_after_place() {
        let before = Turn::first(1, started());
        let after = before
            .place_next(Disc::Dark, Point::new(2, 3))
            .expect("legal move");
        assert!(PlaceContract::post(&before, &after).is_ok());
    }

    #[test]
    fn test_postcondition_detects_corruption() {
        let before = Turn::first(1, started());
        let after = before
            .place_next(Disc::Dark, Point::new(2, 3))
            .expect("legal move");

        // Same move, but the flip never happened.
        let corrupted = Turn::restore(
            after.game_id(),
            after.turn_count(),
            after.next_disc(),
            after.mv(),
            Board::initial(),
            after.end_at(),
        );

        assert!(matches!(
            PlaceContract::post(&before, &corrupted),
            Err(DomainError::InvariantViolation(_))
        ));
    }
}
