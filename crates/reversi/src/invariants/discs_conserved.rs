//! Disc conservation: a move adds one disc and recolors exactly the flips.

use super::{Invariant, Transition};

/// Invariant: the mover gains `1 + flips` discs and the opponent loses `flips`.
///
/// The flip set is recomputed from the board before the move, so a board
/// that skipped or invented a flip is caught.
pub struct DiscsConservedInvariant;

impl Invariant<Transition<'_>> for DiscsConservedInvariant {
    fn holds(transition: &Transition<'_>) -> bool {
        let Some(mv) = transition.after.mv() else {
            return false;
        };
        let Some(opponent) = mv.disc().opposite() else {
            return false;
        };

        let before = transition.before.board();
        let after = transition.after.board();
        let flips = before.flip_points(&mv).len();

        flips > 0
            && after.count(mv.disc()) == before.count(mv.disc()) + 1 + flips
            && after.count(opponent) + flips == before.count(opponent)
    }

    fn description() -> &'static str {
        "Mover gains one disc plus flips, opponent loses exactly the flips"
    }
}
