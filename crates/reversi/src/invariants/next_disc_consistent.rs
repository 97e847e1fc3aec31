//! Next-disc consistency: the recorded next mover can actually move.

use super::{Invariant, Transition};
use crate::Disc;

/// Invariant: `next_disc` is `None` iff neither color has a legal move,
/// and otherwise names a color that has one.
pub struct NextDiscConsistentInvariant;

impl Invariant<Transition<'_>> for NextDiscConsistentInvariant {
    fn holds(transition: &Transition<'_>) -> bool {
        let board = transition.after.board();
        match transition.after.next_disc() {
            None => !board.exist_valid_move(Disc::Dark) && !board.exist_valid_move(Disc::Light),
            Some(disc) => disc.is_color() && board.exist_valid_move(disc),
        }
    }

    fn description() -> &'static str {
        "Next disc is none iff no color can move, otherwise it can move"
    }
}
