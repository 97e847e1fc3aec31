//! Turn advance: successor stays in the same game, one count later.

use super::{Invariant, Transition};

/// Invariant: `after` is the same game and `turn_count` grew by exactly one.
pub struct TurnAdvancedInvariant;

impl Invariant<Transition<'_>> for TurnAdvancedInvariant {
    fn holds(transition: &Transition<'_>) -> bool {
        transition.after.game_id() == transition.before.game_id()
            && transition.before.turn_count().checked_add(1) == Some(transition.after.turn_count())
    }

    fn description() -> &'static str {
        "Turn count advances by exactly one within the same game"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Board, Disc, Turn};

    fn started() -> chrono::NaiveDateTime {
        chrono::DateTime::from_timestamp(1_700_000_000, 0)
            .expect("valid timestamp")
            .naive_utc()
    }

    #[test]
    fn test_next_count_holds() {
        let before = Turn::first(3, started());
        let after = Turn::restore(3, 1, Some(Disc::Light), None, Board::initial(), started());
        assert!(TurnAdvancedInvariant::holds(&Transition::new(&before, &after)));
    }

    #[test]
    fn test_skipped_count_violates() {
        let before = Turn::first(3, started());
        let after = Turn::restore(3, 2, Some(Disc::Light), None, Board::initial(), started());
        assert!(!TurnAdvancedInvariant::holds(&Transition::new(&before, &after)));
    }

    #[test]
    fn test_other_game_violates() {
        let before = Turn::first(3, started());
        let after = Turn::restore(4, 1, Some(Disc::Light), None, Board::initial(), started());
        assert!(!TurnAdvancedInvariant::holds(&Transition::new(&before, &after)));
    }
}
