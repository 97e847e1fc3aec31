//! First-class invariants for turn transitions.
//!
//! Invariants are logical properties every `place_next` transition must
//! preserve. They are checked in debug builds and tested independently.

use super::Turn;

/// A logical property that must hold for a given state.
pub trait Invariant<S> {
    /// Checks if the invariant holds for the given state.
    fn holds(state: &S) -> bool;

    /// Human-readable description of the invariant.
    fn description() -> &'static str;
}

/// Violation of an invariant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvariantViolation {
    /// Description of the violated invariant.
    pub description: String,
}

impl InvariantViolation {
    /// Creates a new invariant violation.
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
        }
    }
}

/// A set of invariants that can be checked together.
///
/// Implementations are provided for tuples.
pub trait InvariantSet<S> {
    /// Checks all invariants in the set, collecting every violation.
    fn check_all(state: &S) -> Result<(), Vec<InvariantViolation>>;
}

/// Implements [`InvariantSet`] for a tuple of invariants, checking them in order.
macro_rules! impl_invariant_set {
    ($($inv:ident),+) => {
        impl<S, $($inv),+> InvariantSet<S> for ($($inv,)+)
        where
            $($inv: Invariant<S>,)+
        {
            fn check_all(state: &S) -> Result<(), Vec<InvariantViolation>> {
                let violations: Vec<_> = [$(($inv::holds(state), $inv::description())),+]
                    .into_iter()
                    .filter(|(holds, _)| !holds)
                    .map(|(_, description)| InvariantViolation::new(description))
                    .collect();

                if violations.is_empty() {
                    Ok(())
                } else {
                    Err(violations)
                }
            }
        }
    };
}

impl_invariant_set!(I1, I2);
impl_invariant_set!(I1, I2, I3);

/// A turn and its successor, the state every transition invariant inspects.
#[derive(Debug, Clone, Copy)]
pub struct Transition<'a> {
    /// Turn the move was played on.
    pub before: &'a Turn,
    /// Turn produced by the move.
    pub after: &'a Turn,
}

impl<'a> Transition<'a> {
    /// Pairs a turn with its successor.
    pub fn new(before: &'a Turn, after: &'a Turn) -> Self {
        Self { before, after }
    }
}

mod discs_conserved;
mod next_disc_consistent;
mod turn_advanced;

pub use discs_conserved::DiscsConservedInvariant;
pub use next_disc_consistent::NextDiscConsistentInvariant;
pub use turn_advanced::TurnAdvancedInvariant;

/// All turn transition invariants as a composable set.
pub type TurnInvariants = (
    DiscsConservedInvariant,
    NextDiscConsistentInvariant,
    TurnAdvancedInvariant,
);
