//! Move type: a disc color placed at a point.

use tracing::instrument;

use super::{Disc, DomainError, Point};

/// A move in Reversi: a player placing a disc of their color at a point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    disc: Disc,
    point: Point,
}

impl Move {
    /// Creates a new move.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidDisc`] if `disc` is `Empty` or `Wall`.
    #[instrument]
    pub fn new(disc: Disc, point: Point) -> Result<Self, DomainError> {
        if !disc.is_color() {
            return Err(DomainError::InvalidDisc(i32::from(disc.code())));
        }
        Ok(Self { disc, point })
    }

    /// Returns the color being placed.
    pub fn disc(&self) -> Disc {
        self.disc
    }

    /// Returns the target point.
    pub fn point(&self) -> Point {
        self.point
    }
}

impl std::fmt::Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?} -> {}", self.disc, self.point)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_move_requires_color() {
        assert!(Move::new(Disc::Dark, Point::new(2, 3)).is_ok());
        assert_eq!(
            Move::new(Disc::Empty, Point::new(2, 3)),
            Err(DomainError::InvalidDisc(0))
        );
        assert_eq!(
            Move::new(Disc::Wall, Point::new(2, 3)),
            Err(DomainError::InvalidDisc(3))
        );
    }
}
