//! Disc markers held by board cells.

use tracing::instrument;

use super::DomainError;

/// Content of a single board cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Disc {
    /// No disc.
    Empty,
    /// Dark disc (moves first).
    Dark,
    /// Light disc.
    Light,
    /// Boundary sentinel around the playable grid.
    ///
    /// Only exists inside the board's flip scan; never part of a
    /// visible or persisted board.
    Wall,
}

impl Disc {
    /// Returns the opposing color, or `None` for `Empty` and `Wall`.
    pub fn opposite(self) -> Option<Self> {
        match self {
            Disc::Dark => Some(Disc::Light),
            Disc::Light => Some(Disc::Dark),
            Disc::Empty | Disc::Wall => None,
        }
    }

    /// Returns true if `other` is the opposing color of `self`.
    pub fn is_opposite_of(self, other: Disc) -> bool {
        self.opposite() == Some(other)
    }

    /// Returns true for `Dark` and `Light`.
    pub fn is_color(self) -> bool {
        matches!(self, Disc::Dark | Disc::Light)
    }

    /// Numeric code used on the wire and in storage (0=empty, 1=dark, 2=light).
    pub fn code(self) -> u8 {
        match self {
            Disc::Empty => 0,
            Disc::Dark => 1,
            Disc::Light => 2,
            Disc::Wall => 3,
        }
    }

    /// Decodes a cell code. The wall sentinel is not a valid external value.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidDisc`] for anything other than 0, 1 or 2.
    #[instrument]
    pub fn from_code(code: i32) -> Result<Self, DomainError> {
        match code {
            0 => Ok(Disc::Empty),
            1 => Ok(Disc::Dark),
            2 => Ok(Disc::Light),
            _ => Err(DomainError::InvalidDisc(code)),
        }
    }

    /// Decodes the disc of a move, which must be a color.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidDisc`] for anything other than 1 or 2.
    #[instrument]
    pub fn from_move_code(code: i32) -> Result<Self, DomainError> {
        match Self::from_code(code)? {
            disc if disc.is_color() => Ok(disc),
            _ => Err(DomainError::InvalidDisc(code)),
        }
    }
}
