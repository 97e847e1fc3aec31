//! Board coordinates.

use super::board::BOARD_SIZE;

/// A (column, row) coordinate on the board.
///
/// Points do not check bounds themselves; the board rejects points
/// that fall outside the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
#[display("({}, {})", x, y)]
pub struct Point {
    x: u8,
    y: u8,
}

impl Point {
    /// Creates a point at column `x`, row `y`.
    pub const fn new(x: u8, y: u8) -> Self {
        Self { x, y }
    }

    /// Column, 0 on the left.
    pub fn x(&self) -> u8 {
        self.x
    }

    /// Row, 0 at the top.
    pub fn y(&self) -> u8 {
        self.y
    }

    /// Returns true if the point lies on the 8x8 grid.
    pub fn is_on_board(&self) -> bool {
        usize::from(self.x) < BOARD_SIZE && usize::from(self.y) < BOARD_SIZE
    }
}
