//! Reversi board and flip computation.
//!
//! The visible 8x8 grid is stored inside a one-cell border of
//! [`Disc::Wall`] sentinels, so a ray scan can step in any of the eight
//! directions without checking the grid edges.

use strum::{EnumIter, IntoEnumIterator};
use tracing::{debug, instrument};

use super::{Disc, DomainError, Move, Point};

/// Width and height of the playable grid.
pub const BOARD_SIZE: usize = 8;

const WALLED_SIZE: usize = BOARD_SIZE + 2;

/// The eight compass directions a flip scan walks along.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter)]
enum Direction {
    Up,
    UpLeft,
    Left,
    DownLeft,
    Down,
    DownRight,
    Right,
    UpRight,
}

impl Direction {
    /// Step as `(dx, dy)`, with y growing downwards.
    fn delta(self) -> (isize, isize) {
        match self {
            Direction::Up => (0, -1),
            Direction::UpLeft => (-1, -1),
            Direction::Left => (-1, 0),
            Direction::DownLeft => (-1, 1),
            Direction::Down => (0, 1),
            Direction::DownRight => (1, 1),
            Direction::Right => (1, 0),
            Direction::UpRight => (1, -1),
        }
    }
}

/// Immutable 8x8 Reversi board.
///
/// Every transition returns a new board; the receiver is never modified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Board {
    /// Cells indexed `[y][x]` with a wall border; visible cell (x, y)
    /// lives at `[y + 1][x + 1]`.
    walled: [[Disc; WALLED_SIZE]; WALLED_SIZE],
}

impl Board {
    /// Creates the standard starting position.
    ///
    /// Light on (3,3) and (4,4), Dark on (4,3) and (3,4).
    pub fn initial() -> Self {
        let mut discs = [[Disc::Empty; BOARD_SIZE]; BOARD_SIZE];
        discs[3][3] = Disc::Light;
        discs[3][4] = Disc::Dark;
        discs[4][3] = Disc::Dark;
        discs[4][4] = Disc::Light;
        Self::walled_from(discs)
    }

    /// Restores a board from visible discs indexed `[y][x]`.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidBoard`] if any cell holds the wall sentinel.
    #[instrument(skip(discs))]
    pub fn from_discs(discs: [[Disc; BOARD_SIZE]; BOARD_SIZE]) -> Result<Self, DomainError> {
        if let Some((y, x)) = discs.iter().enumerate().find_map(|(y, row)| {
            row.iter()
                .position(|disc| *disc == Disc::Wall)
                .map(|x| (y, x))
        }) {
            return Err(DomainError::InvalidBoard(format!(
                "wall sentinel at ({}, {})",
                x, y
            )));
        }
        Ok(Self::walled_from(discs))
    }

    /// Restores a board from rows of discs, checking the 8x8 shape.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidBoard`] if the rows are not 8x8 or
    /// contain the wall sentinel.
    #[instrument(skip(rows), fields(rows = rows.len()))]
    pub fn from_rows(rows: &[Vec<Disc>]) -> Result<Self, DomainError> {
        if rows.len() != BOARD_SIZE {
            return Err(DomainError::InvalidBoard(format!(
                "expected {} rows, got {}",
                BOARD_SIZE,
                rows.len()
            )));
        }
        let mut discs = [[Disc::Empty; BOARD_SIZE]; BOARD_SIZE];
        for (y, row) in rows.iter().enumerate() {
            if row.len() != BOARD_SIZE {
                return Err(DomainError::InvalidBoard(format!(
                    "row {} has {} cells",
                    y,
                    row.len()
                )));
            }
            discs[y].copy_from_slice(row);
        }
        Self::from_discs(discs)
    }

    fn walled_from(discs: [[Disc; BOARD_SIZE]; BOARD_SIZE]) -> Self {
        let mut walled = [[Disc::Wall; WALLED_SIZE]; WALLED_SIZE];
        for (y, row) in discs.iter().enumerate() {
            walled[y + 1][1..=BOARD_SIZE].copy_from_slice(row);
        }
        Self { walled }
    }

    /// Returns the visible discs indexed `[y][x]`.
    pub fn discs(&self) -> [[Disc; BOARD_SIZE]; BOARD_SIZE] {
        let mut discs = [[Disc::Empty; BOARD_SIZE]; BOARD_SIZE];
        for (y, row) in discs.iter_mut().enumerate() {
            row.copy_from_slice(&self.walled[y + 1][1..=BOARD_SIZE]);
        }
        discs
    }

    /// Gets the disc at a point, or `None` if the point is off the board.
    pub fn get(&self, point: Point) -> Option<Disc> {
        point
            .is_on_board()
            .then(|| self.walled[usize::from(point.y()) + 1][usize::from(point.x()) + 1])
    }

    /// Places a disc and flips every bracketed opposing disc.
    ///
    /// # Errors
    ///
    /// - [`DomainError::PointOutOfRange`] if the point is off the board.
    /// - [`DomainError::CellOccupied`] if the target cell is not empty.
    /// - [`DomainError::NoDiscsToFlip`] if no opposing disc would flip.
    #[instrument(skip(self), fields(disc = ?mv.disc(), point = %mv.point()))]
    pub fn place(&self, mv: &Move) -> Result<Self, DomainError> {
        let point = mv.point();
        let current = self.get(point).ok_or(DomainError::PointOutOfRange(point))?;
        if current != Disc::Empty {
            debug!(?current, "Target cell occupied");
            return Err(DomainError::CellOccupied(point));
        }

        let flips = self.scan_flips(mv.disc(), point);
        if flips.is_empty() {
            debug!("No discs to flip");
            return Err(DomainError::NoDiscsToFlip(point));
        }

        let mut next = *self;
        next.set(point, mv.disc());
        for flip in &flips {
            next.set(*flip, mv.disc());
        }

        debug!(flips = flips.len(), "Disc placed");
        Ok(next)
    }

    /// Lists the discs a move would flip.
    ///
    /// Empty if the point is off the board, the cell is occupied or the
    /// move is illegal.
    pub fn flip_points(&self, mv: &Move) -> Vec<Point> {
        match self.get(mv.point()) {
            Some(Disc::Empty) => self.scan_flips(mv.disc(), mv.point()),
            _ => Vec::new(),
        }
    }

    /// Returns true if `disc` has at least one legal move.
    #[instrument(skip(self))]
    pub fn exist_valid_move(&self, disc: Disc) -> bool {
        self.empty_points()
            .any(|point| !self.scan_flips(disc, point).is_empty())
    }

    /// Lists every point where `disc` could legally play, row by row.
    #[instrument(skip(self))]
    pub fn valid_moves(&self, disc: Disc) -> Vec<Point> {
        self.empty_points()
            .filter(|point| !self.scan_flips(disc, *point).is_empty())
            .collect()
    }

    /// Counts the visible cells holding `disc`.
    pub fn count(&self, disc: Disc) -> usize {
        self.discs()
            .iter()
            .flatten()
            .filter(|cell| **cell == disc)
            .count()
    }

    fn empty_points(&self) -> impl Iterator<Item = Point> + '_ {
        (0..BOARD_SIZE as u8)
            .flat_map(|y| (0..BOARD_SIZE as u8).map(move |x| Point::new(x, y)))
            .filter(|point| self.get(*point) == Some(Disc::Empty))
    }

    /// Walks the eight rays out of `point`.
    ///
    /// A ray contributes its run of opposing discs only when the run ends
    /// on a disc of the mover's color; runs ending on a wall or an empty
    /// cell contribute nothing.
    fn scan_flips(&self, disc: Disc, point: Point) -> Vec<Point> {
        let mut flips = Vec::new();
        let origin_x = isize::from(point.x()) + 1;
        let origin_y = isize::from(point.y()) + 1;

        for direction in Direction::iter() {
            let (dx, dy) = direction.delta();
            let mut candidates = Vec::new();
            let mut x = origin_x + dx;
            let mut y = origin_y + dy;

            loop {
                let cell = self.walled_at(x, y);
                if disc.is_opposite_of(cell) {
                    // Cells holding a color are always inside the wall, so x, y >= 1.
                    candidates.push(Point::new((x - 1) as u8, (y - 1) as u8));
                    x += dx;
                    y += dy;
                } else {
                    if cell == disc {
                        flips.append(&mut candidates);
                    }
                    break;
                }
            }
        }

        flips
    }

    fn walled_at(&self, x: isize, y: isize) -> Disc {
        let (Ok(x), Ok(y)) = (usize::try_from(x), usize::try_from(y)) else {
            return Disc::Wall;
        };
        self.walled
            .get(y)
            .and_then(|row| row.get(x))
            .copied()
            .unwrap_or(Disc::Wall)
    }

    fn set(&mut self, point: Point, disc: Disc) {
        self.walled[usize::from(point.y()) + 1][usize::from(point.x()) + 1] = disc;
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::initial()
    }
}

impl std::fmt::Display for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (y, row) in self.discs().iter().enumerate() {
            if y > 0 {
                writeln!(f)?;
            }
            for disc in row {
                let symbol = match disc {
                    Disc::Empty => '.',
                    Disc::Dark => 'x',
                    Disc::Light => 'o',
                    Disc::Wall => '#',
                };
                write!(f, "{}", symbol)?;
            }
        }
        Ok(())
    }
}
