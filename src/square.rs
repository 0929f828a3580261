// =============================================================================
// Board geometry
//
// Squares are numbered row-major from a1: index = 9 * row + col, so a1 = 0,
// i1 = 8, a2 = 9 and i9 = 80. Columns 'a'..'i' are col 0..8 and rows
// '1'..'9' are row 0..8. North is increasing row, East increasing col.
// =============================================================================

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TablutError};

/// Number of squares on a side of the board.
pub const SIZE: usize = 9;

/// Total number of squares.
pub const SQUARE_COUNT: usize = SIZE * SIZE;

/// The four orthogonal directions, in move-generation order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    North,
    East,
    South,
    West,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    /// (d_col, d_row) for one step in this direction.
    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::North => (0, 1),
            Direction::East => (1, 0),
            Direction::South => (0, -1),
            Direction::West => (-1, 0),
        }
    }

    pub fn opposite(self) -> Direction {
        match self {
            Direction::North => Direction::South,
            Direction::East => Direction::West,
            Direction::South => Direction::North,
            Direction::West => Direction::East,
        }
    }
}

/// One of the 81 squares.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Square(u8);

impl Square {
    /// The central square. Only the king may stand on it.
    pub const THRONE: Square = Square::at(4, 4);
    pub const NTHRONE: Square = Square::at(4, 5);
    pub const ETHRONE: Square = Square::at(5, 4);
    pub const STHRONE: Square = Square::at(4, 3);
    pub const WTHRONE: Square = Square::at(3, 4);

    /// The four squares orthogonally adjacent to the throne.
    pub const THRONE_NEIGHBORS: [Square; 4] = [
        Square::NTHRONE,
        Square::ETHRONE,
        Square::STHRONE,
        Square::WTHRONE,
    ];

    pub(crate) const fn at(col: u8, row: u8) -> Square {
        Square(row * SIZE as u8 + col)
    }

    /// The square at (`col`, `row`), both in 0..=8.
    pub fn new(col: i32, row: i32) -> Result<Square> {
        Self::checked(col, row).ok_or(TablutError::OutOfRange { col, row })
    }

    fn checked(col: i32, row: i32) -> Option<Square> {
        if (0..SIZE as i32).contains(&col) && (0..SIZE as i32).contains(&row) {
            Some(Square::at(col as u8, row as u8))
        } else {
            None
        }
    }

    pub fn from_index(index: usize) -> Option<Square> {
        (index < SQUARE_COUNT).then(|| Square(index as u8))
    }

    /// All squares in index order.
    pub fn all() -> impl Iterator<Item = Square> {
        (0..SQUARE_COUNT as u8).map(Square)
    }

    pub fn col(self) -> usize {
        self.0 as usize % SIZE
    }

    pub fn row(self) -> usize {
        self.0 as usize / SIZE
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }

    pub fn is_edge(self) -> bool {
        let (c, r) = (self.col(), self.row());
        c == 0 || c == SIZE - 1 || r == 0 || r == SIZE - 1
    }

    pub fn is_throne(self) -> bool {
        self == Square::THRONE
    }

    pub fn is_throne_neighbor(self) -> bool {
        Square::THRONE_NEIGHBORS.contains(&self)
    }

    /// Steps from this square to the nearest edge square.
    pub fn edge_distance(self) -> usize {
        let (c, r) = (self.col(), self.row());
        c.min(SIZE - 1 - c).min(r).min(SIZE - 1 - r)
    }

    /// True iff `to` shares a row or column with this square and differs from it.
    pub fn is_rook_move(self, to: Square) -> bool {
        self != to && (self.col() == to.col() || self.row() == to.row())
    }

    /// Direction of travel from this square to `to`, or `None` when the two
    /// are not rook-aligned.
    pub fn direction(self, to: Square) -> Option<Direction> {
        if !self.is_rook_move(to) {
            return None;
        }
        Some(if self.col() == to.col() {
            if to.row() > self.row() {
                Direction::North
            } else {
                Direction::South
            }
        } else if to.col() > self.col() {
            Direction::East
        } else {
            Direction::West
        })
    }

    /// The square `n` steps away in direction `dir`, if still on the board.
    pub fn step(self, dir: Direction, n: usize) -> Option<Square> {
        let (dc, dr) = dir.delta();
        let n = n as i32;
        Self::checked(self.col() as i32 + dc * n, self.row() as i32 + dr * n)
    }

    pub fn neighbor(self, dir: Direction) -> Option<Square> {
        self.step(dir, 1)
    }

    /// The square separating this one from `other` when they are rook-aligned
    /// exactly two apart.
    pub fn between(self, other: Square) -> Option<Square> {
        let dir = self.direction(other)?;
        if self.step(dir, 2) == Some(other) {
            self.step(dir, 1)
        } else {
            None
        }
    }

    /// Squares reachable by a rook from here in `dir` on an empty board,
    /// nearest first.
    pub fn rook_ray(self, dir: Direction) -> RookRay {
        RookRay {
            next: self.neighbor(dir),
            dir,
        }
    }

    /// The four rook rays in N, E, S, W order.
    pub fn rook_rays(self) -> [RookRay; 4] {
        Direction::ALL.map(|dir| self.rook_ray(dir))
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = (b'a' + self.col() as u8) as char;
        let r = (b'1' + self.row() as u8) as char;
        write!(f, "{c}{r}")
    }
}

impl FromStr for Square {
    type Err = TablutError;

    /// Parse `e5`-style notation.
    fn from_str(s: &str) -> Result<Square> {
        let bytes = s.as_bytes();
        if bytes.len() != 2 {
            return Err(TablutError::InvalidSquare(s.to_string()));
        }
        let col = bytes[0].wrapping_sub(b'a') as i32;
        let row = bytes[1].wrapping_sub(b'1') as i32;
        Self::checked(col, row).ok_or_else(|| TablutError::InvalidSquare(s.to_string()))
    }
}

/// Lazy walk along one rank or file, stopping at the board edge.
#[derive(Clone, Debug)]
pub struct RookRay {
    next: Option<Square>,
    dir: Direction,
}

impl Iterator for RookRay {
    type Item = Square;

    fn next(&mut self) -> Option<Square> {
        let current = self.next?;
        self.next = current.neighbor(self.dir);
        Some(current)
    }
}

impl std::iter::FusedIterator for RookRay {}
