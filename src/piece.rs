use std::fmt;

use serde::{Deserialize, Serialize};

/// The two sides. Black attacks and moves first; White defends the king.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    White,
    Black,
}

impl Side {
    pub fn opponent(self) -> Side {
        match self {
            Side::White => Side::Black,
            Side::Black => Side::White,
        }
    }

    /// Turn sign used as the first character of the encoded board.
    pub fn to_char(self) -> char {
        match self {
            Side::White => 'W',
            Side::Black => 'B',
        }
    }

    /// +1 for White, -1 for Black. Scores are kept from White's point of view.
    pub fn sign(self) -> i32 {
        match self {
            Side::White => 1,
            Side::Black => -1,
        }
    }

    pub fn from_name(name: &str) -> Option<Side> {
        match name.to_ascii_lowercase().as_str() {
            "white" | "w" => Some(Side::White),
            "black" | "b" => Some(Side::Black),
            _ => None,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::White => write!(f, "White"),
            Side::Black => write!(f, "Black"),
        }
    }
}

/// Contents of a single square.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Piece {
    #[default]
    Empty,
    White,
    Black,
    King,
}

impl Piece {
    /// The side owning this piece. The king plays for White.
    pub fn side(self) -> Option<Side> {
        match self {
            Piece::Empty => None,
            Piece::White | Piece::King => Some(Side::White),
            Piece::Black => Some(Side::Black),
        }
    }

    pub fn is_empty(self) -> bool {
        self == Piece::Empty
    }

    pub fn to_char(self) -> char {
        match self {
            Piece::Empty => '-',
            Piece::White => 'W',
            Piece::Black => 'B',
            Piece::King => 'K',
        }
    }

    pub fn from_char(c: char) -> Option<Piece> {
        match c {
            '-' => Some(Piece::Empty),
            'W' => Some(Piece::White),
            'B' => Some(Piece::Black),
            'K' => Some(Piece::King),
            _ => None,
        }
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_char())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn king_belongs_to_white() {
        assert_eq!(Piece::King.side(), Some(Side::White));
        assert_eq!(Piece::White.side(), Some(Side::White));
        assert_eq!(Piece::Black.side(), Some(Side::Black));
        assert_eq!(Piece::Empty.side(), None);
    }

    #[test]
    fn piece_chars_round_trip() {
        for p in [Piece::Empty, Piece::White, Piece::Black, Piece::King] {
            assert_eq!(Piece::from_char(p.to_char()), Some(p));
        }
        assert_eq!(Piece::from_char('x'), None);
    }

    #[test]
    fn side_names() {
        assert_eq!(Side::from_name("WHITE"), Some(Side::White));
        assert_eq!(Side::from_name("b"), Some(Side::Black));
        assert_eq!(Side::from_name("king"), None);
        assert_eq!(Side::Black.opponent(), Side::White);
    }
}
