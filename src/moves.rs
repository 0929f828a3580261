use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TablutError};
use crate::square::{Square, SQUARE_COUNT};

/// A rook-like slide from one square to another.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    pub from: Square,
    pub to: Square,
}

/// Every rook move, indexed by `from.index() * SQUARE_COUNT + to.index()`.
fn move_table() -> &'static [Option<Move>] {
    static TABLE: OnceLock<Vec<Option<Move>>> = OnceLock::new();
    TABLE.get_or_init(|| {
        Square::all()
            .flat_map(|from| {
                Square::all().map(move |to| from.is_rook_move(to).then_some(Move { from, to }))
            })
            .collect()
    })
}

impl Move {
    /// The move `from`-`to`, or `None` when the squares are not rook-aligned.
    pub fn mv(from: Square, to: Square) -> Option<Move> {
        move_table()[from.index() * SQUARE_COUNT + to.index()]
    }

    /// Parse `a4-a3` notation.
    pub fn from_notation(s: &str) -> Result<Move> {
        let invalid = || TablutError::InvalidMove(s.to_string());
        let (from, to) = s.trim().split_once('-').ok_or_else(invalid)?;
        let from: Square = from.parse().map_err(|_| invalid())?;
        let to: Square = to.parse().map_err(|_| invalid())?;
        Move::mv(from, to).ok_or_else(invalid)
    }

    /// Convert to `a4-a3` notation.
    pub fn to_notation(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.from, self.to)
    }
}

impl FromStr for Move {
    type Err = TablutError;

    fn from_str(s: &str) -> Result<Move> {
        Move::from_notation(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_holds_only_rook_moves() {
        let count = move_table().iter().flatten().count();
        // 81 squares, 16 rook destinations each.
        assert_eq!(count, 81 * 16);
        let a1: Square = "a1".parse().unwrap();
        let b2: Square = "b2".parse().unwrap();
        assert_eq!(Move::mv(a1, b2), None);
        assert_eq!(Move::mv(a1, a1), None);
    }

    #[test]
    fn notation() {
        let m = Move::from_notation("a4-a3").unwrap();
        assert_eq!(m.from, "a4".parse().unwrap());
        assert_eq!(m.to, "a3".parse().unwrap());
        assert_eq!(m.to_notation(), "a4-a3");
        assert_eq!("e5-h5".parse::<Move>().unwrap().to_string(), "e5-h5");
    }

    #[test]
    fn bad_notation_is_rejected() {
        for s in ["a4a3", "a4-b3", "a4-a4", "z1-z2", "", "a4-"] {
            assert_eq!(Move::from_notation(s), Err(TablutError::InvalidMove(s.to_string())), "{s}");
        }
    }
}
