//! Error types for the rules and search engines.

use crate::moves::Move;
use crate::piece::Side;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum TablutError {
    /// Coordinates outside the 9x9 board
    #[error("square ({col}, {row}) is off the board")]
    OutOfRange { col: i32, row: i32 },

    /// `make_move` precondition violated
    #[error("illegal move: {0}")]
    IllegalMove(Move),

    /// `undo` with nothing recorded to undo
    #[error("cannot undo: at the beginning of the recorded game")]
    CannotUndo,

    /// Search asked to move for a side that has no legal move
    #[error("{0} has no legal move")]
    NoLegalMove(Side),

    /// Search asked to move after the game was decided
    #[error("game is over: {0} won")]
    GameOver(Side),

    #[error("invalid square: {0:?}")]
    InvalidSquare(String),

    #[error("invalid move: {0:?}")]
    InvalidMove(String),
}

pub type Result<T> = std::result::Result<T, TablutError>;
