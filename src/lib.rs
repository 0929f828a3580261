pub mod board;
pub mod engine;
pub mod error;
pub mod moves;
pub mod piece;
pub mod player;
pub mod square;

#[cfg(target_arch = "wasm32")]
mod wasm_api;

pub use board::Board;
pub use engine::{find_move, AiConfig, PickResult};
pub use error::{Result, TablutError};
pub use moves::Move;
pub use piece::{Piece, Side};
pub use square::{Direction, Square};
