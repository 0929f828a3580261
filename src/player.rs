use log::info;

use crate::board::Board;
use crate::engine::{find_move, AiConfig};
use crate::error::Result;
use crate::piece::Side;

/// Where a manual player's input comes from: a terminal, a UI, a script.
pub trait MoveSource {
    /// The next command entered for `side`, or `None` once input is exhausted.
    fn next_command(&mut self, side: Side, board: &Board) -> Option<String>;
}

impl<F> MoveSource for F
where
    F: FnMut(Side, &Board) -> Option<String>,
{
    fn next_command(&mut self, side: Side, board: &Board) -> Option<String> {
        self(side, board)
    }
}

/// One party in a game: either fed by a `MoveSource` or driven by the search.
pub enum Player {
    Manual {
        side: Side,
        source: Box<dyn MoveSource>,
    },
    Automatic {
        side: Side,
        config: AiConfig,
    },
}

impl Player {
    pub fn manual(side: Side, source: impl MoveSource + 'static) -> Player {
        Player::Manual {
            side,
            source: Box::new(source),
        }
    }

    pub fn automatic(side: Side, config: AiConfig) -> Player {
        Player::Automatic { side, config }
    }

    pub fn side(&self) -> Side {
        match self {
            Player::Manual { side, .. } | Player::Automatic { side, .. } => *side,
        }
    }

    pub fn is_manual(&self) -> bool {
        matches!(self, Player::Manual { .. })
    }

    /// The next command from this player: whatever a manual source supplies,
    /// or the notation of the searched move. `None` means a manual source
    /// has run dry.
    pub fn my_move(&mut self, board: &Board) -> Result<Option<String>> {
        match self {
            Player::Manual { side, source } => Ok(source.next_command(*side, board)),
            Player::Automatic { side, config } => {
                let result = find_move(board, config)?;
                info!("{side} plays {} (score {}, depth {})", result.mv, result.score, result.depth);
                Ok(Some(result.mv.to_string()))
            }
        }
    }
}
