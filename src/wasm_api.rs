use crate::board::Board;
use crate::engine::{evaluate_breakdown, find_move, AiConfig};
use crate::moves::Move;
use crate::square::{Square, SIZE};
use serde::Serialize;
use wasm_bindgen::prelude::*;

#[derive(Serialize)]
struct MoveJson {
    from: [usize; 2],
    to: [usize; 2],
    notation: String,
}

impl From<Move> for MoveJson {
    fn from(m: Move) -> Self {
        MoveJson {
            from: [m.from.col(), m.from.row()],
            to: [m.to.col(), m.to.row()],
            notation: m.to_string(),
        }
    }
}

#[derive(Serialize)]
struct BoardState {
    /// squares[row][col], one of "-", "W", "B", "K"
    squares: Vec<Vec<String>>,
    turn: String,
    winner: Option<String>,
    repeated: bool,
    move_count: usize,
    legal_moves: Vec<MoveJson>,
    last_move: Option<MoveJson>,
    encoded: String,
}

#[derive(Serialize)]
struct MoveResult {
    #[serde(flatten)]
    board_state: Option<BoardState>,
    error: Option<String>,
}

#[derive(Serialize)]
struct EvalBreakdownJson {
    outcome: i32,
    material: i32,
    king_distance: i32,
    total: i32,
}

fn build_board_state(board: &Board) -> BoardState {
    let squares = (0..SIZE)
        .map(|row| {
            (0..SIZE)
                .map(|col| {
                    let sq = Square::at(col as u8, row as u8);
                    board.get(sq).to_string()
                })
                .collect()
        })
        .collect();

    let legal_moves = if board.is_game_over() {
        Vec::new()
    } else {
        board.legal_moves(board.turn()).into_iter().map(MoveJson::from).collect()
    };

    BoardState {
        squares,
        turn: board.turn().to_string(),
        winner: board.winner().map(|s| s.to_string()),
        repeated: board.repeated_position(),
        move_count: board.move_count(),
        legal_moves,
        last_move: board.last_move().map(MoveJson::from),
        encoded: board.encoded_board(),
    }
}

fn to_js<T: Serialize>(value: &T) -> JsValue {
    serde_wasm_bindgen::to_value(value).unwrap_or(JsValue::NULL)
}

fn error_result(message: String) -> JsValue {
    to_js(&MoveResult {
        board_state: None,
        error: Some(message),
    })
}

#[wasm_bindgen]
pub struct Game {
    board: Board,
    ai_config: AiConfig,
    last_evals: u64,
}

#[wasm_bindgen]
impl Game {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Game {
        Game {
            board: Board::new(),
            ai_config: AiConfig::new(),
            last_evals: 0,
        }
    }

    pub fn build_info() -> String {
        env!("BUILD_TIMESTAMP").to_string()
    }

    /// Cap the search depth; 0 removes the cap.
    pub fn set_max_depth(&mut self, depth: u32) {
        self.ai_config.max_depth = (depth > 0).then_some(depth);
    }

    pub fn get_board_state(&self) -> JsValue {
        to_js(&build_board_state(&self.board))
    }

    pub fn make_move(&mut self, notation: &str) -> JsValue {
        let result = Move::from_notation(notation).and_then(|m| self.board.make_move(m));
        match result {
            Ok(()) => self.get_board_state(),
            Err(e) => error_result(e.to_string()),
        }
    }

    pub fn make_ai_move(&mut self) -> JsValue {
        let result = find_move(&self.board, &self.ai_config)
            .and_then(|pick| {
                self.last_evals = pick.evals;
                self.board.make_move(pick.mv)
            });
        match result {
            Ok(()) => self.get_board_state(),
            Err(e) => error_result(e.to_string()),
        }
    }

    pub fn undo(&mut self) -> JsValue {
        match self.board.undo() {
            Ok(()) => self.get_board_state(),
            Err(e) => error_result(e.to_string()),
        }
    }

    pub fn get_hint(&self) -> JsValue {
        match find_move(&self.board, &self.ai_config) {
            Ok(pick) => to_js(&MoveJson::from(pick.mv)),
            Err(_) => JsValue::NULL,
        }
    }

    pub fn get_legal_moves_for_square(&self, notation: &str) -> JsValue {
        let Ok(from) = notation.parse::<Square>() else {
            return JsValue::NULL;
        };
        let side = self.board.turn();
        let targets: Vec<MoveJson> = self
            .board
            .legal_moves(side)
            .into_iter()
            .filter(|m| m.from == from)
            .map(MoveJson::from)
            .collect();
        to_js(&targets)
    }

    pub fn get_last_evals(&self) -> u64 {
        self.last_evals
    }

    pub fn get_eval_breakdown(&self) -> JsValue {
        let breakdown = evaluate_breakdown(&self.board);
        to_js(&EvalBreakdownJson {
            outcome: breakdown.outcome,
            material: breakdown.material,
            king_distance: breakdown.king_distance,
            total: breakdown.total,
        })
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}
