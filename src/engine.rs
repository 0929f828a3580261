// =============================================================================
// Tablut AI Engine
//
// Depth-limited negamax with fail-soft alpha-beta pruning over a single
// mutable board, driven through make_move / undo. The static evaluator
// scores from White's perspective; negamax flips it for the side to move.
// Moves are searched in legal_moves order, so the result is a pure function
// of the position: among equally scored root moves the first one wins.
//
// Search depth grows with the age of the game: depth = moveCount / 40 + 1.
// =============================================================================

use log::debug;

use crate::board::Board;
use crate::error::{Result, TablutError};
use crate::moves::Move;
use crate::piece::Side;

// =============================================================================
// Configuration
// =============================================================================

/// Controls the depth schedule of the search.
#[derive(Clone, Debug)]
pub struct AiConfig {
    /// Number of moves played per extra ply of depth.
    pub depth_interval: u32,
    /// Depth used at the start of the game.
    pub min_depth: u32,
    /// Optional ceiling on the scheduled depth.
    pub max_depth: Option<u32>,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl AiConfig {
    pub fn new() -> Self {
        AiConfig {
            depth_interval: 40,
            min_depth: 1,
            max_depth: None,
        }
    }

    /// Search depth for `board`: one extra ply every `depth_interval` moves.
    pub fn depth_for(&self, board: &Board) -> u32 {
        let interval = self.depth_interval.max(1) as usize;
        let depth = (board.move_count() / interval) as u32 + self.min_depth.max(1);
        match self.max_depth {
            Some(cap) => depth.min(cap.max(1)),
            None => depth,
        }
    }
}

// =============================================================================
// Constants
// =============================================================================

/// Score magnitude of a decided game (positive: White won).
pub const WIN_SCORE: i32 = i32::MAX - 20;

/// Score magnitude reserved for a win forced in a later move. Kept below
/// WIN_SCORE so an immediate win is preferred to a delayed one.
pub const WILL_WIN_SCORE: i32 = i32::MAX - 40;

/// Larger than any score the evaluator produces.
const INFINITY: i32 = i32::MAX;

/// Weight of one piece on the board.
const PIECE_WEIGHT: i32 = 8;

/// Weight of one step between the king and the nearest edge.
const KING_DISTANCE_WEIGHT: i32 = 10;

/// The result of a move search.
#[derive(Clone, Debug)]
pub struct PickResult {
    pub mv: Move,
    /// Backed-up score from White's perspective.
    pub score: i32,
    pub depth: u32,
    /// Number of static evaluations performed.
    pub evals: u64,
}

impl PickResult {
    /// True when the search saw a decided game at the end of its best line.
    pub fn is_forced_win(&self) -> bool {
        self.score.abs() >= WILL_WIN_SCORE
    }
}

// =============================================================================
// Evaluation
// =============================================================================

/// Components of `static_score`, used by collaborators to show why a
/// position is rated the way it is.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EvalBreakdown {
    pub outcome: i32,
    pub material: i32,
    pub king_distance: i32,
    pub total: i32,
}

pub fn evaluate_breakdown(board: &Board) -> EvalBreakdown {
    if let Some(winner) = board.winner() {
        let outcome = winner.sign() * WIN_SCORE;
        return EvalBreakdown {
            outcome,
            total: outcome,
            ..EvalBreakdown::default()
        };
    }
    let material = PIECE_WEIGHT
        * (board.pieces(Side::White) as i32 - board.pieces(Side::Black) as i32);
    let king_distance = board
        .king_position()
        .map(|k| KING_DISTANCE_WEIGHT * k.edge_distance() as i32)
        .unwrap_or(0);
    EvalBreakdown {
        outcome: 0,
        material,
        king_distance,
        total: material + king_distance,
    }
}

/// Heuristic value of `board` from White's perspective: ±WIN_SCORE once the
/// game is decided, otherwise material plus the king's distance to the edge.
pub fn static_score(board: &Board) -> i32 {
    evaluate_breakdown(board).total
}

// =============================================================================
// Search
// =============================================================================

/// Negamax search with alpha-beta pruning.
///
/// Scores are from the side to move's perspective. When `best_move` is
/// given, the first move reaching the best score is stored in it: later
/// moves must score strictly higher to replace it, since under fail-soft
/// pruning an equal score may only be an upper bound. The board is returned
/// to its entry state before this function returns.
fn negamax(
    board: &mut Board,
    depth: u32,
    mut alpha: i32,
    beta: i32,
    mut best_move: Option<&mut Option<Move>>,
    evals: &mut u64,
) -> Result<i32> {
    if depth == 0 || board.is_game_over() {
        *evals += 1;
        return Ok(board.turn().sign() * static_score(board));
    }

    let legal_moves = board.legal_moves(board.turn());
    if legal_moves.is_empty() {
        *evals += 1;
        return Ok(board.turn().sign() * static_score(board));
    }

    let mut best = -INFINITY;
    for mv in legal_moves {
        board.make_move(mv)?;
        let score = negamax(board, depth - 1, -beta, -alpha, None, evals);
        board.undo()?;
        let score = -score?;
        if score > best {
            best = score;
            if let Some(slot) = best_move.as_deref_mut() {
                *slot = Some(mv);
            }
        }
        alpha = alpha.max(best);
        if alpha >= beta {
            break;
        }
    }

    Ok(best)
}

/// Pick the best move for the side to move on `board`.
///
/// The search runs on a clone that keeps the game's earlier positions, so
/// repetitions are seen and `board` is left untouched. Fails with `GameOver`
/// once the game is decided and with `NoLegalMove` when the side to move
/// cannot move.
pub fn find_move(board: &Board, config: &AiConfig) -> Result<PickResult> {
    let mut work = board.clone();
    search_in_place(&mut work, config)
}

/// `find_move` on a board the caller owns. The board is restored to its
/// entry state before returning.
pub fn search_in_place(board: &mut Board, config: &AiConfig) -> Result<PickResult> {
    if let Some(winner) = board.winner() {
        return Err(TablutError::GameOver(winner));
    }
    let side = board.turn();
    if !board.has_move(side) {
        return Err(TablutError::NoLegalMove(side));
    }

    let depth = config.depth_for(board);
    let mut evals = 0;
    let mut best_move = None;
    let score = negamax(board, depth, -INFINITY, INFINITY, Some(&mut best_move), &mut evals)?;
    let mv = best_move.ok_or(TablutError::NoLegalMove(side))?;
    let score = side.sign() * score;

    debug!("{side} searched depth {depth}: {mv} scores {score} after {evals} evals");
    Ok(PickResult {
        mv,
        score,
        depth,
        evals,
    })
}
