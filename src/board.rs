use std::collections::hash_map::Entry;
use std::collections::{BTreeSet, HashMap};
use std::fmt;

use log::trace;

use crate::error::{Result, TablutError};
use crate::moves::Move;
use crate::piece::{Piece, Side};
use crate::square::{Direction, Square, SIZE, SQUARE_COUNT};

/// Contents of every square, in square-index order.
pub type Grid = [Piece; SQUARE_COUNT];

/// Initial positions of the attackers: a T on each edge.
const INITIAL_ATTACKERS: [Square; 16] = [
    Square::at(0, 3), Square::at(0, 4), Square::at(0, 5), Square::at(1, 4),
    Square::at(8, 3), Square::at(8, 4), Square::at(8, 5), Square::at(7, 4),
    Square::at(3, 0), Square::at(4, 0), Square::at(5, 0), Square::at(4, 1),
    Square::at(3, 8), Square::at(4, 8), Square::at(5, 8), Square::at(4, 7),
];

/// Initial positions of the defenders of the king.
const INITIAL_DEFENDERS: [Square; 8] = [
    Square::NTHRONE, Square::ETHRONE, Square::STHRONE, Square::WTHRONE,
    Square::at(4, 6), Square::at(4, 2), Square::at(2, 4), Square::at(6, 4),
];

/// What `undo` needs to step back over one move.
#[derive(Clone, Debug)]
struct UndoRecord {
    grid: Grid,
    last_move: Option<Move>,
}

/// The state of a Tablut game.
#[derive(Clone, Debug)]
pub struct Board {
    grid: Grid,
    turn: Side,
    move_count: usize,
    winner: Option<Side>,
    repeated: bool,
    history: Vec<UndoRecord>,
    /// Every grid seen before a recorded move, with multiplicity.
    positions: HashMap<Grid, u32>,
    last_move: Option<Move>,
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    /// Create an empty board with no pieces and Black to move. Useful for
    /// setting up test positions.
    pub fn empty() -> Self {
        Board {
            grid: [Piece::Empty; SQUARE_COUNT],
            turn: Side::Black,
            move_count: 0,
            winner: None,
            repeated: false,
            history: Vec::new(),
            positions: HashMap::new(),
            last_move: None,
        }
    }

    /// A board in the initial position.
    pub fn new() -> Self {
        let mut board = Self::empty();
        for sq in INITIAL_ATTACKERS {
            board.put(Piece::Black, sq);
        }
        for sq in INITIAL_DEFENDERS {
            board.put(Piece::White, sq);
        }
        board.put(Piece::King, Square::THRONE);
        board
    }

    /// An independent board with the same position, turn, counts and
    /// outcome. Undo history is not carried over.
    pub fn copy(&self) -> Board {
        Board {
            grid: self.grid,
            turn: self.turn,
            move_count: self.move_count,
            winner: self.winner,
            repeated: self.repeated,
            history: Vec::new(),
            positions: HashMap::new(),
            last_move: self.last_move,
        }
    }

    pub fn turn(&self) -> Side {
        self.turn
    }

    pub fn winner(&self) -> Option<Side> {
        self.winner
    }

    pub fn is_game_over(&self) -> bool {
        self.winner.is_some()
    }

    /// Number of moves since the initial position that have not been undone.
    pub fn move_count(&self) -> usize {
        self.move_count
    }

    /// True iff the game was decided by a repeated position.
    pub fn repeated_position(&self) -> bool {
        self.repeated
    }

    pub fn last_move(&self) -> Option<Move> {
        self.last_move
    }

    pub fn king_position(&self) -> Option<Square> {
        Square::all().find(|&sq| self.get(sq) == Piece::King)
    }

    pub fn get(&self, sq: Square) -> Piece {
        self.grid[sq.index()]
    }

    /// Contents of (`col`, `row`), failing when either is off the board.
    pub fn get_at(&self, col: i32, row: i32) -> Result<Piece> {
        Ok(self.get(Square::new(col, row)?))
    }

    /// Set `sq` to `piece` without recording anything for undo. Meant for
    /// building positions before play starts.
    pub fn put(&mut self, piece: Piece, sq: Square) {
        self.grid[sq.index()] = piece;
    }

    pub fn set_turn(&mut self, side: Side) {
        self.turn = side;
    }

    /// Locations of all pieces of `side`. White includes the king.
    pub fn piece_locations(&self, side: Side) -> BTreeSet<Square> {
        Square::all().filter(|&sq| self.get(sq).side() == Some(side)).collect()
    }

    /// Number of pieces of `side` on the board, king included for White.
    pub fn pieces(&self, side: Side) -> usize {
        self.grid.iter().filter(|p| p.side() == Some(side)).count()
    }

    /// True iff the squares from `from` (exclusive) to `to` (inclusive) are
    /// empty and `from`-`to` is a rook move.
    fn is_unblocked_move(&self, from: Square, to: Square) -> bool {
        let Some(dir) = from.direction(to) else {
            return false;
        };
        for sq in from.rook_ray(dir) {
            if !self.get(sq).is_empty() {
                return false;
            }
            if sq == to {
                return true;
            }
        }
        false
    }

    /// True iff `from` holds a piece of the side to move.
    pub fn is_legal_from(&self, from: Square) -> bool {
        self.get(from).side() == Some(self.turn)
    }

    /// True iff `from`-`to` is a legal move for the side to move.
    pub fn is_legal_from_to(&self, from: Square, to: Square) -> bool {
        self.is_legal_from(from)
            && self.is_unblocked_move(from, to)
            && (!to.is_throne() || self.get(from) == Piece::King)
    }

    pub fn is_legal(&self, mv: Move) -> bool {
        self.is_legal_from_to(mv.from, mv.to)
    }

    /// All legal moves for `side`, regardless of whose turn it is. Ordered by
    /// source square index, then N, E, S, W, then distance.
    pub fn legal_moves(&self, side: Side) -> Vec<Move> {
        let mut moves = Vec::new();
        for from in Square::all() {
            let piece = self.get(from);
            if piece.side() != Some(side) {
                continue;
            }
            for ray in from.rook_rays() {
                for to in ray {
                    if !self.get(to).is_empty() {
                        break;
                    }
                    if to.is_throne() && piece != Piece::King {
                        continue;
                    }
                    moves.extend(Move::mv(from, to));
                }
            }
        }
        moves
    }

    /// True iff `side` has at least one legal move.
    pub fn has_move(&self, side: Side) -> bool {
        Square::all().any(|from| {
            let piece = self.get(from);
            piece.side() == Some(side)
                && Direction::ALL.iter().any(|&dir| {
                    from.rook_ray(dir)
                        .take_while(|&to| self.get(to).is_empty())
                        .any(|to| !to.is_throne() || piece == Piece::King)
                })
        })
    }

    /// Apply `mv` for the side to move, resolving captures and any win it
    /// produces. On error the board is unchanged.
    pub fn make_move(&mut self, mv: Move) -> Result<()> {
        if self.winner.is_some() || !self.is_legal(mv) {
            return Err(TablutError::IllegalMove(mv));
        }
        let mover = self.turn;

        *self.positions.entry(self.grid).or_insert(0) += 1;
        self.history.push(UndoRecord {
            grid: self.grid,
            last_move: self.last_move,
        });

        let piece = self.get(mv.from);
        self.put(piece, mv.to);
        self.put(Piece::Empty, mv.from);
        self.last_move = Some(mv);
        self.move_count += 1;

        if piece == Piece::King && mv.to.is_edge() {
            trace!("king escaped to {}", mv.to);
            self.winner = Some(Side::White);
        } else {
            for dir in Direction::ALL {
                if let Some(anchor) = mv.to.step(dir, 2) {
                    self.capture(mv.to, anchor, mover);
                }
            }
        }

        if self.winner.is_none() && self.positions.contains_key(&self.grid) {
            trace!("position repeated after {mv}");
            self.repeated = true;
            self.winner = Some(mover.opponent());
        }

        self.turn = mover.opponent();
        if self.winner.is_none() && !self.has_move(self.turn) {
            trace!("{} has no legal move", self.turn);
            self.winner = Some(mover);
        }
        Ok(())
    }

    /// True iff `sq` helps `side` flank an enemy: it holds a piece of `side`
    /// or is the empty throne.
    fn is_hostile(&self, sq: Square, side: Side) -> bool {
        let piece = self.get(sq);
        piece.side() == Some(side) || (sq.is_throne() && piece.is_empty())
    }

    /// Capture the piece between `sq0` and `sq2`, where a piece of `mover`
    /// just arrived on `sq0`, if the flanking conditions hold.
    fn capture(&mut self, sq0: Square, sq2: Square, mover: Side) {
        let Some(victim_sq) = sq0.between(sq2) else {
            return;
        };
        let victim = self.get(victim_sq);
        match victim.side() {
            Some(side) if side != mover => {}
            _ => return,
        }

        if victim != Piece::King {
            if self.is_hostile(sq2, mover) {
                trace!("{victim} on {victim_sq} captured");
                self.put(Piece::Empty, victim_sq);
            }
            return;
        }

        let captured = if victim_sq.is_throne() {
            Square::THRONE_NEIGHBORS
                .iter()
                .all(|&sq| self.get(sq) == Piece::Black)
        } else if victim_sq.is_throne_neighbor() {
            Direction::ALL
                .iter()
                .filter_map(|&dir| victim_sq.neighbor(dir))
                .filter(|sq| !sq.is_throne())
                .all(|sq| self.get(sq) == Piece::Black)
        } else {
            self.is_hostile(sq2, Side::Black)
        };
        if captured {
            trace!("king captured on {victim_sq}");
            self.put(Piece::Empty, victim_sq);
            self.winner = Some(Side::Black);
        }
    }

    /// Take back the last recorded move.
    pub fn undo(&mut self) -> Result<()> {
        let record = self.history.pop().ok_or(TablutError::CannotUndo)?;
        if let Entry::Occupied(mut seen) = self.positions.entry(record.grid) {
            *seen.get_mut() -= 1;
            if *seen.get() == 0 {
                seen.remove();
            }
        }
        self.grid = record.grid;
        self.last_move = record.last_move;
        self.move_count -= 1;
        self.turn = self.turn.opponent();
        self.winner = None;
        self.repeated = false;
        Ok(())
    }

    /// Forget the undo history and seen positions. The current position,
    /// turn, counts and outcome are kept.
    pub fn clear_undo(&mut self) {
        self.history.clear();
        self.positions.clear();
    }

    /// The turn sign followed by one character per square in index order.
    pub fn encoded_board(&self) -> String {
        std::iter::once(self.turn.to_char())
            .chain(self.grid.iter().map(|p| p.to_char()))
            .collect()
    }
}

impl fmt::Display for Board {
    /// Row 9 at the top, with row numbers on the left and column letters below.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in (0..SIZE).rev() {
            write!(f, "{:2}", row + 1)?;
            for col in 0..SIZE {
                write!(f, " {}", self.grid[row * SIZE + col])?;
            }
            writeln!(f)?;
        }
        write!(f, "  ")?;
        for col in 0..SIZE {
            write!(f, " {}", (b'a' + col as u8) as char)?;
        }
        writeln!(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::seq::SliceRandom;
    use rand::SeedableRng;

    fn sq(s: &str) -> Square {
        s.parse().unwrap()
    }

    fn mv(s: &str) -> Move {
        Move::from_notation(s).unwrap()
    }

    /// Empty board with `side` to move and the given pieces placed.
    fn setup(side: Side, pieces: &[(Piece, &str)]) -> Board {
        let mut board = Board::empty();
        for &(piece, at) in pieces {
            board.put(piece, sq(at));
        }
        board.set_turn(side);
        board
    }

    #[test]
    fn initial_position() {
        let board = Board::new();
        assert_eq!(board.turn(), Side::Black);
        assert_eq!(board.move_count(), 0);
        assert_eq!(board.winner(), None);
        assert!(!board.repeated_position());
        assert_eq!(board.king_position(), Some(sq("e5")));
        assert_eq!(board.legal_moves(Side::Black).len(), 80);
        assert_eq!(board.pieces(Side::Black), 16);
        assert_eq!(board.pieces(Side::White), 9);
        assert!(board.encoded_board().starts_with('B'));
        assert_eq!(board.last_move(), None);
    }

    #[test]
    fn encoded_board_layout() {
        let board = Board::new();
        let encoded = board.encoded_board();
        assert_eq!(encoded.len(), 82);
        assert!(encoded[1..].chars().all(|c| "-WBK".contains(c)));
        assert_eq!(encoded.matches('K').count(), 1);
        // Row 1: d1, e1, f1 attackers.
        assert_eq!(&encoded[1..10], "---BBB---");
        assert_eq!(encoded.as_bytes()[1 + Square::THRONE.index()], b'K');
    }

    #[test]
    fn display_shows_rows_top_down() {
        let text = Board::new().to_string();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 10);
        assert_eq!(lines[0], " 9 - - - B B B - - -");
        assert_eq!(lines[4], " 5 B B W W K W W B B");
        assert_eq!(lines[9], "   a b c d e f g h i");
    }

    #[test]
    fn get_at_rejects_off_board_coordinates() {
        let board = Board::new();
        assert_eq!(board.get_at(4, 4), Ok(Piece::King));
        assert_eq!(board.get_at(9, 4), Err(TablutError::OutOfRange { col: 9, row: 4 }));
    }

    #[test]
    fn legality_rules() {
        let board = Board::new();
        // Wrong side to move.
        assert!(!board.is_legal(mv("e6-h6")));
        assert!(!board.is_legal_from(sq("e6")));
        assert!(board.is_legal_from(sq("a4")));
        // Blocked path and occupied destination.
        assert!(!board.is_legal(mv("a4-e4")));
        assert!(!board.is_legal(mv("a4-a5")));
        assert!(board.is_legal(mv("a4-d4")));
        // Empty square as source.
        assert!(!board.is_legal(mv("b2-b3")));
    }

    #[test]
    fn only_the_king_may_enter_the_throne() {
        let mut board = setup(
            Side::White,
            &[(Piece::White, "e3"), (Piece::King, "c5"), (Piece::Black, "a9")],
        );
        assert!(!board.is_legal(mv("e3-e5")));
        assert!(board.is_legal(mv("e3-e7")), "soldiers may pass over the empty throne");
        assert!(board.is_legal(mv("c5-e5")));
        assert!(!board.legal_moves(Side::White).contains(&mv("e3-e5")));
        assert!(board.legal_moves(Side::White).contains(&mv("e3-e9")));
        assert_eq!(board.make_move(mv("e3-e5")), Err(TablutError::IllegalMove(mv("e3-e5"))));
        board.make_move(mv("c5-e5")).unwrap();
        assert_eq!(board.king_position(), Some(Square::THRONE));
    }

    #[test]
    fn legal_move_order_is_index_then_direction_then_distance() {
        let board = setup(Side::White, &[(Piece::White, "b2"), (Piece::White, "a1")]);
        let moves: Vec<String> = board.legal_moves(Side::White).iter().map(|m| m.to_string()).collect();
        assert_eq!(&moves[..2], &["a1-a2", "a1-a3"]);
        let from_b2: Vec<&String> = moves.iter().filter(|m| m.starts_with("b2")).collect();
        assert_eq!(from_b2[0], "b2-b3");
        assert_eq!(from_b2[7], "b2-c2");
        assert_eq!(from_b2[14], "b2-b1");
        assert_eq!(from_b2[15], "b2-a2");
        assert_eq!(from_b2.len(), 16);
    }

    #[test]
    fn has_move_agrees_with_legal_moves() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut board = Board::new();
        while !board.is_game_over() && board.move_count() < 300 {
            for side in [Side::White, Side::Black] {
                assert_eq!(board.has_move(side), !board.legal_moves(side).is_empty());
            }
            let moves = board.legal_moves(board.turn());
            board.make_move(*moves.choose(&mut rng).unwrap()).unwrap();
        }
    }

    #[test]
    fn ordinary_capture() {
        let mut board = setup(
            Side::Black,
            &[
                (Piece::Black, "c1"),
                (Piece::White, "d4"),
                (Piece::Black, "e4"),
                (Piece::King, "e5"),
            ],
        );
        board.make_move(mv("c1-c4")).unwrap();
        assert_eq!(board.get(sq("d4")), Piece::Empty);
        assert_eq!(board.get(sq("c4")), Piece::Black);
        assert_eq!(board.winner(), None);
        assert_eq!(board.turn(), Side::White);
    }

    #[test]
    fn no_capture_without_the_mover() {
        // d4 is already flanked by c4 and e4, but the move happens elsewhere.
        let mut board = setup(
            Side::Black,
            &[
                (Piece::Black, "c4"),
                (Piece::White, "d4"),
                (Piece::Black, "e4"),
                (Piece::Black, "a9"),
                (Piece::King, "e5"),
            ],
        );
        board.make_move(mv("a9-a8")).unwrap();
        assert_eq!(board.get(sq("d4")), Piece::White);
    }

    #[test]
    fn moving_between_two_enemies_is_safe() {
        let mut board = setup(
            Side::White,
            &[
                (Piece::Black, "c3"),
                (Piece::White, "d1"),
                (Piece::Black, "e3"),
                (Piece::King, "g7"),
            ],
        );
        board.make_move(mv("d1-d3")).unwrap();
        assert_eq!(board.get(sq("d3")), Piece::White);
    }

    #[test]
    fn empty_throne_is_hostile() {
        let mut board = setup(
            Side::Black,
            &[(Piece::White, "e6"), (Piece::Black, "e9"), (Piece::King, "b2")],
        );
        board.make_move(mv("e9-e7")).unwrap();
        assert_eq!(board.get(sq("e6")), Piece::Empty);

        let mut board = setup(
            Side::White,
            &[(Piece::Black, "d5"), (Piece::White, "c9"), (Piece::King, "b2")],
        );
        board.make_move(mv("c9-c5")).unwrap();
        assert_eq!(board.get(sq("d5")), Piece::Empty);
    }

    #[test]
    fn king_helps_capture() {
        let mut board = setup(
            Side::White,
            &[(Piece::Black, "c3"), (Piece::White, "c2"), (Piece::King, "g4")],
        );
        board.make_move(mv("g4-c4")).unwrap();
        assert_eq!(board.get(sq("c3")), Piece::Empty);
    }

    #[test]
    fn captures_in_several_directions_at_once() {
        let mut board = setup(
            Side::Black,
            &[
                (Piece::Black, "c9"),
                (Piece::White, "b7"),
                (Piece::Black, "a7"),
                (Piece::White, "d7"),
                (Piece::Black, "e7"),
                (Piece::King, "h2"),
            ],
        );
        board.make_move(mv("c9-c7")).unwrap();
        assert_eq!(board.get(sq("b7")), Piece::Empty);
        assert_eq!(board.get(sq("d7")), Piece::Empty);
    }

    #[test]
    fn king_escape_wins() {
        let mut board = setup(Side::White, &[(Piece::King, "e2"), (Piece::Black, "i9")]);
        board.make_move(mv("e2-a2")).unwrap();
        assert_eq!(board.winner(), Some(Side::White));
        assert_eq!(board.move_count(), 1);
        assert_eq!(board.king_position(), Some(sq("a2")));
        assert_eq!(board.make_move(mv("i9-i8")), Err(TablutError::IllegalMove(mv("i9-i8"))));
    }

    #[test]
    fn king_captured_on_throne_needs_four() {
        let mut board = setup(
            Side::Black,
            &[
                (Piece::King, "e5"),
                (Piece::Black, "e6"),
                (Piece::Black, "f5"),
                (Piece::Black, "d5"),
                (Piece::Black, "e1"),
                (Piece::White, "a9"),
            ],
        );
        board.make_move(mv("e1-e4")).unwrap();
        assert_eq!(board.get(Square::THRONE), Piece::Empty);
        assert_eq!(board.king_position(), None);
        assert_eq!(board.winner(), Some(Side::Black));
    }

    #[test]
    fn king_on_throne_survives_three() {
        let mut board = setup(
            Side::Black,
            &[
                (Piece::King, "e5"),
                (Piece::Black, "e6"),
                (Piece::Black, "d5"),
                (Piece::Black, "e1"),
                (Piece::White, "a9"),
            ],
        );
        board.make_move(mv("e1-e4")).unwrap();
        assert_eq!(board.king_position(), Some(Square::THRONE));
        assert_eq!(board.winner(), None);
    }

    #[test]
    fn king_beside_throne_needs_three() {
        let pieces = [
            (Piece::King, "e6"),
            (Piece::Black, "d6"),
            (Piece::Black, "f6"),
            (Piece::Black, "e9"),
            (Piece::White, "a1"),
        ];
        let mut board = setup(Side::Black, &pieces);
        board.make_move(mv("e9-e7")).unwrap();
        assert_eq!(board.king_position(), None);
        assert_eq!(board.winner(), Some(Side::Black));

        // Two opposite flankers are not enough next to the throne.
        let mut board = setup(
            Side::Black,
            &[(Piece::King, "e6"), (Piece::Black, "d6"), (Piece::Black, "f9"), (Piece::White, "a1")],
        );
        board.make_move(mv("f9-f6")).unwrap();
        assert_eq!(board.king_position(), Some(sq("e6")));
        assert_eq!(board.winner(), None);
    }

    #[test]
    fn king_elsewhere_is_captured_like_a_soldier() {
        let mut board = setup(
            Side::Black,
            &[(Piece::King, "c7"), (Piece::Black, "b7"), (Piece::Black, "d9"), (Piece::White, "h2")],
        );
        board.make_move(mv("d9-d7")).unwrap();
        assert_eq!(board.king_position(), None);
        assert_eq!(board.winner(), Some(Side::Black));
    }

    #[test]
    fn side_without_moves_loses() {
        let mut board = setup(
            Side::Black,
            &[
                (Piece::White, "a1"),
                (Piece::Black, "a2"),
                (Piece::Black, "b1"),
                (Piece::Black, "i9"),
            ],
        );
        assert!(board.has_move(Side::Black));
        assert!(!board.has_move(Side::White));
        board.make_move(mv("i9-i8")).unwrap();
        assert_eq!(board.turn(), Side::White);
        assert!(board.legal_moves(Side::White).is_empty());
        assert_eq!(board.winner(), Some(Side::Black));
    }

    #[test]
    fn repetition_ends_the_game() {
        let mut board = Board::new();
        for m in ["a4-a3", "c5-c6", "a3-a4"] {
            board.make_move(mv(m)).unwrap();
            assert_eq!(board.winner(), None, "after {m}");
        }
        board.make_move(mv("c6-c5")).unwrap();
        assert_eq!(board.encoded_board()[1..], Board::new().encoded_board()[1..]);
        assert!(board.repeated_position());
        assert_eq!(board.winner(), Some(Side::Black), "the side that did not just move wins");
        assert_eq!(board.make_move(mv("a4-a3")), Err(TablutError::IllegalMove(mv("a4-a3"))));

        board.undo().unwrap();
        assert!(!board.repeated_position());
        assert_eq!(board.winner(), None);
        assert_eq!(board.last_move(), Some(mv("a3-a4")));
    }

    #[test]
    fn undo_restores_everything() {
        let mut board = Board::new();
        assert_eq!(board.undo(), Err(TablutError::CannotUndo));
        let before = board.encoded_board();
        board.make_move(mv("a4-a3")).unwrap();
        assert_eq!(board.last_move(), Some(mv("a4-a3")));
        assert_eq!(board.turn(), Side::White);
        board.undo().unwrap();
        assert_eq!(board.encoded_board(), before);
        assert_eq!(board.move_count(), 0);
        assert_eq!(board.last_move(), None);
        assert_eq!(board.undo(), Err(TablutError::CannotUndo));
    }

    #[test]
    fn undo_brings_back_captured_king() {
        let mut board = setup(
            Side::Black,
            &[(Piece::King, "c7"), (Piece::Black, "b7"), (Piece::Black, "d9"), (Piece::White, "h2")],
        );
        let before = board.encoded_board();
        board.make_move(mv("d9-d7")).unwrap();
        board.undo().unwrap();
        assert_eq!(board.encoded_board(), before);
        assert_eq!(board.winner(), None);
    }

    #[test]
    fn make_then_undo_is_identity_over_random_games() {
        let mut rng = StdRng::seed_from_u64(2024);
        for _ in 0..4 {
            let mut board = Board::new();
            while !board.is_game_over() && board.move_count() < 120 {
                let encoded = board.encoded_board();
                let moves = board.legal_moves(board.turn());
                for &m in &moves {
                    board.make_move(m).unwrap();
                    assert_eq!(board.turn(), Side::from_name(&encoded[..1]).unwrap().opponent());
                    board.undo().unwrap();
                    assert_eq!(board.encoded_board(), encoded, "undo of {m}");
                    assert_eq!(board.winner(), None);
                    assert!(!board.repeated_position());
                }
                board.make_move(*moves.choose(&mut rng).unwrap()).unwrap();
                assert!(board.encoded_board().matches('K').count() <= 1);
                if board.king_position().is_some_and(|k| k.is_edge()) {
                    assert_eq!(board.winner(), Some(Side::White));
                }
                if board.repeated_position() {
                    assert_eq!(board.winner(), Some(board.turn()));
                }
            }
        }
    }

    #[test]
    fn clear_undo_keeps_position() {
        let mut board = Board::new();
        board.make_move(mv("a4-a3")).unwrap();
        board.make_move(mv("c5-c6")).unwrap();
        let encoded = board.encoded_board();
        board.clear_undo();
        assert_eq!(board.encoded_board(), encoded);
        assert_eq!(board.move_count(), 2);
        assert_eq!(board.undo(), Err(TablutError::CannotUndo));

        board.make_move(mv("a3-a2")).unwrap();
        board.undo().unwrap();
        assert_eq!(board.encoded_board(), encoded);
        assert_eq!(board.undo(), Err(TablutError::CannotUndo));
    }

    #[test]
    fn legal_moves_come_from_the_move_table() {
        let board = Board::new();
        for side in [Side::White, Side::Black] {
            for m in board.legal_moves(side) {
                assert_eq!(Move::mv(m.from, m.to), Some(m));
            }
        }
        assert_eq!(board.legal_moves(Side::Black).len(), 80);
    }

    #[test]
    fn copy_is_independent_and_has_no_history() {
        let mut board = Board::new();
        board.make_move(mv("a4-a3")).unwrap();
        let mut copy = board.copy();
        assert_eq!(copy.encoded_board(), board.encoded_board());
        assert_eq!(copy.move_count(), 1);
        assert_eq!(copy.last_move(), Some(mv("a4-a3")));
        assert_eq!(copy.undo(), Err(TablutError::CannotUndo));
        copy.make_move(mv("c5-c6")).unwrap();
        assert_eq!(board.get(sq("c5")), Piece::White);
        assert_eq!(board.turn(), Side::White);
    }

    #[test]
    fn piece_locations_include_king_for_white() {
        let board = Board::new();
        let white = board.piece_locations(Side::White);
        assert_eq!(white.len(), 9);
        assert!(white.contains(&Square::THRONE));
        assert_eq!(board.piece_locations(Side::Black).len(), 16);
    }
}
