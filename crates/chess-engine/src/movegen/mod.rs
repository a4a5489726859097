//! Move generation.
//!
//! Generation is pseudo-legal: every move obeys piece movement rules, but
//! some may leave the mover's own king attacked. [`ChessBoardIndex`] filters
//! those out by playing each candidate and taking it back.
//!
//! [`ChessBoardIndex`]: crate::ChessBoardIndex

pub mod perft;

use crate::mailbox::{pawn_forward, Board, EAST, WEST};
use crate::PieceList;
use chess_core::{Color, File, Move, MoveKind, PieceKind, Square};

/// A list of moves with a fixed maximum capacity.
///
/// Pseudo-legal counts stay well below the capacity in reachable positions,
/// so generation never allocates.
#[derive(Clone)]
pub struct MoveList {
    moves: [Move; Self::MAX_MOVES],
    len: usize,
}

impl MoveList {
    /// Capacity of the list.
    pub const MAX_MOVES: usize = 300;

    #[inline]
    pub const fn new() -> Self {
        MoveList {
            moves: [Move::NULL; Self::MAX_MOVES],
            len: 0,
        }
    }

    /// Adds a move to the list.
    ///
    /// # Panics
    ///
    /// Panics when the list is already full.
    #[inline]
    pub fn push(&mut self, m: Move) {
        assert!(self.len < Self::MAX_MOVES, "move list overflow");
        self.moves[self.len] = m;
        self.len += 1;
    }

    #[inline]
    pub const fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn as_slice(&self) -> &[Move] {
        &self.moves[..self.len]
    }

    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, Move> {
        self.as_slice().iter()
    }

    #[inline]
    pub fn clear(&mut self) {
        self.len = 0;
    }

    pub fn contains(&self, m: Move) -> bool {
        self.as_slice().contains(&m)
    }

    /// Removes the move at `index`, moving the last move into its place.
    pub fn swap_remove(&mut self, index: usize) -> Move {
        assert!(index < self.len, "index {index} out of bounds for {}", self.len);
        let removed = self.moves[index];
        self.len -= 1;
        self.moves[index] = self.moves[self.len];
        removed
    }
}

impl Default for MoveList {
    fn default() -> Self {
        Self::new()
    }
}

impl std::ops::Index<usize> for MoveList {
    type Output = Move;

    #[inline]
    fn index(&self, index: usize) -> &Self::Output {
        &self.as_slice()[index]
    }
}

impl<'a> IntoIterator for &'a MoveList {
    type Item = &'a Move;
    type IntoIter = std::slice::Iter<'a, Move>;

    fn into_iter(self) -> Self::IntoIter {
        self.as_slice().iter()
    }
}

impl std::fmt::Debug for MoveList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.as_slice()).finish()
    }
}

const KNIGHT_DIRECTIONS: [i8; 8] = [-21, -19, -12, -8, 8, 12, 19, 21];
const BISHOP_DIRECTIONS: [i8; 4] = [-11, -9, 9, 11];
const ROOK_DIRECTIONS: [i8; 4] = [-10, -1, 1, 10];
const ROYAL_DIRECTIONS: [i8; 8] = [-11, -10, -9, -1, 1, 9, 10, 11];

/// Padded-table step directions for a piece kind. Pawns have none; their
/// moves depend on color and are generated separately.
pub const fn directions(kind: PieceKind) -> &'static [i8] {
    match kind {
        PieceKind::Pawn => &[],
        PieceKind::Knight => &KNIGHT_DIRECTIONS,
        PieceKind::Bishop => &BISHOP_DIRECTIONS,
        PieceKind::Rook => &ROOK_DIRECTIONS,
        PieceKind::Queen | PieceKind::King => &ROYAL_DIRECTIONS,
    }
}

const PROMOTION_PIECES: [PieceKind; 4] = [
    PieceKind::Knight,
    PieceKind::Bishop,
    PieceKind::Rook,
    PieceKind::Queen,
];

/// Generates every pseudo-legal move for `side`, piece by piece in piece
/// list order.
pub fn generate_pseudo_legal_moves(board: &Board, pieces: &PieceList, side: Color) -> MoveList {
    let mut moves = MoveList::new();

    for &from in pieces.squares(side) {
        let piece = board.get(from);
        match piece.kind() {
            Some(PieceKind::Pawn) => generate_pawn_moves(board, from, side, &mut moves),
            Some(kind) => {
                generate_piece_moves(board, from, kind, side, &mut moves);
                if kind == PieceKind::King && !piece.has_moved() {
                    generate_castling_moves(board, from, side, &mut moves);
                }
            }
            None => debug_assert!(false, "piece list points at empty square {from}"),
        }
    }

    moves
}

/// Steps (knight, king) and rays (bishop, rook, queen).
fn generate_piece_moves(
    board: &Board,
    from: Square,
    kind: PieceKind,
    side: Color,
    moves: &mut MoveList,
) {
    for &direction in directions(kind) {
        let mut to = from;
        while let Some(next) = Board::offset_square(to, direction) {
            to = next;
            let target = board.get(to);
            if target.is_empty() {
                moves.push(Move::quiet(from, to));
                if kind.is_slider() {
                    continue;
                }
            } else if target.color() != side {
                moves.push(Move::new(from, to, MoveKind::Capture));
            }
            break;
        }
    }
}

fn generate_pawn_moves(board: &Board, from: Square, side: Color, moves: &mut MoveList) {
    let forward = pawn_forward(side);
    let promoting = from.rank() == side.pre_promotion_rank();

    if let Some(one) = Board::offset_square(from, forward) {
        if board.get(one).is_empty() {
            if promoting {
                push_promotions(from, one, false, moves);
            } else {
                moves.push(Move::quiet(from, one));
                if from.rank() == side.pawn_rank() {
                    if let Some(two) = Board::offset_square(one, forward) {
                        if board.get(two).is_empty() {
                            moves.push(Move::new(from, two, MoveKind::DoublePawnPush));
                        }
                    }
                }
            }
        }
    }

    for side_step in [EAST, WEST] {
        generate_pawn_capture(board, from, side, side_step, promoting, moves);
    }
}

fn generate_pawn_capture(
    board: &Board,
    from: Square,
    side: Color,
    side_step: i8,
    promoting: bool,
    moves: &mut MoveList,
) {
    let forward = pawn_forward(side);

    if let Some(beside) = Board::offset_square(from, side_step) {
        let neighbour = board.get(beside);
        if neighbour.is(PieceKind::Pawn, side.opposite()) && neighbour.is_en_passant_target() {
            if let Some(to) = Board::offset_square(beside, forward) {
                moves.push(Move::new(from, to, MoveKind::EnPassantCapture));
            }
            return;
        }
    }

    let Some(to) = Board::offset_square(from, forward + side_step) else {
        return;
    };
    if board.get(to).is_color(side.opposite()) {
        if promoting {
            push_promotions(from, to, true, moves);
        } else {
            moves.push(Move::new(from, to, MoveKind::Capture));
        }
    }
}

fn push_promotions(from: Square, to: Square, capture: bool, moves: &mut MoveList) {
    for piece in PROMOTION_PIECES {
        if let Some(kind) = MoveKind::promotion(piece, capture) {
            moves.push(Move::new(from, to, kind));
        }
    }
}

/// Castling candidates for an unmoved king on its home square. Attack
/// conditions are left to the legality filter.
fn generate_castling_moves(board: &Board, king: Square, side: Color, moves: &mut MoveList) {
    let rank = side.back_rank();
    if king != Square::new(File::E, rank) {
        return;
    }

    let unmoved_rook = |file: File| {
        let piece = board.get(Square::new(file, rank));
        piece.is(PieceKind::Rook, side) && !piece.has_moved()
    };
    let empty = |files: &[File]| {
        files
            .iter()
            .all(|&file| board.get(Square::new(file, rank)).is_empty())
    };

    if unmoved_rook(File::A) && empty(&[File::B, File::C, File::D]) {
        moves.push(Move::new(
            king,
            Square::new(File::C, rank),
            MoveKind::QueenCastle,
        ));
    }
    if unmoved_rook(File::H) && empty(&[File::F, File::G]) {
        moves.push(Move::new(
            king,
            Square::new(File::G, rank),
            MoveKind::KingCastle,
        ));
    }
}

/// Returns true if any piece of the opponent of `defender` attacks `sq`.
///
/// Probes outward from `sq` with each piece's own movement pattern and looks
/// for a matching enemy piece at the end of the probe.
pub fn square_is_attacked(board: &Board, sq: Square, defender: Color) -> bool {
    let attacker = defender.opposite();

    for kind in [
        PieceKind::Knight,
        PieceKind::Bishop,
        PieceKind::Rook,
        PieceKind::Queen,
        PieceKind::King,
    ] {
        for &direction in directions(kind) {
            let mut probe = sq;
            while let Some(next) = Board::offset_square(probe, direction) {
                probe = next;
                let piece = board.get(probe);
                if piece.is_empty() {
                    if kind.is_slider() {
                        continue;
                    }
                    break;
                }
                if piece.is(kind, attacker) {
                    return true;
                }
                break;
            }
        }
    }

    // An attacking pawn sits one rank behind `sq` from its own point of view.
    let behind = -pawn_forward(attacker);
    [EAST, WEST].into_iter().any(|side_step| {
        Board::offset_square(sq, behind + side_step)
            .is_some_and(|origin| board.get(origin).is(PieceKind::Pawn, attacker))
    })
}

/// Returns true if the king of `color` is attacked. A side without a king is
/// never in check.
pub fn is_king_attacked(board: &Board, pieces: &PieceList, color: Color) -> bool {
    pieces
        .king_square(color)
        .is_some_and(|king| square_is_attacked(board, king, color))
}
