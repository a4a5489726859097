//! Square-centric board storage.
//!
//! The board itself is a plain 64-entry array. Direction arithmetic goes
//! through a padded 10×12 table instead: every square is surrounded by guard
//! cells, so adding any piece offset either lands on a real square or on a
//! guard, and no per-direction edge checks are needed.

use chess_core::{Color, File, Move, MoveKind, Piece, PieceStatus, Square};
use std::fmt;

/// One rank up in the padded table.
pub const NORTH: i8 = 10;
/// One rank down in the padded table.
pub const SOUTH: i8 = -10;
/// One file toward h.
pub const EAST: i8 = 1;
/// One file toward a.
pub const WEST: i8 = -1;

/// 10×12 table: square index for real cells, -1 for guards.
#[rustfmt::skip]
static MAILBOX: [i8; 120] = [
    -1, -1, -1, -1, -1, -1, -1, -1, -1, -1,
    -1, -1, -1, -1, -1, -1, -1, -1, -1, -1,
    -1,  0,  1,  2,  3,  4,  5,  6,  7, -1,
    -1,  8,  9, 10, 11, 12, 13, 14, 15, -1,
    -1, 16, 17, 18, 19, 20, 21, 22, 23, -1,
    -1, 24, 25, 26, 27, 28, 29, 30, 31, -1,
    -1, 32, 33, 34, 35, 36, 37, 38, 39, -1,
    -1, 40, 41, 42, 43, 44, 45, 46, 47, -1,
    -1, 48, 49, 50, 51, 52, 53, 54, 55, -1,
    -1, 56, 57, 58, 59, 60, 61, 62, 63, -1,
    -1, -1, -1, -1, -1, -1, -1, -1, -1, -1,
    -1, -1, -1, -1, -1, -1, -1, -1, -1, -1,
];

/// Position of each square in [`MAILBOX`].
#[rustfmt::skip]
static MAILBOX64: [u8; 64] = [
    21, 22, 23, 24, 25, 26, 27, 28,
    31, 32, 33, 34, 35, 36, 37, 38,
    41, 42, 43, 44, 45, 46, 47, 48,
    51, 52, 53, 54, 55, 56, 57, 58,
    61, 62, 63, 64, 65, 66, 67, 68,
    71, 72, 73, 74, 75, 76, 77, 78,
    81, 82, 83, 84, 85, 86, 87, 88,
    91, 92, 93, 94, 95, 96, 97, 98,
];

/// Padded-table step that moves a pawn of `color` one rank forward.
#[inline]
pub const fn pawn_forward(color: Color) -> i8 {
    match color {
        Color::White => NORTH,
        Color::Black => SOUTH,
    }
}

/// The 64 squares and what stands on them.
#[derive(Clone, PartialEq, Eq)]
pub struct Board {
    squares: [Piece; 64],
}

impl Board {
    /// A board with every square empty.
    pub const fn empty() -> Self {
        Board {
            squares: [Piece::EMPTY; 64],
        }
    }

    #[inline]
    pub fn get(&self, sq: Square) -> Piece {
        self.squares[sq.index() as usize]
    }

    #[inline]
    pub fn set(&mut self, sq: Square, piece: Piece) {
        self.squares[sq.index() as usize] = piece;
    }

    #[inline]
    pub fn clear(&mut self, sq: Square) {
        self.set(sq, Piece::EMPTY);
    }

    /// Copies the piece on `from` to `to` and empties `from`.
    #[inline]
    pub fn move_piece(&mut self, from: Square, to: Square) {
        let piece = self.get(from);
        self.set(to, piece);
        self.clear(from);
    }

    /// Sets status bits on an occupied square. Empty squares stay empty.
    pub fn add_status(&mut self, sq: Square, status: PieceStatus) {
        let piece = self.get(sq);
        if !piece.is_empty() {
            self.set(sq, piece.with_status(piece.status().with(status)));
        }
    }

    /// Clears status bits on an occupied square.
    pub fn remove_status(&mut self, sq: Square, status: PieceStatus) {
        let piece = self.get(sq);
        if !piece.is_empty() {
            self.set(sq, piece.with_status(piece.status().without(status)));
        }
    }

    /// The square reached by stepping `direction` from `sq`, or `None` off the board.
    #[inline]
    pub fn offset_square(sq: Square, direction: i8) -> Option<Square> {
        let cell = MAILBOX64[sq.index() as usize] as i16 + direction as i16;
        let target = *MAILBOX.get(usize::try_from(cell).ok()?)?;
        if target < 0 {
            None
        } else {
            Square::from_index(target as u8)
        }
    }

    /// Rook origin and destination for a castling move.
    pub fn rook_squares_for_castle(m: Move) -> (Square, Square) {
        let rank = m.from().rank();
        match m.kind() {
            MoveKind::QueenCastle => (Square::new(File::A, rank), Square::new(File::D, rank)),
            _ => (Square::new(File::H, rank), Square::new(File::F, rank)),
        }
    }

    /// Square of the pawn removed by an en passant capture: the destination
    /// file on the origin rank.
    #[inline]
    pub fn en_passant_captured_square(m: Move) -> Square {
        Square::new(m.to().file(), m.from().rank())
    }

    /// Occupied squares with their pieces, a1 first.
    pub fn occupied(&self) -> impl Iterator<Item = (Square, Piece)> + '_ {
        Square::all()
            .map(|sq| (sq, self.get(sq)))
            .filter(|(_, piece)| !piece.is_empty())
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::empty()
    }
}

impl std::ops::Index<Square> for Board {
    type Output = Piece;

    #[inline]
    fn index(&self, sq: Square) -> &Self::Output {
        &self.squares[sq.index() as usize]
    }
}

/// Text diagram, rank 8 at the top.
impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rank in (0..8u8).rev() {
            write!(f, "{} ", rank + 1)?;
            for file in 0..8u8 {
                let piece = Square::from_index(rank * 8 + file)
                    .map(|sq| self.get(sq))
                    .unwrap_or(Piece::EMPTY);
                write!(f, " {}", piece.to_fen_char().unwrap_or('.'))?;
            }
            writeln!(f)?;
        }
        write!(f, "   a b c d e f g h")
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Board")?;
        write!(f, "{}", self)
    }
}
