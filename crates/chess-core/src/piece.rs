//! Piece representation.
//!
//! [`PieceKind`] names the six piece types. [`Piece`] is what a board square
//! holds: a kind (or nothing), a color and a [`PieceStatus`], packed into a
//! single byte.

use crate::Color;
use std::fmt;
use std::ops::BitOr;

/// The six types of chess pieces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum PieceKind {
    Pawn = 0,
    Knight = 1,
    Bishop = 2,
    Rook = 3,
    Queen = 4,
    King = 5,
}

impl PieceKind {
    /// All piece kinds in order.
    pub const ALL: [PieceKind; 6] = [
        PieceKind::Pawn,
        PieceKind::Knight,
        PieceKind::Bishop,
        PieceKind::Rook,
        PieceKind::Queen,
        PieceKind::King,
    ];

    /// Returns the index of this kind (0-5).
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Returns the FEN character for this kind with the given color.
    pub const fn to_fen_char(self, color: Color) -> char {
        let c = match self {
            PieceKind::Pawn => 'p',
            PieceKind::Knight => 'n',
            PieceKind::Bishop => 'b',
            PieceKind::Rook => 'r',
            PieceKind::Queen => 'q',
            PieceKind::King => 'k',
        };
        match color {
            Color::White => c.to_ascii_uppercase(),
            Color::Black => c,
        }
    }

    /// Parses a FEN character into a kind and color.
    pub const fn from_fen_char(c: char) -> Option<(PieceKind, Color)> {
        let color = if c.is_ascii_uppercase() {
            Color::White
        } else {
            Color::Black
        };
        let kind = match c.to_ascii_lowercase() {
            'p' => PieceKind::Pawn,
            'n' => PieceKind::Knight,
            'b' => PieceKind::Bishop,
            'r' => PieceKind::Rook,
            'q' => PieceKind::Queen,
            'k' => PieceKind::King,
            _ => return None,
        };
        Some((kind, color))
    }

    /// Bishops, rooks and queens slide; everything else steps.
    #[inline]
    pub const fn is_slider(self) -> bool {
        matches!(self, PieceKind::Bishop | PieceKind::Rook | PieceKind::Queen)
    }

    /// Kinds a pawn may promote to.
    #[inline]
    pub const fn is_promotion_target(self) -> bool {
        matches!(
            self,
            PieceKind::Knight | PieceKind::Bishop | PieceKind::Rook | PieceKind::Queen
        )
    }
}

impl fmt::Display for PieceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PieceKind::Pawn => "Pawn",
            PieceKind::Knight => "Knight",
            PieceKind::Bishop => "Bishop",
            PieceKind::Rook => "Rook",
            PieceKind::Queen => "Queen",
            PieceKind::King => "King",
        };
        write!(f, "{}", name)
    }
}

/// Two status bits carried by a piece on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct PieceStatus(u8);

impl PieceStatus {
    pub const NONE: PieceStatus = PieceStatus(0);
    /// The piece has left its starting square at least once.
    pub const HAS_MOVED: PieceStatus = PieceStatus(0b01);
    /// A pawn that double pushed on the previous ply.
    pub const EN_PASSANT: PieceStatus = PieceStatus(0b10);

    #[inline]
    pub const fn from_bits(bits: u8) -> Self {
        PieceStatus(bits & 0b11)
    }

    #[inline]
    pub const fn bits(self) -> u8 {
        self.0
    }

    #[inline]
    pub const fn contains(self, other: PieceStatus) -> bool {
        self.0 & other.0 == other.0
    }

    #[inline]
    pub const fn with(self, other: PieceStatus) -> Self {
        PieceStatus(self.0 | other.0)
    }

    #[inline]
    pub const fn without(self, other: PieceStatus) -> Self {
        PieceStatus(self.0 & !other.0)
    }
}

impl BitOr for PieceStatus {
    type Output = PieceStatus;

    fn bitor(self, rhs: Self) -> Self::Output {
        self.with(rhs)
    }
}

/// The contents of one board square.
///
/// Layout: bits 0-2 kind (0 = empty, 1-6 = pawn..king), bit 3 color,
/// bits 4-5 status. Color and status are meaningless on an empty square.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Piece(u8);

impl Piece {
    const KIND_MASK: u8 = 0b0000_0111;
    const COLOR_BIT: u8 = 0b0000_1000;
    const STATUS_SHIFT: u8 = 4;

    /// An empty square.
    pub const EMPTY: Piece = Piece(0);

    #[inline]
    pub const fn new(kind: PieceKind, color: Color, status: PieceStatus) -> Self {
        Piece(
            (kind as u8 + 1)
                | ((color as u8) << 3)
                | (status.bits() << Self::STATUS_SHIFT),
        )
    }

    #[inline]
    pub const fn kind(self) -> Option<PieceKind> {
        match self.0 & Self::KIND_MASK {
            0 => None,
            k => Some(PieceKind::ALL[(k - 1) as usize]),
        }
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 & Self::KIND_MASK == 0
    }

    #[inline]
    pub const fn color(self) -> Color {
        if self.0 & Self::COLOR_BIT == 0 {
            Color::White
        } else {
            Color::Black
        }
    }

    #[inline]
    pub const fn status(self) -> PieceStatus {
        PieceStatus::from_bits(self.0 >> Self::STATUS_SHIFT)
    }

    /// True if this square holds a piece of `kind` and `color`.
    #[inline]
    pub const fn is(self, kind: PieceKind, color: Color) -> bool {
        self.0 & (Self::KIND_MASK | Self::COLOR_BIT) == (kind as u8 + 1) | ((color as u8) << 3)
    }

    /// True if this square holds a piece of `color`.
    #[inline]
    pub const fn is_color(self, color: Color) -> bool {
        !self.is_empty() && self.color() as u8 == color as u8
    }

    #[inline]
    pub const fn has_moved(self) -> bool {
        self.status().contains(PieceStatus::HAS_MOVED)
    }

    #[inline]
    pub const fn is_en_passant_target(self) -> bool {
        self.status().contains(PieceStatus::EN_PASSANT)
    }

    #[inline]
    pub const fn with_kind(self, kind: PieceKind) -> Self {
        Piece((self.0 & !Self::KIND_MASK) | (kind as u8 + 1))
    }

    #[inline]
    pub const fn with_status(self, status: PieceStatus) -> Self {
        Piece((self.0 & (Self::KIND_MASK | Self::COLOR_BIT)) | (status.bits() << Self::STATUS_SHIFT))
    }

    /// FEN character, or `None` for an empty square.
    pub const fn to_fen_char(self) -> Option<char> {
        match self.kind() {
            Some(kind) => Some(kind.to_fen_char(self.color())),
            None => None,
        }
    }
}

impl fmt::Debug for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind() {
            Some(kind) => write!(
                f,
                "Piece({} {}, status {:#04b})",
                self.color(),
                kind,
                self.status().bits()
            ),
            None => write!(f, "Piece(empty)"),
        }
    }
}
