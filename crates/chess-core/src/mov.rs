//! Move representation.

use crate::{PieceKind, Square};
use std::fmt;

/// The 4-bit tag describing what a move does.
///
/// Bit 3 marks promotions, bit 2 marks captures; the low two bits select the
/// promotion piece (knight, bishop, rook, queen) for promotions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum MoveKind {
    Quiet = 0b0000,
    DoublePawnPush = 0b0001,
    KingCastle = 0b0010,
    QueenCastle = 0b0011,
    Capture = 0b0100,
    EnPassantCapture = 0b0101,
    KnightPromotion = 0b1000,
    BishopPromotion = 0b1001,
    RookPromotion = 0b1010,
    QueenPromotion = 0b1011,
    KnightPromotionCapture = 0b1100,
    BishopPromotionCapture = 0b1101,
    RookPromotionCapture = 0b1110,
    QueenPromotionCapture = 0b1111,
}

impl MoveKind {
    const CAPTURE_BIT: u8 = 0b0100;
    const PROMOTION_BIT: u8 = 0b1000;

    /// Decodes a 4-bit tag. The two unused codes decode as quiet moves.
    pub const fn from_bits(bits: u8) -> Self {
        match bits & 0x0F {
            0b0001 => MoveKind::DoublePawnPush,
            0b0010 => MoveKind::KingCastle,
            0b0011 => MoveKind::QueenCastle,
            0b0100 => MoveKind::Capture,
            0b0101 => MoveKind::EnPassantCapture,
            0b1000 => MoveKind::KnightPromotion,
            0b1001 => MoveKind::BishopPromotion,
            0b1010 => MoveKind::RookPromotion,
            0b1011 => MoveKind::QueenPromotion,
            0b1100 => MoveKind::KnightPromotionCapture,
            0b1101 => MoveKind::BishopPromotionCapture,
            0b1110 => MoveKind::RookPromotionCapture,
            0b1111 => MoveKind::QueenPromotionCapture,
            _ => MoveKind::Quiet,
        }
    }

    /// Builds the promotion tag for `piece`, with or without capture.
    ///
    /// Returns `None` for pawns and kings.
    pub const fn promotion(piece: PieceKind, capture: bool) -> Option<Self> {
        let low = match piece {
            PieceKind::Knight => 0b00,
            PieceKind::Bishop => 0b01,
            PieceKind::Rook => 0b10,
            PieceKind::Queen => 0b11,
            PieceKind::Pawn | PieceKind::King => return None,
        };
        let capture = if capture { Self::CAPTURE_BIT } else { 0 };
        Some(Self::from_bits(Self::PROMOTION_BIT | capture | low))
    }

    #[inline]
    pub const fn bits(self) -> u8 {
        self as u8
    }

    #[inline]
    pub const fn is_capture(self) -> bool {
        self.bits() & Self::CAPTURE_BIT != 0
    }

    #[inline]
    pub const fn is_promotion(self) -> bool {
        self.bits() & Self::PROMOTION_BIT != 0
    }

    #[inline]
    pub const fn is_castle(self) -> bool {
        matches!(self, MoveKind::KingCastle | MoveKind::QueenCastle)
    }

    /// The piece a promotion turns into.
    #[inline]
    pub const fn promotion_piece(self) -> Option<PieceKind> {
        if !self.is_promotion() {
            return None;
        }
        Some(match self.bits() & 0b11 {
            0b00 => PieceKind::Knight,
            0b01 => PieceKind::Bishop,
            0b10 => PieceKind::Rook,
            _ => PieceKind::Queen,
        })
    }
}

/// A chess move.
///
/// Encoded in 16 bits: 6 bits origin, 6 bits destination, 4 bits [`MoveKind`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Move(u16);

impl Move {
    /// All-zero placeholder. Never produced by move generation.
    pub const NULL: Move = Move(0);

    #[inline]
    pub const fn new(from: Square, to: Square, kind: MoveKind) -> Self {
        Move((from.index() as u16) | ((to.index() as u16) << 6) | ((kind as u16) << 12))
    }

    #[inline]
    pub const fn quiet(from: Square, to: Square) -> Self {
        Self::new(from, to, MoveKind::Quiet)
    }

    #[inline]
    pub const fn from(self) -> Square {
        Square::from_low_bits(self.0)
    }

    #[inline]
    pub const fn to(self) -> Square {
        Square::from_low_bits(self.0 >> 6)
    }

    #[inline]
    pub const fn kind(self) -> MoveKind {
        MoveKind::from_bits((self.0 >> 12) as u8)
    }

    #[inline]
    pub fn set_from(&mut self, from: Square) {
        self.0 = (self.0 & !0x003F) | from.index() as u16;
    }

    #[inline]
    pub fn set_to(&mut self, to: Square) {
        self.0 = (self.0 & !0x0FC0) | ((to.index() as u16) << 6);
    }

    #[inline]
    pub fn set_kind(&mut self, kind: MoveKind) {
        self.0 = (self.0 & !0xF000) | ((kind as u16) << 12);
    }

    /// Same squares, promoting to `piece` instead. Keeps the capture bit.
    ///
    /// Non-promotions and non-promotable pieces return the move unchanged.
    pub fn with_promotion(self, piece: PieceKind) -> Self {
        let kind = self.kind();
        if !kind.is_promotion() {
            return self;
        }
        match MoveKind::promotion(piece, kind.is_capture()) {
            Some(promoted) => {
                let mut m = self;
                m.set_kind(promoted);
                m
            }
            None => self,
        }
    }

    #[inline]
    pub const fn is_capture(self) -> bool {
        self.kind().is_capture()
    }

    #[inline]
    pub const fn is_promotion(self) -> bool {
        self.kind().is_promotion()
    }

    #[inline]
    pub const fn is_castle(self) -> bool {
        self.kind().is_castle()
    }

    #[inline]
    pub const fn is_en_passant(self) -> bool {
        matches!(self.kind(), MoveKind::EnPassantCapture)
    }

    #[inline]
    pub const fn is_double_pawn_push(self) -> bool {
        matches!(self.kind(), MoveKind::DoublePawnPush)
    }

    /// UCI notation, e.g. "e2e4" or "e7e8q".
    pub fn to_uci(self) -> String {
        let promo = match self.kind().promotion_piece() {
            Some(PieceKind::Knight) => "n",
            Some(PieceKind::Bishop) => "b",
            Some(PieceKind::Rook) => "r",
            Some(PieceKind::Queen) => "q",
            _ => "",
        };
        format!("{}{}{}", self.from(), self.to(), promo)
    }

    /// Parses UCI notation.
    ///
    /// Only squares and the promotion piece are known from the text; the
    /// remaining kind bits must come from matching against generated moves.
    pub fn from_uci(s: &str) -> Option<Self> {
        if !s.is_ascii() || s.len() < 4 || s.len() > 5 {
            return None;
        }
        let from = Square::from_algebraic(&s[0..2])?;
        let to = Square::from_algebraic(&s[2..4])?;
        let kind = match s.as_bytes().get(4) {
            None => MoveKind::Quiet,
            Some(c) => {
                let piece = match c.to_ascii_lowercase() {
                    b'n' => PieceKind::Knight,
                    b'b' => PieceKind::Bishop,
                    b'r' => PieceKind::Rook,
                    b'q' => PieceKind::Queen,
                    _ => return None,
                };
                MoveKind::promotion(piece, false)?
            }
        };
        Some(Move::new(from, to, kind))
    }
}

impl fmt::Debug for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Move({} {:?})", self.to_uci(), self.kind())
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_uci())
    }
}
