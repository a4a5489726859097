//! Game termination rules.
//!
//! Only conditions that can be read off the current position are detected:
//! checkmate, stalemate, insufficient material and the fifty-move rule.

use crate::PieceList;
use chess_core::{Color, PieceKind};
use std::fmt;

/// Halfmove clock value at which the fifty-move rule ends the game.
pub const FIFTY_MOVE_PLIES: u32 = 100;

/// Result of a finished game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameResult {
    /// White wins by checkmate.
    WhiteWins,
    /// Black wins by checkmate.
    BlackWins,
    /// Draw with a specific reason.
    Draw(DrawReason),
}

/// Reason for a draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawReason {
    /// Stalemate - no legal moves but not in check.
    Stalemate,
    /// Neither side can deliver mate.
    InsufficientMaterial,
    /// 100 half-moves without pawn move or capture.
    FiftyMoveRule,
}

impl GameResult {
    /// The result when `loser` is checkmated.
    pub const fn checkmated(loser: Color) -> Self {
        match loser {
            Color::White => GameResult::BlackWins,
            Color::Black => GameResult::WhiteWins,
        }
    }

    pub const fn is_checkmate(self) -> bool {
        matches!(self, GameResult::WhiteWins | GameResult::BlackWins)
    }

    pub const fn winner(self) -> Option<Color> {
        match self {
            GameResult::WhiteWins => Some(Color::White),
            GameResult::BlackWins => Some(Color::Black),
            GameResult::Draw(_) => None,
        }
    }
}

impl fmt::Display for GameResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameResult::WhiteWins => write!(f, "1-0 (checkmate)"),
            GameResult::BlackWins => write!(f, "0-1 (checkmate)"),
            GameResult::Draw(reason) => write!(f, "1/2-1/2 ({})", reason),
        }
    }
}

impl fmt::Display for DrawReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            DrawReason::Stalemate => "stalemate",
            DrawReason::InsufficientMaterial => "insufficient material",
            DrawReason::FiftyMoveRule => "fifty-move rule",
        };
        f.write_str(text)
    }
}

/// True if both sides are down to one of: a lone king, king and bishop,
/// king and knight, or king and two knights.
pub fn is_insufficient_material(pieces: &PieceList) -> bool {
    Color::BOTH
        .into_iter()
        .all(|color| side_cannot_mate(pieces, color))
}

fn side_cannot_mate(pieces: &PieceList, color: Color) -> bool {
    match pieces.len(color) {
        1 => true,
        2 => {
            pieces.count(color, PieceKind::Bishop) == 1
                || pieces.count(color, PieceKind::Knight) == 1
        }
        3 => pieces.count(color, PieceKind::Knight) == 2,
        _ => false,
    }
}
