//! Game state: board, piece lists, legal moves and history.
//!
//! [`ChessBoardIndex`] owns everything that changes as a game is played and
//! keeps the pieces consistent with each other. After every completed move
//! it regenerates the legal move set for the side to move and reports
//! whether the game has ended.
//!
//! A pawn reaching the last rank can either promote at once or stop in
//! [`BoardState::AwaitingPromotion`] until the caller picks a piece with
//! [`ChessBoardIndex::resolve_promotion`].

mod fen;
mod make_unmake;
#[cfg(test)]
mod tests;

use crate::history::MoveHistory;
use crate::mailbox::Board;
use crate::movegen::{generate_pseudo_legal_moves, is_king_attacked, square_is_attacked, MoveList};
use crate::rules::{self, DrawReason, GameResult, FIFTY_MOVE_PLIES};
use crate::PieceList;
use chess_core::{Color, FenError, FenParser, File, Move, PieceKind, Square};
use thiserror::Error;

/// Error type for game operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EngineError {
    #[error(transparent)]
    Fen(#[from] FenError),
    /// A promotion choice must be made before anything else is played.
    #[error("a promotion choice is pending")]
    PromotionPending,
    #[error("no promotion is pending")]
    NoPendingPromotion,
    #[error("cannot promote to {0}")]
    InvalidPromotion(PieceKind),
}

/// Whether the board accepts moves or waits for a promotion choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BoardState {
    #[default]
    Idle,
    /// A pawn stands on `square`, its promotion piece not yet chosen.
    AwaitingPromotion { square: Square },
}

/// A chess game on a mailbox board.
#[derive(Debug, Clone)]
pub struct ChessBoardIndex {
    board: Board,
    pieces: PieceList,
    legal_moves: MoveList,
    history: MoveHistory,
    side_to_move: Color,
    /// The pawn that double pushed on the last ply, if any.
    en_passant_pawn: Option<Square>,
    halfmove_clock: u32,
    fullmove_number: u32,
    state: BoardState,
}

impl Default for ChessBoardIndex {
    fn default() -> Self {
        Self::new()
    }
}

impl ChessBoardIndex {
    /// A game at the standard starting position.
    pub fn new() -> Self {
        let mut index = Self::empty();
        index
            .load_position(FenParser::STARTPOS)
            .expect("STARTPOS is valid");
        index
    }

    /// A game starting from a FEN position.
    pub fn from_fen(fen: &str) -> Result<Self, EngineError> {
        let mut index = Self::empty();
        index.load_position(fen)?;
        Ok(index)
    }

    fn empty() -> Self {
        ChessBoardIndex {
            board: Board::empty(),
            pieces: PieceList::new(),
            legal_moves: MoveList::new(),
            history: MoveHistory::new(),
            side_to_move: Color::White,
            en_passant_pawn: None,
            halfmove_clock: 0,
            fullmove_number: 1,
            state: BoardState::Idle,
        }
    }

    #[inline]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[inline]
    pub fn pieces(&self) -> &PieceList {
        &self.pieces
    }

    /// Legal moves for the side to move.
    ///
    /// While a promotion is pending this still holds the mover's moves from
    /// before the promoting move.
    #[inline]
    pub fn legal_moves(&self) -> &MoveList {
        &self.legal_moves
    }

    #[inline]
    pub fn history(&self) -> &MoveHistory {
        &self.history
    }

    #[inline]
    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    #[inline]
    pub fn state(&self) -> BoardState {
        self.state
    }

    #[inline]
    pub fn halfmove_clock(&self) -> u32 {
        self.halfmove_clock
    }

    #[inline]
    pub fn fullmove_number(&self) -> u32 {
        self.fullmove_number
    }

    /// Square of the pawn that may be captured en passant on this ply.
    #[inline]
    pub fn en_passant_pawn(&self) -> Option<Square> {
        self.en_passant_pawn
    }

    /// Finds the legal move from `from` to `to`.
    ///
    /// Promotions come in four flavours per destination; the knight
    /// promotion is generated first and is the one returned. Use
    /// [`ChessBoardIndex::find_move_uci`] or [`Move::with_promotion`] to pick
    /// another piece.
    pub fn find_move(&self, from: Square, to: Square) -> Option<Move> {
        self.legal_moves
            .iter()
            .copied()
            .find(|m| m.from() == from && m.to() == to)
    }

    /// Finds the legal move matching UCI text such as "e2e4" or "a7a8q".
    /// A missing promotion suffix matches the knight promotion.
    pub fn find_move_uci(&self, uci: &str) -> Option<Move> {
        let parsed = Move::from_uci(uci)?;
        let found = self.find_move(parsed.from(), parsed.to())?;
        match parsed.kind().promotion_piece() {
            Some(piece) if found.is_promotion() => Some(found.with_promotion(piece)),
            Some(_) => None,
            None => Some(found),
        }
    }

    /// Returns true if the side to move is in check.
    pub fn is_check(&self) -> bool {
        is_king_attacked(&self.board, &self.pieces, self.side_to_move)
    }

    /// Returns true if `sq` is attacked by the opponent of `defender`.
    pub fn is_square_attacked(&self, sq: Square, defender: Color) -> bool {
        square_is_attacked(&self.board, sq, defender)
    }

    /// The game result if the game is over, otherwise `None`.
    ///
    /// Always `None` while a promotion is pending.
    pub fn check_game_ended(&self) -> Option<GameResult> {
        if self.state != BoardState::Idle {
            return None;
        }
        if self.legal_moves.is_empty() {
            return Some(if self.is_check() {
                GameResult::checkmated(self.side_to_move)
            } else {
                GameResult::Draw(DrawReason::Stalemate)
            });
        }
        if rules::is_insufficient_material(&self.pieces) {
            return Some(GameResult::Draw(DrawReason::InsufficientMaterial));
        }
        if self.halfmove_clock >= FIFTY_MOVE_PLIES {
            return Some(GameResult::Draw(DrawReason::FiftyMoveRule));
        }
        None
    }

    /// Regenerates the legal move set for the side to move.
    ///
    /// Does nothing while a promotion is pending; the set stays as it was
    /// before the promoting move until the choice is made.
    pub fn refresh_legal_moves(&mut self) {
        if self.state != BoardState::Idle {
            return;
        }
        let mut moves = generate_pseudo_legal_moves(&self.board, &self.pieces, self.side_to_move);
        self.filter_pseudo_legal_moves(&mut moves);
        self.legal_moves = moves;
    }

    /// Drops every move that leaves the mover's king attacked.
    ///
    /// Walks the list from the back so that swap-removal only ever pulls in
    /// moves that were already checked.
    fn filter_pseudo_legal_moves(&mut self, moves: &mut MoveList) {
        for i in (0..moves.len()).rev() {
            if !self.keeps_king_safe(moves[i]) {
                moves.swap_remove(i);
            }
        }
    }

    fn keeps_king_safe(&mut self, m: Move) -> bool {
        let us = self.side_to_move;

        if m.is_castle() {
            let king = m.from();
            let crossed = Square::new(
                if m.to().file() == File::G {
                    File::F
                } else {
                    File::D
                },
                king.rank(),
            );
            if square_is_attacked(&self.board, king, us)
                || square_is_attacked(&self.board, crossed, us)
            {
                return false;
            }
        }

        let record = self.history_record(m);
        self.apply_move(m, false);
        let safe = !is_king_attacked(&self.board, &self.pieces, us);
        self.revert_move(&record, true);
        safe
    }

    /// Logs and returns the game result after a completed move.
    fn report_result(&self) -> Option<GameResult> {
        let result = self.check_game_ended();
        if let Some(result) = result {
            tracing::info!(fullmove = self.fullmove_number, "game over: {}", result);
        }
        result
    }
}
