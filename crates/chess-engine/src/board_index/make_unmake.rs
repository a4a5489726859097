//! Making, unmaking and replaying moves.
//!
//! Every move is applied in place and taken back from a
//! [`MoveHistoryRecord`]; the legality filter and perft use the same pair of
//! operations without touching the game history.

use super::{BoardState, ChessBoardIndex, EngineError};
use crate::history::MoveHistoryRecord;
use crate::mailbox::Board;
use crate::rules::GameResult;
use chess_core::{Color, Move, Piece, PieceKind, PieceStatus, Square};

impl ChessBoardIndex {
    /// Plays a legal move.
    ///
    /// With `wait_for_promotion` set, a promoting move stops with the pawn on
    /// the last rank and the board in [`BoardState::AwaitingPromotion`]; the
    /// side to move does not change until [`resolve_promotion`] is called.
    /// Otherwise the promotion piece encoded in the move is used.
    ///
    /// Returns the game result if the move ended the game.
    ///
    /// `m` must come from [`legal_moves`]; anything else corrupts the board.
    ///
    /// [`resolve_promotion`]: ChessBoardIndex::resolve_promotion
    /// [`legal_moves`]: ChessBoardIndex::legal_moves
    pub fn make_move(
        &mut self,
        m: Move,
        wait_for_promotion: bool,
    ) -> Result<Option<GameResult>, EngineError> {
        if self.state != BoardState::Idle {
            return Err(EngineError::PromotionPending);
        }
        Ok(self.play(m, wait_for_promotion))
    }

    pub(crate) fn play(&mut self, m: Move, wait_for_promotion: bool) -> Option<GameResult> {
        let record = self.history_record(m);
        self.history.push(record);
        self.apply_move(m, wait_for_promotion);

        if let BoardState::AwaitingPromotion { square } = self.state {
            tracing::debug!(mv = %m.to_uci(), %square, "awaiting promotion choice");
            return None;
        }

        self.refresh_legal_moves();
        tracing::debug!(
            mv = %m.to_uci(),
            legal_moves = self.legal_moves.len(),
            "move played"
        );
        self.report_result()
    }

    /// Completes a pending promotion with `piece`.
    pub fn resolve_promotion(
        &mut self,
        piece: PieceKind,
    ) -> Result<Option<GameResult>, EngineError> {
        let BoardState::AwaitingPromotion { square } = self.state else {
            return Err(EngineError::NoPendingPromotion);
        };
        if !piece.is_promotion_target() {
            return Err(EngineError::InvalidPromotion(piece));
        }

        self.promote(square, piece);
        self.history.amend_last_promotion(piece);
        self.state = BoardState::Idle;
        self.finish_turn();
        self.refresh_legal_moves();
        tracing::debug!(%square, %piece, "promotion resolved");
        Ok(self.report_result())
    }

    /// Takes back the last played move and returns it.
    ///
    /// The move stays available to [`redo_next_move`]. With `regenerate`
    /// unset the legal move set is left stale, for callers that are about to
    /// play or unmake again.
    ///
    /// [`redo_next_move`]: ChessBoardIndex::redo_next_move
    pub fn unmake_last_move(&mut self, regenerate: bool) -> Option<Move> {
        let record = self.history.pop()?;
        // A move stopped at a promotion choice never handed the turn over.
        let completed = std::mem::take(&mut self.state) == BoardState::Idle;
        self.revert_move(&record, completed);
        if regenerate {
            self.refresh_legal_moves();
        }
        tracing::debug!(mv = %record.mv.to_uci(), "move taken back");
        Some(record.mv)
    }

    /// Replays the next move of the forward history, if any.
    pub fn redo_next_move(&mut self) -> Result<Option<Move>, EngineError> {
        if self.state != BoardState::Idle {
            return Err(EngineError::PromotionPending);
        }
        let Some(m) = self.history.next().map(|record| record.mv) else {
            return Ok(None);
        };
        self.play(m, false);
        Ok(Some(m))
    }

    /// Snapshot of what `m` is about to change.
    pub(crate) fn history_record(&self, m: Move) -> MoveHistoryRecord {
        let captured = if m.is_capture() {
            self.board.get(captured_square(m))
        } else {
            Piece::EMPTY
        };
        MoveHistoryRecord {
            mv: m,
            mover_status: self.board.get(m.from()).status(),
            captured,
            previous_en_passant: self.en_passant_pawn,
            halfmove_clock: self.halfmove_clock,
        }
    }

    /// Applies `m` to the board and piece lists without touching the history
    /// or the legal move set.
    pub(crate) fn apply_move(&mut self, m: Move, wait_for_promotion: bool) {
        let us = self.side_to_move;
        let (from, to) = (m.from(), m.to());
        let mover = self.board.get(from);
        debug_assert!(mover.is_color(us), "{m:?} does not move a {us} piece");

        self.halfmove_clock += 1;
        if mover.kind() == Some(PieceKind::Pawn) {
            self.halfmove_clock = 0;
        }

        if m.is_capture() {
            self.halfmove_clock = 0;
            let victim_square = captured_square(m);
            if let Some(victim) = self.board.get(victim_square).kind() {
                self.pieces.remove_piece(victim_square, us.opposite(), victim);
            }
            self.board.clear(victim_square);
        }

        // The previous ply's en passant chance expires now.
        if let Some(stale) = self.en_passant_pawn.take() {
            self.board.remove_status(stale, PieceStatus::EN_PASSANT);
        }

        let mut status = mover.status().with(PieceStatus::HAS_MOVED);
        if m.is_double_pawn_push() {
            status = status.with(PieceStatus::EN_PASSANT);
            self.en_passant_pawn = Some(to);
        }
        self.board.set(from, mover.with_status(status));
        self.board.move_piece(from, to);
        self.pieces.move_piece(from, to, us);

        if m.is_castle() {
            let (rook_from, rook_to) = Board::rook_squares_for_castle(m);
            self.board.add_status(rook_from, PieceStatus::HAS_MOVED);
            self.board.move_piece(rook_from, rook_to);
            self.pieces.move_piece(rook_from, rook_to, us);
        }

        if let Some(piece) = m.kind().promotion_piece() {
            if wait_for_promotion {
                self.state = BoardState::AwaitingPromotion { square: to };
                return;
            }
            self.promote(to, piece);
        }

        self.finish_turn();
    }

    /// Restores the position from before `record.mv`.
    ///
    /// `completed` tells whether applying the move handed the turn over,
    /// which it does unless it stopped at a promotion choice. The board state
    /// is left alone.
    pub(crate) fn revert_move(&mut self, record: &MoveHistoryRecord, completed: bool) {
        let m = record.mv;
        let (from, to) = (m.from(), m.to());

        if completed {
            self.undo_turn();
        }
        let us = self.side_to_move;

        self.board.move_piece(to, from);
        self.pieces.move_piece(to, from, us);
        let mut mover = self.board.get(from);
        if m.is_promotion() {
            if let Some(kind) = mover.kind().filter(|&kind| kind != PieceKind::Pawn) {
                self.pieces.change_kind(us, kind, PieceKind::Pawn);
                mover = mover.with_kind(PieceKind::Pawn);
            }
        }
        self.board.set(from, mover.with_status(record.mover_status));

        if m.is_castle() {
            let (rook_from, rook_to) = Board::rook_squares_for_castle(m);
            self.board.move_piece(rook_to, rook_from);
            self.board.remove_status(rook_from, PieceStatus::HAS_MOVED);
            self.pieces.move_piece(rook_to, rook_from, us);
        }

        if let Some(victim) = record.captured.kind() {
            let victim_square = captured_square(m);
            self.board.set(victim_square, record.captured);
            self.pieces.add_piece(victim_square, us.opposite(), victim);
        }

        self.en_passant_pawn = record.previous_en_passant;
        if let Some(pawn) = self.en_passant_pawn {
            self.board.add_status(pawn, PieceStatus::EN_PASSANT);
        }
        self.halfmove_clock = record.halfmove_clock;
    }

    /// Turns the pawn on `sq` into `piece`.
    fn promote(&mut self, sq: Square, piece: PieceKind) {
        let pawn = self.board.get(sq);
        if let Some(kind) = pawn.kind() {
            self.pieces.change_kind(pawn.color(), kind, piece);
            self.board.set(sq, pawn.with_kind(piece));
        }
    }

    fn finish_turn(&mut self) {
        if self.side_to_move == Color::Black {
            self.fullmove_number += 1;
        }
        self.side_to_move = self.side_to_move.opposite();
    }

    fn undo_turn(&mut self) {
        self.side_to_move = self.side_to_move.opposite();
        if self.side_to_move == Color::Black {
            self.fullmove_number = self.fullmove_number.saturating_sub(1);
        }
    }
}

/// Square the captured piece stands on.
fn captured_square(m: Move) -> Square {
    if m.is_en_passant() {
        Board::en_passant_captured_square(m)
    } else {
        m.to()
    }
}
