//! FEN import and export.

use super::{BoardState, ChessBoardIndex, EngineError};
use crate::mailbox::{pawn_forward, Board};
use crate::piece_list::MAX_PIECES;
use chess_core::{
    CastlingRights, Color, FenError, FenParser, File, Piece, PieceKind, PieceStatus, Square,
};

impl ChessBoardIndex {
    /// Replaces the whole game with the position described by `fen`.
    ///
    /// History is cleared. Castling rights become "has moved" marks on kings
    /// and rooks, and the en passant target marks the pawn that just double
    /// pushed. On error the game is left untouched.
    pub fn load_position(&mut self, fen: &str) -> Result<(), EngineError> {
        let parsed = FenParser::parse(fen)?;

        for color in Color::BOTH {
            let count = parsed.pieces().filter(|&(_, _, c)| c == color).count();
            if count > MAX_PIECES {
                return Err(FenError::InvalidPiecePlacement(format!(
                    "{color} has {count} pieces, at most {MAX_PIECES} allowed"
                ))
                .into());
            }
        }

        self.board = Board::empty();
        self.pieces.reset();
        self.history.clear();
        self.state = BoardState::Idle;
        self.en_passant_pawn = None;

        for (sq, kind, color) in parsed.pieces() {
            self.board.set(sq, Piece::new(kind, color, PieceStatus::NONE));
            self.pieces.add_piece(sq, color, kind);
        }

        self.side_to_move = parsed.side_to_move;
        self.halfmove_clock = parsed.halfmove_clock;
        self.fullmove_number = parsed.fullmove_number;

        self.mark_castling_rights(parsed.castling);
        if let Some(target) = parsed.en_passant {
            self.mark_en_passant(target);
        }

        self.refresh_legal_moves();
        tracing::debug!(
            fen,
            side = %self.side_to_move,
            legal_moves = self.legal_moves.len(),
            "position loaded"
        );
        Ok(())
    }

    fn mark_castling_rights(&mut self, rights: CastlingRights) {
        for color in Color::BOTH {
            let rank = color.back_rank();
            let kingside = rights.can_castle_kingside(color);
            let queenside = rights.can_castle_queenside(color);

            if !kingside {
                self.board
                    .add_status(Square::new(File::H, rank), PieceStatus::HAS_MOVED);
            }
            if !queenside {
                self.board
                    .add_status(Square::new(File::A, rank), PieceStatus::HAS_MOVED);
            }

            let home = Square::new(File::E, rank);
            if let Some(king) = self.pieces.king_square(color) {
                if king != home || !(kingside || queenside) {
                    self.board.add_status(king, PieceStatus::HAS_MOVED);
                }
            }
        }
    }

    /// Flags the pawn that passed over `target`, if it is really there.
    fn mark_en_passant(&mut self, target: Square) {
        let mover = self.side_to_move.opposite();
        let Some(pawn) = Board::offset_square(target, pawn_forward(mover)) else {
            return;
        };
        if self.board.get(pawn).is(PieceKind::Pawn, mover) {
            self.board.add_status(pawn, PieceStatus::EN_PASSANT);
            self.en_passant_pawn = Some(pawn);
        }
    }

    /// Castling rights read back from the board: an unmoved king on its home
    /// square and an unmoved rook of its color in the corner.
    pub fn castling_rights(&self) -> CastlingRights {
        let mut flags = 0;
        for color in Color::BOTH {
            let rank = color.back_rank();
            let king = self.board.get(Square::new(File::E, rank));
            if !king.is(PieceKind::King, color) || king.has_moved() {
                continue;
            }
            let unmoved_rook = |file: File| {
                let rook = self.board.get(Square::new(file, rank));
                rook.is(PieceKind::Rook, color) && !rook.has_moved()
            };
            let (kingside, queenside) = match color {
                Color::White => (
                    CastlingRights::WHITE_KINGSIDE,
                    CastlingRights::WHITE_QUEENSIDE,
                ),
                Color::Black => (
                    CastlingRights::BLACK_KINGSIDE,
                    CastlingRights::BLACK_QUEENSIDE,
                ),
            };
            if unmoved_rook(File::H) {
                flags |= kingside;
            }
            if unmoved_rook(File::A) {
                flags |= queenside;
            }
        }
        CastlingRights::new(flags)
    }

    /// Exports the current position as FEN.
    ///
    /// The en passant field names the square behind a pawn that just double
    /// pushed, whether or not a capture is possible.
    pub fn to_fen(&self) -> String {
        let mut fen = String::new();

        for rank in (0..8u8).rev() {
            let mut empty = 0;
            for file in 0..8u8 {
                let piece = Square::from_index(rank * 8 + file)
                    .map(|sq| self.board.get(sq))
                    .unwrap_or(Piece::EMPTY);
                match piece.to_fen_char() {
                    Some(c) => {
                        if empty > 0 {
                            fen.push_str(&empty.to_string());
                            empty = 0;
                        }
                        fen.push(c);
                    }
                    None => empty += 1,
                }
            }
            if empty > 0 {
                fen.push_str(&empty.to_string());
            }
            if rank > 0 {
                fen.push('/');
            }
        }

        let en_passant = self
            .en_passant_pawn
            .and_then(|pawn| {
                let owner = self.board.get(pawn).color();
                Board::offset_square(pawn, -pawn_forward(owner))
            })
            .map_or_else(|| "-".to_string(), |sq| sq.to_algebraic());

        format!(
            "{} {} {} {} {} {}",
            fen,
            self.side_to_move.to_fen_char(),
            self.castling_rights().to_fen(),
            en_passant,
            self.halfmove_clock,
            self.fullmove_number
        )
    }
}
