//! Undo/redo stack of played moves.

use chess_core::{Move, Piece, PieceKind, PieceStatus, Square};

/// Everything needed to take one move back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveHistoryRecord {
    pub mv: Move,
    /// Status of the moving piece before the move.
    pub mover_status: PieceStatus,
    /// Captured piece, or [`Piece::EMPTY`].
    pub captured: Piece,
    /// Pawn that was en passant capturable before the move.
    pub previous_en_passant: Option<Square>,
    pub halfmove_clock: u32,
}

/// Played moves below a cursor, redoable moves above it.
///
/// Pushing the move that is next in line for redo keeps the rest of the
/// forward history. Pushing any other move discards it.
#[derive(Debug, Clone, Default)]
pub struct MoveHistory {
    records: Vec<MoveHistoryRecord>,
    cursor: usize,
}

impl MoveHistory {
    /// Maximum number of played moves.
    pub const MAX_RECORDS: usize = 1000;

    pub fn new() -> Self {
        Self::default()
    }

    /// # Panics
    ///
    /// Panics once [`MoveHistory::MAX_RECORDS`] moves have been played.
    pub fn push(&mut self, record: MoveHistoryRecord) {
        assert!(
            self.cursor < Self::MAX_RECORDS,
            "move history is full ({} moves)",
            Self::MAX_RECORDS
        );

        match self.records.get_mut(self.cursor) {
            Some(next) if next.mv == record.mv => *next = record,
            _ => {
                self.records.truncate(self.cursor);
                self.records.push(record);
            }
        }
        self.cursor += 1;
    }

    /// Steps back over the last played move. It stays available for redo.
    pub fn pop(&mut self) -> Option<MoveHistoryRecord> {
        self.cursor = self.cursor.checked_sub(1)?;
        Some(self.records[self.cursor])
    }

    /// Most recently played move.
    pub fn last(&self) -> Option<&MoveHistoryRecord> {
        self.played().last()
    }

    /// Next move in line for redo.
    pub fn next(&self) -> Option<&MoveHistoryRecord> {
        self.records.get(self.cursor)
    }

    /// Rewrites the last played move as a promotion to `piece`.
    pub fn amend_last_promotion(&mut self, piece: PieceKind) {
        if let Some(record) = self
            .cursor
            .checked_sub(1)
            .and_then(|i| self.records.get_mut(i))
        {
            record.mv = record.mv.with_promotion(piece);
        }
    }

    pub fn clear(&mut self) {
        self.records.clear();
        self.cursor = 0;
    }

    /// Records up to the cursor, oldest first.
    pub fn played(&self) -> &[MoveHistoryRecord] {
        &self.records[..self.cursor]
    }

    /// Number of played moves.
    pub fn len(&self) -> usize {
        self.cursor
    }

    pub fn is_empty(&self) -> bool {
        self.cursor == 0
    }

    /// Number of moves available for redo.
    pub fn redo_len(&self) -> usize {
        self.records.len() - self.cursor
    }

    /// Played moves, oldest first.
    pub fn moves(&self) -> impl Iterator<Item = Move> + '_ {
        self.played().iter().map(|record| record.mv)
    }
}
