//! Per-color occupancy index.
//!
//! Move generation walks a dense list of occupied squares per color instead
//! of scanning all 64 board squares. A reverse map gives O(1) removal, and
//! the king's square is cached for check detection.

use chess_core::{Color, PieceKind, Square};

/// Maximum pieces one color can own.
pub const MAX_PIECES: usize = 16;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PieceList {
    squares: [[Square; MAX_PIECES]; 2],
    len: [usize; 2],
    /// Slot of each occupied square in its owner's list.
    slots: [Option<u8>; 64],
    counts: [[u8; 6]; 2],
    kings: [Option<Square>; 2],
}

impl PieceList {
    pub const fn new() -> Self {
        PieceList {
            squares: [[Square::A1; MAX_PIECES]; 2],
            len: [0; 2],
            slots: [None; 64],
            counts: [[0; 6]; 2],
            kings: [None; 2],
        }
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Registers a piece on `sq`.
    ///
    /// # Panics
    ///
    /// Panics if `color` already owns [`MAX_PIECES`] pieces.
    pub fn add_piece(&mut self, sq: Square, color: Color, kind: PieceKind) {
        let c = color.index();
        let slot = self.len[c];
        assert!(slot < MAX_PIECES, "piece list for {color} is full");

        self.squares[c][slot] = sq;
        self.slots[sq.index() as usize] = Some(slot as u8);
        self.len[c] += 1;
        self.counts[c][kind.index()] += 1;
        if kind == PieceKind::King {
            self.kings[c] = Some(sq);
        }
    }

    /// Unregisters the piece on `sq`. The last entry of the list fills the gap.
    pub fn remove_piece(&mut self, sq: Square, color: Color, kind: PieceKind) {
        let c = color.index();
        let Some(slot) = self.slots[sq.index() as usize].take() else {
            debug_assert!(false, "{sq} is not in the {color} piece list");
            return;
        };
        let slot = slot as usize;
        let last = self.len[c] - 1;
        if slot != last {
            let moved = self.squares[c][last];
            self.squares[c][slot] = moved;
            self.slots[moved.index() as usize] = Some(slot as u8);
        }
        self.len[c] = last;
        self.counts[c][kind.index()] -= 1;
        if self.kings[c] == Some(sq) {
            self.kings[c] = None;
        }
    }

    /// Follows a piece from `from` to `to`, keeping its slot.
    pub fn move_piece(&mut self, from: Square, to: Square, color: Color) {
        let c = color.index();
        let Some(slot) = self.slots[from.index() as usize].take() else {
            debug_assert!(false, "{from} is not in the {color} piece list");
            return;
        };
        self.squares[c][slot as usize] = to;
        self.slots[to.index() as usize] = Some(slot);
        if self.kings[c] == Some(from) {
            self.kings[c] = Some(to);
        }
    }

    /// Moves one piece of `color` from the `from` count to the `to` count.
    /// Used when a pawn promotes or a promotion is taken back.
    pub fn change_kind(&mut self, color: Color, from: PieceKind, to: PieceKind) {
        let c = color.index();
        self.counts[c][from.index()] -= 1;
        self.counts[c][to.index()] += 1;
    }

    /// Occupied squares of `color`, in list order.
    #[inline]
    pub fn squares(&self, color: Color) -> &[Square] {
        let c = color.index();
        &self.squares[c][..self.len[c]]
    }

    #[inline]
    pub fn len(&self, color: Color) -> usize {
        self.len[color.index()]
    }

    #[inline]
    pub fn count(&self, color: Color, kind: PieceKind) -> usize {
        self.counts[color.index()][kind.index()] as usize
    }

    #[inline]
    pub fn king_square(&self, color: Color) -> Option<Square> {
        self.kings[color.index()]
    }

    /// List slot of the piece on `sq`, if any.
    #[inline]
    pub fn slot(&self, sq: Square) -> Option<usize> {
        self.slots[sq.index() as usize].map(usize::from)
    }
}

impl Default for PieceList {
    fn default() -> Self {
        Self::new()
    }
}
