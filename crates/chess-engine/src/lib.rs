//! Mailbox chess rules engine.
//!
//! This crate provides:
//! - [`Board`] - 64-square piece storage with 10×12 padded direction arithmetic
//! - [`PieceList`] - per-color occupancy index with a cached king square
//! - [`ChessBoardIndex`] - full game state: legal moves, promotion choice,
//!   undo/redo history and end-of-game detection
//! - Pseudo-legal move generation and attack detection in [`movegen`]
//! - [`perft`] node counting for validating the generator
//!
//! # Architecture
//!
//! Moves are generated pseudo-legally from the piece lists, then each
//! candidate is played on the board and taken back to check that the
//! mover's king is not left attacked. Nothing is cloned along the way.
//!
//! # Example
//!
//! ```
//! use chess_engine::{ChessBoardIndex, GameResult};
//!
//! let mut index = ChessBoardIndex::new();
//! println!("Legal moves from starting position: {}", index.legal_moves().len());
//!
//! for uci in ["f2f3", "e7e5", "g2g4"] {
//!     let m = index.find_move_uci(uci).unwrap();
//!     index.make_move(m, false).unwrap();
//! }
//! let mate = index.find_move_uci("d8h4").unwrap();
//! assert_eq!(index.make_move(mate, false).unwrap(), Some(GameResult::BlackWins));
//! ```

mod board_index;
mod history;
mod mailbox;
pub mod movegen;
mod piece_list;
pub mod rules;

pub use board_index::{BoardState, ChessBoardIndex, EngineError};
pub use history::{MoveHistory, MoveHistoryRecord};
pub use mailbox::{pawn_forward, Board, EAST, NORTH, SOUTH, WEST};
pub use movegen::perft::{perft, perft_divide};
pub use movegen::{generate_pseudo_legal_moves, is_king_attacked, square_is_attacked, MoveList};
pub use piece_list::{PieceList, MAX_PIECES};
pub use rules::{DrawReason, GameResult};
