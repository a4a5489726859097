//! Core types for chess.
//!
//! This crate provides the value types shared by the engine and its front ends:
//! - [`PieceKind`], [`PieceStatus`] and the packed board [`Piece`]
//! - [`Color`]
//! - [`Square`], [`File`], and [`Rank`] for board coordinates
//! - [`Move`] and [`MoveKind`], a 16-bit move encoding
//! - FEN parsing

mod color;
mod fen;
mod mov;
mod piece;
mod square;

pub use color::Color;
pub use fen::{CastlingRights, FenError, FenParser};
pub use mov::{Move, MoveKind};
pub use piece::{Piece, PieceKind, PieceStatus};
pub use square::{File, Rank, Square};
