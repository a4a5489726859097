//! Perft (performance test) for move generator validation.
//!
//! Perft counts the number of leaf nodes at a given depth, which can be
//! compared against known-correct values to validate the move generator.
//! The walk plays and takes back moves in place and never touches the
//! game history, so undo/redo state survives a perft run.

use crate::{BoardState, ChessBoardIndex};

/// Counts the number of leaf nodes at the given depth.
///
/// The legal move set of `index` is regenerated before returning. A game
/// waiting for a promotion choice has nothing to count and yields 0.
pub fn perft(index: &mut ChessBoardIndex, depth: u32) -> u64 {
    if index.state() != BoardState::Idle {
        return 0;
    }
    let nodes = count_nodes(index, depth);
    index.refresh_legal_moves();
    nodes
}

fn count_nodes(index: &mut ChessBoardIndex, depth: u32) -> u64 {
    if depth == 0 {
        return 1;
    }

    let moves = index.legal_moves().clone();

    if depth == 1 {
        return moves.len() as u64;
    }

    let mut nodes = 0u64;
    for &m in &moves {
        let record = index.history_record(m);
        index.apply_move(m, false);
        index.refresh_legal_moves();
        nodes += count_nodes(index, depth - 1);
        index.revert_move(&record, true);
    }
    nodes
}

/// Perft with divide - node count below each root move, sorted by UCI text.
/// Useful for debugging to identify which moves have incorrect counts.
///
/// Empty while a promotion choice is pending.
pub fn perft_divide(index: &mut ChessBoardIndex, depth: u32) -> Vec<(String, u64)> {
    if index.state() != BoardState::Idle {
        return Vec::new();
    }
    let moves = index.legal_moves().clone();
    let mut results = Vec::with_capacity(moves.len());

    for &m in &moves {
        let nodes = if depth > 1 {
            let record = index.history_record(m);
            index.apply_move(m, false);
            index.refresh_legal_moves();
            let nodes = count_nodes(index, depth - 1);
            index.revert_move(&record, true);
            nodes
        } else {
            1
        };
        results.push((m.to_uci(), nodes));
    }

    index.refresh_legal_moves();
    results.sort_by(|a, b| a.0.cmp(&b.0));
    results
}
