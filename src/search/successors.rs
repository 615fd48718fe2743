//! Successor generation: propose every coverage-improving placement, then strip pieces that
//! became redundant.

use rustc_hash::FxHashSet;

use crate::board::{Board, CompactState, Heuristic};
use crate::chess::coverage::all_coverage;
use crate::core::position::{Position, MAX_AREA};

/// All states one placement away from `board` that cover at least one new cell, reduced to
/// redundancy-free form. Duplicate occupancies collapse.
pub fn propose(board: &Board, heuristic: Heuristic) -> FxHashSet<CompactState> {
    debug_assert!(board.is_settled());
    let mut out = FxHashSet::default();
    for at in Position::all(board.size()) {
        if board.is_occupied(at) {
            continue;
        }
        for (piece, covered) in all_coverage(board, at) {
            let covers_new = covered
                .iter()
                .any(|p| board.cell(p).supported_by.is_empty());
            if !covers_new {
                continue;
            }
            let mut candidate = board.clone();
            candidate.place(at, piece);
            candidate.settle_support_graph();
            for reduced in reduce(&candidate) {
                out.insert(reduced.compact(heuristic));
            }
        }
    }
    out
}

/// Pieces whose every covered cell is also covered by some other piece.
pub fn removable_pieces(board: &Board) -> impl Iterator<Item = Position> + '_ {
    debug_assert!(board.is_settled());
    board.pieces().filter_map(move |(at, _)| {
        let sole_cover = board
            .cell(at)
            .supports
            .iter()
            .any(|p| board.cell(p).supported_by.len() == 1);
        (!sole_cover).then_some(at)
    })
}

/// Every locally minimal board reachable from `board` by removing redundant pieces.
///
/// Each intermediate board tries every removable piece, so all removal orders are followed;
/// a board already reached through another order is not expanded twice. A board with nothing
/// removable is its own only result. Removing a piece never uncovers a cell (it can only
/// unblock rays), so every result covers at least what `board` covered.
///
/// Uses an explicit worklist; the removal depth is bounded by the board area.
pub fn reduce(board: &Board) -> Vec<Board> {
    let mut results = Vec::new();
    let mut visited: FxHashSet<[u8; MAX_AREA]> = FxHashSet::default();
    visited.insert(board.occupancy());
    let mut stack = vec![board.clone()];

    while let Some(current) = stack.pop() {
        let removable: Vec<Position> = removable_pieces(&current).collect();
        if removable.is_empty() {
            results.push(current);
            continue;
        }
        for at in removable {
            let mut next = current.clone();
            next.remove(at);
            next.settle_support_graph();
            if visited.insert(next.occupancy()) {
                stack.push(next);
            }
        }
    }
    results
}
