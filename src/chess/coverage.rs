//! Coverage rules: which squares a piece threatens from a cell, given the current occupancy.
//!
//! Pawns and knights are pure leapers clipped to the board. Sliding pieces walk each ray until
//! the board edge or the first occupied cell; that blocker is covered, and the ray stops there.
//! A piece never covers its own cell.

use crate::board::Board;
use crate::chess::piece::{Piece, KNIGHT_DELTAS, PAWN_DELTAS};
use crate::core::offset::Offset;
use crate::core::position::Position;
use crate::core::position_set::PositionSet;

/// Squares covered by `piece` standing on `from`.
pub fn coverage(board: &Board, from: Position, piece: Piece) -> PositionSet {
    match piece {
        Piece::Pawn => leaper_coverage(from, &PAWN_DELTAS, board.size()),
        Piece::Knight => leaper_coverage(from, &KNIGHT_DELTAS, board.size()),
        Piece::Bishop | Piece::Rook | Piece::Queen => {
            sliding_coverage(board, from, piece.slide_dirs())
        }
    }
}

/// Coverage of every piece type on `from`, in [`Piece::ALL`] order.
pub fn all_coverage(board: &Board, from: Position) -> [(Piece, PositionSet); 5] {
    Piece::ALL.map(|piece| (piece, coverage(board, from, piece)))
}

fn leaper_coverage(from: Position, deltas: &[Offset], size: u8) -> PositionSet {
    deltas
        .iter()
        .filter_map(|&delta| from.offset(delta, size))
        .collect()
}

fn sliding_coverage(board: &Board, from: Position, dirs: &[Offset]) -> PositionSet {
    let mut out = PositionSet::new();
    for &dir in dirs {
        let mut cur = from;
        for _ in 0..steps_to_edge(from, dir, board.size()) {
            cur = cur.offset_unchecked(dir);
            out.insert(cur);
            if board.is_occupied(cur) {
                break;
            }
        }
    }
    out
}

/// How many unit steps along `dir` stay on a `size × size` board.
#[inline]
fn steps_to_edge(from: Position, dir: Offset, size: u8) -> u8 {
    let room = |v: u8, d: i8| match d.signum() {
        1 => size - 1 - v,
        -1 => v,
        _ => u8::MAX,
    };
    room(from.row(), dir.dr).min(room(from.col(), dir.dc))
}
