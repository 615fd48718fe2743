//! Text rendering of boards for logs: one character per cell (multi-digit counts excepted),
//! one line per row, then a one-line summary.

use std::fmt::Write;

use serde::{Deserialize, Serialize};

use crate::board::{Board, CompactState, Heuristic};
use crate::chess::piece::{Piece, EMPTY_SYMBOL};
use crate::core::position::Position;
use crate::error::CoverageError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RenderMode {
    /// Piece symbols, `_` for empty cells.
    Pieces,
    /// Piece symbols, and the number of covering pieces on empty cells.
    #[default]
    SupportCounts,
}

/// Render a stored state. `SupportCounts` needs the support graph, so the state is rebuilt.
pub fn render(
    state: &CompactState,
    mode: RenderMode,
    heuristic: Heuristic,
) -> Result<String, CoverageError> {
    match mode {
        RenderMode::Pieces => Ok(render_state(state)),
        RenderMode::SupportCounts => Ok(render_board(&state.rebuild()?, heuristic)),
    }
}

/// Piece-symbol rows of a stored state, `?` for codes that do not decode.
pub fn state_rows(state: &CompactState) -> Vec<String> {
    (0..state.size())
        .map(|row| {
            (0..state.size())
                .map(|col| {
                    let code = state.occupancy()[Position::new(row, col).index()];
                    match Piece::from_code(code) {
                        Ok(Some(piece)) => piece.symbol(),
                        Ok(None) => EMPTY_SYMBOL,
                        Err(_) => '?',
                    }
                })
                .collect()
        })
        .collect()
}

/// Render a stored state from its occupancy and cached metrics.
pub fn render_state(state: &CompactState) -> String {
    let mut out = String::new();
    for row in state_rows(state) {
        out.push_str(&row);
        out.push('\n');
    }
    push_summary(
        &mut out,
        state.score,
        state.heuristic,
        state.solved,
        state.coverage,
    );
    out
}

/// Render a settled working board with support counts on empty cells.
pub fn render_board(board: &Board, heuristic: Heuristic) -> String {
    let mut out = String::new();
    for row in 0..board.size() {
        for col in 0..board.size() {
            let cell = board.cell(Position::new(row, col));
            match cell.piece {
                Some(piece) => out.push(piece.symbol()),
                None => {
                    let _ = write!(out, "{}", cell.supported_by.len());
                }
            }
        }
        out.push('\n');
    }
    push_summary(
        &mut out,
        board.score(),
        heuristic(board),
        board.is_solved(),
        board.coverage_level(),
    );
    out
}

fn push_summary(out: &mut String, score: u32, heuristic: f32, solved: bool, coverage: u32) {
    let _ = write!(
        out,
        "Score: {score}\tHeuristic: {heuristic:.6}\tSolved: {solved}\tCoverage: {coverage}"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn zero(_: &Board) -> f32 {
        0.0
    }

    #[test]
    fn pieces_mode_draws_symbols_and_summary() {
        let board = Board::from_rows(&["Q_", "_P"]).unwrap();
        let text = render_state(&board.compact(zero));
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("Q_"));
        assert_eq!(lines.next(), Some("_P"));
        assert_eq!(
            lines.next(),
            Some("Score: 10\tHeuristic: 0.000000\tSolved: false\tCoverage: 3")
        );
    }

    #[test]
    fn support_counts_mode_draws_coverage() {
        let board = Board::from_rows(&["R__", "___", "__R"]).unwrap();
        let text = render_board(&board, zero);
        let rows: Vec<&str> = text.lines().take(3).collect();
        assert_eq!(rows, vec!["R12", "101", "21R"]);
    }
}
