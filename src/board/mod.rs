//! The working board: a grid of cells plus the derived support graph.
//!
//! A [`Board`] is owned by exactly one mutator at a time (a worker expanding a state, or the
//! reporter rendering one). After [`Board::place`] / [`Board::remove`] the board is *unsettled*
//! until [`Board::settle_support_graph`] recomputes every link from scratch; links are never
//! patched incrementally.

pub mod compact;
pub mod render;

use crate::chess::coverage::coverage;
use crate::chess::piece::{Piece, EMPTY_CODE};
use crate::core::position::{Position, MAX_AREA, MAX_BOARD_SIZE};
use crate::core::position_set::PositionSet;
use crate::error::CoverageError;

pub use compact::CompactState;
pub use render::RenderMode;

/// Scores a settled board for frontier ordering; higher is more promising.
pub type Heuristic = fn(&Board) -> f32;

/// One square of a working board.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cell {
    pub piece: Option<Piece>,
    /// Cells this cell's piece covers.
    pub supports: PositionSet,
    /// Pieces covering this cell.
    pub supported_by: PositionSet,
}

impl Cell {
    #[inline]
    fn clear_support(&mut self) {
        self.supports.clear();
        self.supported_by.clear();
    }
}

#[derive(Debug, Clone)]
pub struct Board {
    size: u8,
    cells: [Cell; MAX_AREA],
    settled: bool,
}

impl Board {
    /// An empty `size × size` board. An empty board is trivially settled.
    pub fn empty(size: u8) -> Result<Self, CoverageError> {
        validate_size(size)?;
        Ok(Self {
            size,
            cells: [Cell::default(); MAX_AREA],
            settled: true,
        })
    }

    /// Parse a board from rows of piece symbols (`_` or `.` for empty), then settle it.
    ///
    /// The number of rows fixes the board size; every row must be that long.
    pub fn from_rows(rows: &[&str]) -> Result<Self, CoverageError> {
        let size = u8::try_from(rows.len()).map_err(|_| CoverageError::InvalidConfig {
            reason: format!("{} rows is not a valid board size", rows.len()),
        })?;
        let mut board = Board::empty(size)?;
        for (row, line) in rows.iter().enumerate() {
            let symbols: Vec<char> = line.chars().filter(|c| !c.is_whitespace()).collect();
            if symbols.len() != size as usize {
                return Err(CoverageError::InvalidConfig {
                    reason: format!(
                        "row {row} has {} cells, expected {size}",
                        symbols.len()
                    ),
                });
            }
            for (col, &symbol) in symbols.iter().enumerate() {
                if let Some(piece) = Piece::from_symbol(symbol)? {
                    board.place(Position::new(row as u8, col as u8), piece);
                }
            }
        }
        board.settle_support_graph();
        Ok(board)
    }

    #[inline]
    pub fn size(&self) -> u8 {
        self.size
    }

    /// Number of cells on the board (`size²`).
    #[inline]
    pub fn area(&self) -> usize {
        self.size as usize * self.size as usize
    }

    #[inline]
    pub fn is_settled(&self) -> bool {
        self.settled
    }

    #[inline]
    pub fn cell(&self, p: Position) -> &Cell {
        &self.cells[p.index()]
    }

    #[inline]
    pub fn piece_at(&self, p: Position) -> Option<Piece> {
        self.cells[p.index()].piece
    }

    #[inline]
    pub fn is_occupied(&self, p: Position) -> bool {
        self.cells[p.index()].piece.is_some()
    }

    /// Put `piece` on `p`. Leaves the board unsettled.
    #[inline]
    pub fn place(&mut self, p: Position, piece: Piece) {
        self.cells[p.index()].piece = Some(piece);
        self.settled = false;
    }

    /// Clear `p`, returning what stood there. Leaves the board unsettled.
    #[inline]
    pub fn remove(&mut self, p: Position) -> Option<Piece> {
        self.settled = false;
        self.cells[p.index()].piece.take()
    }

    /// Raw cell codes, indexed by [`Position::index`].
    pub fn occupancy(&self) -> [u8; MAX_AREA] {
        self.cells.map(|c| c.piece.map_or(EMPTY_CODE, Piece::code))
    }

    /// Occupied cells in row-major order.
    pub fn pieces(&self) -> impl Iterator<Item = (Position, Piece)> + '_ {
        Position::all(self.size).filter_map(move |p| self.piece_at(p).map(|piece| (p, piece)))
    }

    /// Recompute the whole support graph from the current occupancy.
    ///
    /// Cost is proportional to (occupied cells × average coverage); this is where expansion
    /// spends most of its time.
    pub fn settle_support_graph(&mut self) {
        for cell in self.cells.iter_mut() {
            cell.clear_support();
        }
        for from in Position::all(self.size) {
            let Some(piece) = self.cells[from.index()].piece else {
                continue;
            };
            let covered = coverage(self, from, piece);
            self.cells[from.index()].supports = covered;
            for p in covered {
                self.cells[p.index()].supported_by.insert(from);
            }
        }
        self.settled = true;
    }

    /// Number of cells covered by at least one piece.
    pub fn coverage_level(&self) -> u32 {
        debug_assert!(self.settled, "coverage level read from an unsettled board");
        self.cells
            .iter()
            .filter(|c| !c.supported_by.is_empty())
            .count() as u32
    }

    /// Sum of material values of every piece on the board.
    pub fn score(&self) -> u32 {
        self.cells
            .iter()
            .filter_map(|c| c.piece)
            .map(Piece::score)
            .sum()
    }

    #[inline]
    pub fn is_solved(&self) -> bool {
        self.coverage_level() as usize == self.area()
    }
}

impl PartialEq for Board {
    /// Boards compare by size and occupancy; the support graph is derived.
    fn eq(&self, other: &Self) -> bool {
        self.size == other.size
            && self
                .cells
                .iter()
                .zip(other.cells.iter())
                .all(|(a, b)| a.piece == b.piece)
    }
}

impl Eq for Board {}

pub(crate) fn validate_size(size: u8) -> Result<(), CoverageError> {
    if size == 0 || size as usize > MAX_BOARD_SIZE {
        return Err(CoverageError::InvalidConfig {
            reason: format!("board size must be in 1..={MAX_BOARD_SIZE}, got {size}"),
        });
    }
    Ok(())
}
