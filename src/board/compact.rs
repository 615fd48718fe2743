use std::fmt;
use std::hash::{Hash, Hasher};

use serde::ser::{Serialize, SerializeStruct, Serializer};

use crate::board::{validate_size, Board, Heuristic};
use crate::chess::piece::{Piece, EMPTY_CODE};
use crate::core::position::{Position, MAX_AREA};
use crate::error::CoverageError;

/// The stored form of a board: occupancy only, plus cached metrics.
///
/// This is what the frontier, the dedup set and every queue carry. Identity is the board size
/// and the occupancy array; `score`, `coverage`, `solved` and `heuristic` are informational and
/// take no part in equality or hashing. A `CompactState` is never edited after creation.
#[derive(Debug, Clone, Copy)]
pub struct CompactState {
    size: u8,
    cells: [u8; MAX_AREA],
    pub score: u32,
    pub coverage: u32,
    pub solved: bool,
    pub heuristic: f32,
}

impl CompactState {
    /// The empty board: the root of every search.
    pub fn empty(size: u8) -> Result<Self, CoverageError> {
        validate_size(size)?;
        Ok(Self {
            size,
            cells: [EMPTY_CODE; MAX_AREA],
            score: 0,
            coverage: 0,
            solved: false,
            heuristic: 0.0,
        })
    }

    /// Wrap raw cell codes without validating them. Metrics are zeroed.
    ///
    /// Codes are only checked by [`CompactState::rebuild`].
    pub fn from_raw(size: u8, cells: [u8; MAX_AREA]) -> Self {
        Self {
            size,
            cells,
            score: 0,
            coverage: 0,
            solved: false,
            heuristic: 0.0,
        }
    }

    #[inline]
    pub fn size(&self) -> u8 {
        self.size
    }

    /// Raw cell codes, indexed by [`Position::index`].
    #[inline]
    pub fn occupancy(&self) -> &[u8; MAX_AREA] {
        &self.cells
    }

    pub fn piece_count(&self) -> usize {
        self.cells.iter().filter(|&&c| c != EMPTY_CODE).count()
    }

    /// Re-inflate into a settled working board.
    pub fn rebuild(&self) -> Result<Board, CoverageError> {
        let mut board = Board::empty(self.size)?;
        for (index, &code) in self.cells.iter().enumerate() {
            let Some(piece) = Piece::from_code(code)? else {
                continue;
            };
            let p = Position::from_index(index);
            if p.row() >= self.size || p.col() >= self.size {
                return Err(CoverageError::OffBoard {
                    position: p,
                    size: self.size,
                });
            }
            board.place(p, piece);
        }
        board.settle_support_graph();
        Ok(board)
    }
}

impl Board {
    /// Deflate a settled board, computing its cached metrics.
    pub fn compact(&self, heuristic: Heuristic) -> CompactState {
        let coverage = self.coverage_level();
        CompactState {
            size: self.size(),
            cells: self.occupancy(),
            score: self.score(),
            coverage,
            solved: coverage as usize == self.area(),
            heuristic: heuristic(self),
        }
    }
}

impl PartialEq for CompactState {
    fn eq(&self, other: &Self) -> bool {
        self.size == other.size && self.cells == other.cells
    }
}

impl Eq for CompactState {}

impl Hash for CompactState {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.size.hash(state);
        self.cells.hash(state);
    }
}

impl fmt::Display for CompactState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&crate::board::render::render_state(self))
    }
}

/// Serialized as symbol rows plus the cached metrics, the same shape the logs show.
impl Serialize for CompactState {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("CompactState", 5)?;
        s.serialize_field("rows", &crate::board::render::state_rows(self))?;
        s.serialize_field("score", &self.score)?;
        s.serialize_field("coverage", &self.coverage)?;
        s.serialize_field("solved", &self.solved)?;
        s.serialize_field("heuristic", &self.heuristic)?;
        s.end()
    }
}
