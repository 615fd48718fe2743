use std::fmt;

use crate::core::offset::Offset;

/// Largest supported board dimension.
///
/// Positions are packed with this fixed stride regardless of the configured board size, so a
/// `Position` means the same cell on every board and fits into a single `u8`.
pub const MAX_BOARD_SIZE: usize = 8;

/// Number of addressable cells (`MAX_BOARD_SIZE²`).
pub const MAX_AREA: usize = MAX_BOARD_SIZE * MAX_BOARD_SIZE;

const STRIDE: u8 = MAX_BOARD_SIZE as u8;

/// A board cell packed row-major into a single byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position(u8);

impl Position {
    /// Build a position without checking it against a board size.
    ///
    /// Intended for iteration over cells that are already known to be in range.
    #[inline]
    pub const fn new(row: u8, col: u8) -> Self {
        debug_assert!(row < STRIDE && col < STRIDE);
        Position(row * STRIDE + col)
    }

    /// Build a position, returning `None` when `(row, col)` is outside a `size × size` board.
    #[inline]
    pub fn checked(row: i16, col: i16, size: u8) -> Option<Self> {
        let size = size as i16;
        if row < 0 || row >= size || col < 0 || col >= size {
            return None;
        }
        Some(Position::new(row as u8, col as u8))
    }

    #[inline]
    pub const fn from_index(index: usize) -> Self {
        debug_assert!(index < MAX_AREA);
        Position(index as u8)
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    #[inline]
    pub const fn row(self) -> u8 {
        self.0 / STRIDE
    }

    #[inline]
    pub const fn col(self) -> u8 {
        self.0 % STRIDE
    }

    /// Step by `offset`, clipped to a `size × size` board.
    #[inline]
    pub fn offset(self, offset: Offset, size: u8) -> Option<Position> {
        Position::checked(
            self.row() as i16 + offset.dr as i16,
            self.col() as i16 + offset.dc as i16,
            size,
        )
    }

    /// Step by `offset` without bounds checking.
    ///
    /// The caller must already know the destination is on the board; stepping off the edge
    /// produces a position on a different row (or an out-of-range index).
    #[inline]
    pub fn offset_unchecked(self, offset: Offset) -> Position {
        Position((self.0 as i16 + offset.linear(STRIDE as i16)) as u8)
    }

    /// All cells of a `size × size` board, in row-major order.
    pub fn all(size: u8) -> impl Iterator<Item = Position> {
        (0..size).flat_map(move |row| (0..size).map(move |col| Position::new(row, col)))
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row(), self.col())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn packs_row_major_with_fixed_stride() {
        let p = Position::new(2, 5);
        assert_eq!(p.index(), 2 * MAX_BOARD_SIZE + 5);
        assert_eq!((p.row(), p.col()), (2, 5));
        assert_eq!(Position::from_index(p.index()), p);
    }

    #[test]
    fn checked_offsets_clip_to_board_size() {
        let corner = Position::new(0, 0);
        assert_eq!(corner.offset(Offset::new(-1, 0), 8), None);
        assert_eq!(corner.offset(Offset::new(0, -1), 8), None);
        assert_eq!(corner.offset(Offset::new(2, 1), 8), Some(Position::new(2, 1)));

        let edge = Position::new(2, 2);
        assert_eq!(edge.offset(Offset::new(1, 0), 3), None);
        assert_eq!(edge.offset(Offset::new(1, 0), 4), Some(Position::new(3, 2)));
    }

    #[test]
    fn unchecked_offset_matches_checked_in_range() {
        let p = Position::new(4, 4);
        for (dr, dc) in [(1, 2), (-2, 1), (-1, -1), (3, -4)] {
            let step = Offset::new(dr, dc);
            assert_eq!(Some(p.offset_unchecked(step)), p.offset(step, 8));
        }
    }

    #[test]
    fn all_covers_exactly_the_board() {
        assert_eq!(Position::all(3).count(), 9);
        assert!(Position::all(3).all(|p| p.row() < 3 && p.col() < 3));
        assert_eq!(Position::all(8).count(), MAX_AREA);
    }
}
