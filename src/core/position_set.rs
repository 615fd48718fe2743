use std::fmt;

use crate::core::position::{Position, MAX_AREA};

const _: () = assert!(MAX_AREA <= 64, "PositionSet packs one bit per cell into a u64");

/// A set of board positions, one bit per cell.
///
/// Membership, insertion and removal are O(1); iteration yields positions in ascending
/// (row-major) order.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct PositionSet {
    bits: u64,
}

impl PositionSet {
    pub const EMPTY: PositionSet = PositionSet { bits: 0 };

    #[inline]
    pub const fn new() -> Self {
        Self::EMPTY
    }

    /// Inserts `p`, returning `true` if it was not already present.
    #[inline]
    pub fn insert(&mut self, p: Position) -> bool {
        let mask = 1u64 << p.index();
        let fresh = self.bits & mask == 0;
        self.bits |= mask;
        fresh
    }

    #[inline]
    pub fn remove(&mut self, p: Position) -> bool {
        let mask = 1u64 << p.index();
        let present = self.bits & mask != 0;
        self.bits &= !mask;
        present
    }

    #[inline]
    pub fn contains(&self, p: Position) -> bool {
        (self.bits >> p.index()) & 1 == 1
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.bits.count_ones() as usize
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bits == 0
    }

    #[inline]
    pub fn clear(&mut self) {
        self.bits = 0;
    }

    #[inline]
    pub fn union(self, other: PositionSet) -> PositionSet {
        PositionSet {
            bits: self.bits | other.bits,
        }
    }

    /// The only element, if the set holds exactly one position.
    #[inline]
    pub fn single(&self) -> Option<Position> {
        if self.bits.count_ones() == 1 {
            Some(Position::from_index(self.bits.trailing_zeros() as usize))
        } else {
            None
        }
    }

    #[inline]
    pub fn iter(&self) -> Iter {
        Iter { bits: self.bits }
    }
}

pub struct Iter {
    bits: u64,
}

impl Iterator for Iter {
    type Item = Position;

    #[inline]
    fn next(&mut self) -> Option<Position> {
        if self.bits == 0 {
            return None;
        }
        let index = self.bits.trailing_zeros() as usize;
        self.bits &= self.bits - 1;
        Some(Position::from_index(index))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.bits.count_ones() as usize;
        (n, Some(n))
    }
}

impl ExactSizeIterator for Iter {}

impl IntoIterator for PositionSet {
    type Item = Position;
    type IntoIter = Iter;

    fn into_iter(self) -> Iter {
        self.iter()
    }
}

impl<'a> IntoIterator for &'a PositionSet {
    type Item = Position;
    type IntoIter = Iter;

    fn into_iter(self) -> Iter {
        self.iter()
    }
}

impl FromIterator<Position> for PositionSet {
    fn from_iter<I: IntoIterator<Item = Position>>(iter: I) -> Self {
        let mut set = PositionSet::new();
        set.extend(iter);
        set
    }
}

impl Extend<Position> for PositionSet {
    fn extend<I: IntoIterator<Item = Position>>(&mut self, iter: I) {
        for p in iter {
            self.insert(p);
        }
    }
}

impl fmt::Debug for PositionSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}
