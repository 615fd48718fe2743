use std::ops::{Add, Neg};

/// A signed step on the board, in rows and columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Offset {
    pub dr: i8,
    pub dc: i8,
}

impl Offset {
    pub const ZERO: Offset = Offset { dr: 0, dc: 0 };

    #[inline]
    pub const fn new(dr: i8, dc: i8) -> Self {
        Self { dr, dc }
    }

    /// Row-major index delta for a board laid out with `stride` cells per row.
    #[inline]
    pub const fn linear(self, stride: i16) -> i16 {
        self.dr as i16 * stride + self.dc as i16
    }
}

impl Add for Offset {
    type Output = Offset;

    #[inline]
    fn add(self, rhs: Offset) -> Self::Output {
        Offset::new(self.dr + rhs.dr, self.dc + rhs.dc)
    }
}

impl Neg for Offset {
    type Output = Offset;

    #[inline]
    fn neg(self) -> Self::Output {
        Offset::new(-self.dr, -self.dc)
    }
}
