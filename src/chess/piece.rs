use crate::core::offset::Offset;
use crate::error::CoverageError;

/// Raw cell code for an empty square.
pub const EMPTY_CODE: u8 = 0;

/// Symbol used for an empty square in the compact text form.
pub const EMPTY_SYMBOL: char = '_';

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum Piece {
    Pawn = 1,
    Knight = 2,
    Bishop = 3,
    Rook = 4,
    Queen = 5,
}

impl Piece {
    /// Every placeable piece, in code order.
    pub const ALL: [Piece; 5] = [
        Piece::Pawn,
        Piece::Knight,
        Piece::Bishop,
        Piece::Rook,
        Piece::Queen,
    ];

    /// Material value used as the cost of a placement.
    #[inline]
    pub const fn score(self) -> u32 {
        match self {
            Piece::Pawn => 1,
            Piece::Knight => 3,
            Piece::Bishop => 3,
            Piece::Rook => 5,
            Piece::Queen => 9,
        }
    }

    #[inline]
    pub const fn code(self) -> u8 {
        self as u8
    }

    #[inline]
    pub const fn symbol(self) -> char {
        match self {
            Piece::Pawn => 'P',
            Piece::Knight => 'K',
            Piece::Bishop => 'B',
            Piece::Rook => 'R',
            Piece::Queen => 'Q',
        }
    }

    /// Decode a raw cell code. `EMPTY_CODE` decodes to `None`.
    pub fn from_code(code: u8) -> Result<Option<Piece>, CoverageError> {
        match code {
            EMPTY_CODE => Ok(None),
            1 => Ok(Some(Piece::Pawn)),
            2 => Ok(Some(Piece::Knight)),
            3 => Ok(Some(Piece::Bishop)),
            4 => Ok(Some(Piece::Rook)),
            5 => Ok(Some(Piece::Queen)),
            _ => Err(CoverageError::UnknownPiece { code }),
        }
    }

    /// Decode a symbol of the compact text form. `_` and `.` are empty squares.
    pub fn from_symbol(symbol: char) -> Result<Option<Piece>, CoverageError> {
        match symbol {
            EMPTY_SYMBOL | '.' => Ok(None),
            'P' => Ok(Some(Piece::Pawn)),
            'K' | 'N' => Ok(Some(Piece::Knight)),
            'B' => Ok(Some(Piece::Bishop)),
            'R' => Ok(Some(Piece::Rook)),
            'Q' => Ok(Some(Piece::Queen)),
            _ => Err(CoverageError::UnknownSymbol { symbol }),
        }
    }

    /// Unit directions for sliding pieces.
    #[inline]
    pub fn slide_dirs(self) -> &'static [Offset] {
        use Piece::*;
        match self {
            Queen => &QUEEN_DIRS,
            Rook => &ROOK_DIRS,
            Bishop => &BISHOP_DIRS,
            _ => &[],
        }
    }
}

/// Pawns cover forwards (towards higher rows) on both diagonals.
pub const PAWN_DELTAS: [Offset; 2] = [Offset { dr: 1, dc: 1 }, Offset { dr: 1, dc: -1 }];

pub const ROOK_DIRS: [Offset; 4] = [
    Offset { dr: 1, dc: 0 },
    Offset { dr: 0, dc: 1 },
    Offset { dr: -1, dc: 0 },
    Offset { dr: 0, dc: -1 },
];

pub const BISHOP_DIRS: [Offset; 4] = [
    Offset { dr: 1, dc: 1 },
    Offset { dr: -1, dc: 1 },
    Offset { dr: 1, dc: -1 },
    Offset { dr: -1, dc: -1 },
];

pub const QUEEN_DIRS: [Offset; 8] = [
    Offset { dr: 1, dc: 1 },
    Offset { dr: -1, dc: 1 },
    Offset { dr: 1, dc: -1 },
    Offset { dr: -1, dc: -1 },
    Offset { dr: 1, dc: 0 },
    Offset { dr: 0, dc: 1 },
    Offset { dr: -1, dc: 0 },
    Offset { dr: 0, dc: -1 },
];

pub const KNIGHT_DELTAS: [Offset; 8] = [
    Offset { dr: 1, dc: 2 },
    Offset { dr: 2, dc: 1 },
    Offset { dr: -1, dc: 2 },
    Offset { dr: -2, dc: 1 },
    Offset { dr: 1, dc: -2 },
    Offset { dr: 2, dc: -1 },
    Offset { dr: -1, dc: -2 },
    Offset { dr: -2, dc: -1 },
];
