//! Low-level, allocation-free primitives.
//!
//! Every working board and every stored state is built from these, so they are kept small,
//! `Copy`, and cheap to hash:
//!
//! - [`offset`]: signed row/column steps used by the move geometry tables.
//! - [`position`]: a board cell packed into a single `u8` (row-major, fixed stride).
//! - [`position_set`]: a set of positions stored as a `u64` bitset.

pub mod offset;
pub mod position;
pub mod position_set;
