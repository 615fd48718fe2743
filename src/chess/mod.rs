//! Chess pieces and their coverage geometry.

pub mod coverage;
pub mod piece;
