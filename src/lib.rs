//! Search for cheap sets of chess pieces that cover every cell of a small square board.
//!
//! A cell is covered when some piece on the board attacks it; occupied cells count too.
//! [`search::run`] explores placements best-first over a pool of worker threads and reports
//! every complete covering that beats the current score bound.

pub mod board;
pub mod chess;
pub mod config;
pub mod core;
pub mod error;
pub mod search;
