//! Core Sudoku solving engine.
//!
//! A [`Board`] tracks a digit and an open-candidate set per cell. The
//! [`Solver`] fills it with deterministic constraint propagation (naked
//! and hidden singles) and falls back to a guess-and-backtrack search on
//! independent board clones when propagation stalls. Observers can watch
//! the solve live through the [`StateSink`] snapshot stream.

pub mod board;
pub mod loader;
pub mod solver;
pub mod stream;

pub use board::{Board, CandidateSet, Position};
pub use loader::{parse_board, ParseError};
pub use solver::{SolveReport, Solver};
pub use stream::{CellView, LatestSnapshot, Snapshot, StateSink};
