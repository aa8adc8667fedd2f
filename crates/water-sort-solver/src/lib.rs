//! Solver library for water sort (color sorting) tube puzzles.
//!
//! Given tubes of stacked colored units, this crate finds the shortest
//! sequence of pours that leaves every tube empty or full of one color.
//! Screen reading and click automation live outside the crate: they hand
//! in a [`PuzzleInput`] record and receive a list of [`Move`]s.

pub mod error;
pub mod executor;
pub mod heuristic;
pub mod pruning;
pub mod puzzle;
pub mod solver;
pub mod validator;

// Re-export main types
pub use error::{IllegalMove, InvalidPuzzle, ReplayError, SearchLimit, SolveError};
pub use executor::{apply_move, check_move, is_legal, replay, verify_solution};
pub use pruning::{legal_moves, PruneMode};
pub use puzzle::{Color, Move, PuzzleInput, PuzzleState, StateKey, Tube, DEFAULT_CAPACITY};
pub use solver::{
    search, search_with_observer, solve, NoopObserver, SearchObserver, SearchOutcome, SearchStats,
    Solution, SolverConfig, SolverResult,
};
pub use validator::{validate, validate_stacks};
