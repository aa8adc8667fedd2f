//! Error types for the solver crate

use std::fmt;

use thiserror::Error;

use crate::puzzle::{Color, Move};

/// Structural problems found before any search work begins
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvalidPuzzle {
    #[error("capacity must be at least 1")]
    ZeroCapacity,

    #[error("record declares {declared} tubes but lists {listed}")]
    TubeCountMismatch { declared: usize, listed: usize },

    #[error("tube {tube} holds {units} units but capacity is {capacity}")]
    TubeOverfull {
        tube: usize,
        units: usize,
        capacity: usize,
    },

    #[error("{color} has {count} units, not a multiple of capacity {capacity}")]
    ColorCountNotMultiple {
        color: Color,
        count: usize,
        capacity: usize,
    },

    #[error("record declares {declared} empty tubes but {actual} tubes are empty")]
    EmptyCountMismatch { declared: usize, actual: usize },
}

/// Which configured bound stopped a search
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchLimit {
    /// Depth limit in moves
    Depth(u32),
    /// Expansion budget in nodes
    Expansions(usize),
}

impl fmt::Display for SearchLimit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchLimit::Depth(n) => write!(f, "depth limit of {} moves", n),
            SearchLimit::Expansions(n) => write!(f, "expansion budget of {} nodes", n),
        }
    }
}

/// Terminal failure of a solve call. No moves are ever returned alongside it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SolveError {
    #[error("invalid puzzle: {0}")]
    InvalidPuzzle(#[from] InvalidPuzzle),

    #[error("search space exhausted: no sequence of pours sorts this puzzle")]
    Exhausted,

    #[error("search stopped at the {limit} before finding a solution")]
    ResourceExceeded { limit: SearchLimit },
}

impl SolveError {
    /// Short machine-readable tag for reports
    pub fn kind(&self) -> &'static str {
        match self {
            SolveError::InvalidPuzzle(_) => "invalid_puzzle",
            SolveError::Exhausted => "exhausted",
            SolveError::ResourceExceeded { .. } => "resource_exceeded",
        }
    }
}

/// Why a move cannot be applied to a state
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum IllegalMove {
    #[error("tube index {index} is out of range ({tubes} tubes)")]
    OutOfRange { index: usize, tubes: usize },

    #[error("source and destination are both tube {0}")]
    SameTube(usize),

    #[error("source tube {0} is empty")]
    EmptySource(usize),

    #[error("destination tube {0} is full")]
    FullDestination(usize),

    #[error("top of tube {from} is {poured} but top of tube {to} is {receiving}")]
    ColorMismatch {
        from: usize,
        to: usize,
        poured: Color,
        receiving: Color,
    },
}

/// A replayed move list broke the pour rules
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("move {step} ({mv}) is illegal: {reason}")]
pub struct ReplayError {
    /// Zero-based position of the offending move in the list
    pub step: usize,
    pub mv: Move,
    pub reason: IllegalMove,
}
