//! Lower bound on the number of pours still needed.
//!
//! Two quantities, each a valid bound on its own:
//!
//! - `transitions`: color changes between adjacent units. A pour never adds
//!   one (it lands on an empty tube or on the same color) and removes at most
//!   one, under the source's top run.
//! - `unsettled`: tubes that are neither empty nor full of one color. Each
//!   must change at least once and a pour changes exactly two tubes, so at
//!   least `ceil(unsettled / 2)` pours remain.
//!
//! Adding them would overcount (the first pour of `[[r,b],[b,r],[]]` at
//! capacity 2 lowers neither), so the estimate is their maximum. Each bound
//! moves by at most one per pour, which keeps the estimate consistent.

use crate::puzzle::PuzzleState;

/// Components of the estimate, kept for diagnostics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Estimate {
    pub unsettled: u32,
    pub transitions: u32,
}

impl Estimate {
    pub fn of(state: &PuzzleState) -> Self {
        let capacity = state.capacity();
        let mut estimate = Estimate::default();
        for tube in state.tubes().iter().filter(|t| !t.is_settled(capacity)) {
            estimate.unsettled += 1;
            estimate.transitions += tube.transitions() as u32;
        }
        estimate
    }

    /// Moves still needed, never more than the true minimum
    pub fn lower_bound(self) -> u32 {
        self.transitions.max(self.unsettled.div_ceil(2))
    }
}

/// h(state): admissible estimate of remaining pours
pub fn estimate(state: &PuzzleState) -> u32 {
    Estimate::of(state).lower_bound()
}
