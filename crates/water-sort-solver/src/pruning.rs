//! Move generation and search space pruning.
//!
//! Both pruning rules only drop moves whose result is the parent state, or a
//! sibling, with two tube indices swapped. Goals are closed under swapping
//! tubes, so a swapped state is exactly as far from a goal as the unswapped one
//! and no optimal solution is lost.

use crate::executor::is_legal;
use crate::puzzle::{Move, PuzzleState};

/// Whether the generator drops symmetric and pointless pours
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PruneMode {
    #[default]
    On,
    Off,
}

/// Pouring a single-color tube into an empty tube moves the whole tube,
/// which only relabels it.
pub fn is_pointless_pour(state: &PuzzleState, mv: Move) -> bool {
    match (state.tube(mv.from), state.tube(mv.to)) {
        (Some(source), Some(dest)) => source.is_pure() && dest.is_empty(),
        _ => false,
    }
}

/// Index of the lowest-indexed empty tube, if any
pub fn first_empty_tube(state: &PuzzleState) -> Option<usize> {
    state.tubes().iter().position(|t| t.is_empty())
}

/// Legal moves from `state`, in (source, destination) index order
pub fn legal_moves(state: &PuzzleState, mode: PruneMode) -> Vec<Move> {
    let count = state.tube_count();
    let first_empty = first_empty_tube(state);
    let mut moves = Vec::new();

    for from in 0..count {
        if state.tubes()[from].is_empty() {
            continue;
        }
        for to in 0..count {
            let mv = Move::new(from, to);
            if !is_legal(state, mv) {
                continue;
            }
            if mode == PruneMode::On {
                // Empty tubes are interchangeable, offer only the first one
                if state.tubes()[to].is_empty() && Some(to) != first_empty {
                    continue;
                }
                if is_pointless_pour(state, mv) {
                    continue;
                }
            }
            moves.push(mv);
        }
    }

    moves
}
