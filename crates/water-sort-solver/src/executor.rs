//! Pour execution: the legality rule, applying a pour, and replaying a
//! whole move list against a starting state.
//!
//! A pour carries as much of the source's top run as fits in the
//! destination, not a single unit.

use crate::error::{IllegalMove, ReplayError};
use crate::puzzle::{Move, PuzzleState};

/// Check a move against the pour rules without applying it
pub fn check_move(state: &PuzzleState, mv: Move) -> Result<(), IllegalMove> {
    let tubes = state.tube_count();
    for index in [mv.from, mv.to] {
        if index >= tubes {
            return Err(IllegalMove::OutOfRange { index, tubes });
        }
    }
    if mv.from == mv.to {
        return Err(IllegalMove::SameTube(mv.from));
    }

    let source = &state.tubes()[mv.from];
    let dest = &state.tubes()[mv.to];

    let poured = source.top().ok_or(IllegalMove::EmptySource(mv.from))?;
    if dest.len() >= state.capacity() {
        return Err(IllegalMove::FullDestination(mv.to));
    }
    match dest.top() {
        Some(receiving) if receiving != poured => Err(IllegalMove::ColorMismatch {
            from: mv.from,
            to: mv.to,
            poured,
            receiving,
        }),
        _ => Ok(()),
    }
}

pub fn is_legal(state: &PuzzleState, mv: Move) -> bool {
    check_move(state, mv).is_ok()
}

/// Number of units a legal move transfers
pub fn pour_amount(state: &PuzzleState, mv: Move) -> usize {
    let run = state.tubes()[mv.from].top_run();
    let space = state.capacity() - state.tubes()[mv.to].len();
    run.min(space)
}

/// Apply a move the caller already knows to be legal.
///
/// Returns a new state; `state` is left untouched.
pub(crate) fn apply_unchecked(state: &PuzzleState, mv: Move) -> PuzzleState {
    let amount = pour_amount(state, mv);
    let mut next = state.clone();
    let tubes = next.tubes_mut();
    if let Some(color) = tubes[mv.from].top() {
        tubes[mv.from].pop_units(amount);
        tubes[mv.to].push_units(color, amount);
    }
    next
}

/// Apply a move, producing the resulting state
pub fn apply_move(state: &PuzzleState, mv: Move) -> Result<PuzzleState, IllegalMove> {
    check_move(state, mv)?;
    Ok(apply_unchecked(state, mv))
}

/// Apply every move in order, stopping at the first illegal one
pub fn replay(initial: &PuzzleState, moves: &[Move]) -> Result<PuzzleState, ReplayError> {
    let mut state = initial.clone();
    for (step, &mv) in moves.iter().enumerate() {
        state = apply_move(&state, mv).map_err(|reason| ReplayError { step, mv, reason })?;
    }
    Ok(state)
}

/// Simple verification: does the move list sort the puzzle?
pub fn verify_solution(initial: &PuzzleState, moves: &[Move]) -> bool {
    replay(initial, moves).map_or(false, |end| end.is_goal())
}
