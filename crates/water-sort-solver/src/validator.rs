//! Structural checks on a puzzle record before search.
//!
//! A record that passes becomes the initial [`PuzzleState`]. Anything that
//! could never be sorted (a color that cannot fill whole tubes, an overfull
//! tube) is rejected here so the search never starts on it.

use crate::error::InvalidPuzzle;
use crate::puzzle::{Color, PuzzleInput, PuzzleState, Tube};

/// Validate a record against a tube capacity and build the initial state
pub fn validate(input: &PuzzleInput, capacity: usize) -> Result<PuzzleState, InvalidPuzzle> {
    if capacity == 0 {
        return Err(InvalidPuzzle::ZeroCapacity);
    }

    if input.filled_tubelist.len() != input.total_tube {
        return Err(InvalidPuzzle::TubeCountMismatch {
            declared: input.total_tube,
            listed: input.filled_tubelist.len(),
        });
    }

    for (tube, stack) in input.filled_tubelist.iter().enumerate() {
        if stack.len() > capacity {
            return Err(InvalidPuzzle::TubeOverfull {
                tube,
                units: stack.len(),
                capacity,
            });
        }
    }

    let tubes: Vec<Tube> = input
        .filled_tubelist
        .iter()
        .map(|stack| Tube::from_units(stack))
        .collect();
    let state = PuzzleState::from_tubes(tubes, capacity);

    if let Some((color, count)) = state
        .color_counts()
        .into_iter()
        .find(|&(_, count)| count % capacity != 0)
    {
        return Err(InvalidPuzzle::ColorCountNotMultiple {
            color,
            count,
            capacity,
        });
    }

    let actual_empty = state.tubes().iter().filter(|t| t.is_empty()).count();
    if actual_empty != input.empty_tube_numbers {
        return Err(InvalidPuzzle::EmptyCountMismatch {
            declared: input.empty_tube_numbers,
            actual: actual_empty,
        });
    }

    Ok(state)
}

/// Validate bare stacks, deriving the tube and empty counts from them
pub fn validate_stacks(stacks: &[&[Color]], capacity: usize) -> Result<PuzzleState, InvalidPuzzle> {
    let input = PuzzleInput::from_stacks(stacks.iter().map(|s| s.to_vec()).collect());
    validate(&input, capacity)
}
