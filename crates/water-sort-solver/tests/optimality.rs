//! Compares the pruned A* search against an unpruned A* search and a plain
//! breadth-first search over every legal pour, on seeded random puzzles
//! small enough to explore exhaustively.

use std::collections::{HashSet, VecDeque};

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use water_sort_solver::{
    apply_move, legal_moves, search, validate, verify_solution, Color, PruneMode, PuzzleInput,
    PuzzleState, SearchOutcome, SolverConfig,
};

/// Shortest solution length by breadth-first search, `None` if unsolvable
fn bfs_optimum(initial: &PuzzleState) -> Option<usize> {
    if initial.is_goal() {
        return Some(0);
    }
    let mut seen = HashSet::new();
    seen.insert(initial.key());
    let mut queue = VecDeque::from([(initial.clone(), 0usize)]);

    while let Some((state, depth)) = queue.pop_front() {
        for mv in legal_moves(&state, PruneMode::Off) {
            let child = apply_move(&state, mv).unwrap();
            if child.is_goal() {
                return Some(depth + 1);
            }
            if seen.insert(child.key()) {
                queue.push_back((child, depth + 1));
            }
        }
    }
    None
}

/// Full tubes of shuffled units plus empty tubes at random positions
fn random_puzzle(rng: &mut StdRng) -> (PuzzleInput, usize) {
    let capacity = rng.gen_range(2..=3);
    let colors = rng.gen_range(2..=3);
    let empties = rng.gen_range(1..=2);

    let mut units: Vec<Color> = Color::ALL[..colors]
        .iter()
        .flat_map(|&c| std::iter::repeat(c).take(capacity))
        .collect();
    units.shuffle(rng);

    let mut stacks: Vec<Vec<Color>> = units.chunks(capacity).map(|c| c.to_vec()).collect();
    for _ in 0..empties {
        let at = rng.gen_range(0..=stacks.len());
        stacks.insert(at, Vec::new());
    }
    (PuzzleInput::from_stacks(stacks), capacity)
}

fn solution_length(state: &PuzzleState, config: &SolverConfig) -> Option<usize> {
    match search(state, config).outcome {
        SearchOutcome::Solved(moves) => {
            assert!(verify_solution(state, &moves), "returned moves do not sort the puzzle");
            Some(moves.len())
        }
        SearchOutcome::Exhausted => None,
        SearchOutcome::ResourceExceeded(limit) => panic!("small puzzle hit the {}", limit),
    }
}

#[test]
fn pruned_search_matches_breadth_first_optimum() {
    let mut rng = StdRng::seed_from_u64(0x5eed);

    for round in 0..60 {
        let (input, capacity) = random_puzzle(&mut rng);
        let state = validate(&input, capacity).unwrap();
        let pruned = SolverConfig::default().with_capacity(capacity);
        let unpruned = pruned.clone().with_prune(PruneMode::Off);

        let expected = bfs_optimum(&state);
        assert_eq!(
            solution_length(&state, &pruned),
            expected,
            "pruned search disagrees on round {}:\n{}",
            round,
            state
        );
        assert_eq!(
            solution_length(&state, &unpruned),
            expected,
            "unpruned search disagrees on round {}:\n{}",
            round,
            state
        );
    }
}

#[test]
fn alternating_four_unit_tubes_are_solved_optimally() {
    use Color::*;
    let input = PuzzleInput::from_stacks(vec![
        vec![Red, Blue, Red, Blue],
        vec![Blue, Red, Blue, Red],
        vec![],
        vec![],
    ]);
    let state = validate(&input, 4).unwrap();

    let expected = bfs_optimum(&state);
    assert!(expected.is_some());
    assert_eq!(solution_length(&state, &SolverConfig::default()), expected);
}
