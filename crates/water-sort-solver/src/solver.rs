//! Best-first (A*) search for the shortest pour sequence.
//!
//! Nodes live in an arena and point at their parent by index; the winning
//! path is rebuilt by walking those indices back to the root. The open set
//! is a binary heap ordered by `f = g + h`, and a per-call map from exact
//! state keys to the best known `g` filters duplicates. Nothing outlives a
//! single call, so independent puzzles can be solved on separate threads.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};
use std::time::Instant;

use crate::error::{SearchLimit, SolveError};
use crate::executor::apply_unchecked;
use crate::heuristic::estimate;
use crate::pruning::{legal_moves, PruneMode};
use crate::puzzle::{Move, PuzzleInput, PuzzleState, StateKey, DEFAULT_CAPACITY};
use crate::validator::validate;

/// Expansion budget granted per allowed solution move
pub const EXPANSIONS_PER_MOVE: usize = 2_000;

/// Configuration for the solver
#[derive(Debug, Clone)]
pub struct SolverConfig {
    /// Units per tube
    pub capacity: usize,
    /// Longest accepted solution; also scales the expansion budget
    pub max_moves: u32,
    /// Deepest node the search will expand past
    pub max_depth: u32,
    /// Explicit expansion budget, overriding the one derived from `max_moves`
    pub max_expansions: Option<usize>,
    pub prune: PruneMode,
    /// Expansions between observer progress calls (0 disables them)
    pub progress_interval: usize,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            max_moves: 500,
            max_depth: 100,
            max_expansions: None,
            prune: PruneMode::On,
            progress_interval: 10_000,
        }
    }
}

impl SolverConfig {
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    pub fn with_max_moves(mut self, max_moves: u32) -> Self {
        self.max_moves = max_moves;
        self
    }

    pub fn with_max_depth(mut self, max_depth: u32) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_max_expansions(mut self, max_expansions: usize) -> Self {
        self.max_expansions = Some(max_expansions);
        self
    }

    pub fn with_prune(mut self, prune: PruneMode) -> Self {
        self.prune = prune;
        self
    }

    pub fn with_progress_interval(mut self, interval: usize) -> Self {
        self.progress_interval = interval;
        self
    }

    /// No node at or beyond this depth is expanded
    pub fn depth_limit(&self) -> u32 {
        self.max_depth.min(self.max_moves)
    }

    pub fn expansion_budget(&self) -> usize {
        self.max_expansions
            .unwrap_or_else(|| (self.max_moves as usize).saturating_mul(EXPANSIONS_PER_MOVE))
    }
}

/// Counters collected during a search
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Nodes whose moves were generated
    pub expanded: usize,
    /// Child states produced, duplicates included
    pub generated: usize,
    /// Popped nodes skipped because a shorter path to their state was found
    pub stale_skipped: usize,
    /// Distinct states recorded in the visited map
    pub states_visited: usize,
    pub open_size: usize,
    pub peak_open_size: usize,
    pub time_elapsed_ms: u64,
}

/// Hooks for watching a search. All methods default to doing nothing.
pub trait SearchObserver {
    fn on_start(&mut self, _initial: &PuzzleState, _initial_estimate: u32) {}

    /// Called every `progress_interval` expansions
    fn on_progress(&mut self, _stats: &SearchStats) {}

    fn on_finish(&mut self, _outcome: &SearchOutcome, _stats: &SearchStats) {}
}

/// Observer that ignores every event
#[derive(Debug, Default)]
pub struct NoopObserver;

impl SearchObserver for NoopObserver {}

/// Terminal state of a search
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    /// Shortest pour sequence, possibly empty
    Solved(Vec<Move>),
    /// Every reachable state was explored without finding a goal
    Exhausted,
    /// A configured bound stopped the search; solvability is unknown
    ResourceExceeded(SearchLimit),
}

/// Result of the solver search
#[derive(Debug, Clone)]
pub struct SolverResult {
    pub outcome: SearchOutcome,
    pub stats: SearchStats,
}

impl SolverResult {
    pub fn is_solved(&self) -> bool {
        matches!(self.outcome, SearchOutcome::Solved(_))
    }

    /// The move list, or the failure as an error
    pub fn into_moves(self) -> Result<Vec<Move>, SolveError> {
        match self.outcome {
            SearchOutcome::Solved(moves) => Ok(moves),
            SearchOutcome::Exhausted => Err(SolveError::Exhausted),
            SearchOutcome::ResourceExceeded(limit) => Err(SolveError::ResourceExceeded { limit }),
        }
    }
}

/// A solved puzzle
#[derive(Debug, Clone)]
pub struct Solution {
    pub moves: Vec<Move>,
    pub stats: SearchStats,
}

#[derive(Debug)]
struct Node {
    state: PuzzleState,
    /// Move that produced this node; `None` for the root
    mv: Option<Move>,
    parent: Option<usize>,
    g: u32,
    h: u32,
}

impl Node {
    fn f(&self) -> u32 {
        self.g + self.h
    }
}

/// Open set entry. The heap is a max-heap, so "greater" means "pop first":
/// lower `f`, then deeper `g`, then earlier insertion.
#[derive(Debug, PartialEq, Eq)]
struct OpenEntry {
    f: u32,
    g: u32,
    seq: u64,
    node: usize,
}

impl Ord for OpenEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .f
            .cmp(&self.f)
            .then_with(|| self.g.cmp(&other.g))
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for OpenEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Validate a record and search it, returning the moves or a terminal error
pub fn solve(input: &PuzzleInput, config: &SolverConfig) -> Result<Solution, SolveError> {
    let initial = validate(input, config.capacity)?;
    let result = search(&initial, config);
    let stats = result.stats.clone();
    let moves = result.into_moves()?;
    Ok(Solution { moves, stats })
}

/// Search from an already validated state
pub fn search(initial: &PuzzleState, config: &SolverConfig) -> SolverResult {
    search_with_observer(initial, config, &mut NoopObserver)
}

pub fn search_with_observer<O: SearchObserver + ?Sized>(
    initial: &PuzzleState,
    config: &SolverConfig,
    observer: &mut O,
) -> SolverResult {
    let start_time = Instant::now();
    let depth_limit = config.depth_limit();
    let budget = config.expansion_budget();
    let mut stats = SearchStats::default();

    let root_h = estimate(initial);
    observer.on_start(initial, root_h);

    let mut arena = vec![Node {
        state: initial.clone(),
        mv: None,
        parent: None,
        g: 0,
        h: root_h,
    }];
    let mut best_g: HashMap<StateKey, u32> = HashMap::new();
    best_g.insert(initial.key(), 0);

    let mut seq: u64 = 0;
    let mut open = BinaryHeap::new();
    open.push(OpenEntry {
        f: arena[0].f(),
        g: 0,
        seq,
        node: 0,
    });

    let outcome = loop {
        let Some(entry) = open.pop() else {
            break SearchOutcome::Exhausted;
        };
        let node = &arena[entry.node];

        if best_g
            .get(&node.state.key())
            .is_some_and(|&best| node.g > best)
        {
            stats.stale_skipped += 1;
            continue;
        }

        if node.state.is_goal() {
            break SearchOutcome::Solved(reconstruct_path(&arena, entry.node));
        }
        if node.g >= depth_limit {
            break SearchOutcome::ResourceExceeded(SearchLimit::Depth(depth_limit));
        }
        if stats.expanded >= budget {
            break SearchOutcome::ResourceExceeded(SearchLimit::Expansions(budget));
        }

        stats.expanded += 1;
        let parent = entry.node;
        let g = node.g + 1;
        let children: Vec<(Move, PuzzleState)> = legal_moves(&node.state, config.prune)
            .into_iter()
            .map(|mv| (mv, apply_unchecked(&node.state, mv)))
            .collect();

        for (mv, child) in children {
            stats.generated += 1;
            let key = child.key();
            if best_g.get(&key).is_some_and(|&best| best <= g) {
                continue;
            }
            best_g.insert(key, g);

            let h = estimate(&child);
            arena.push(Node {
                state: child,
                mv: Some(mv),
                parent: Some(parent),
                g,
                h,
            });
            seq += 1;
            let index = arena.len() - 1;
            open.push(OpenEntry {
                f: arena[index].f(),
                g,
                seq,
                node: index,
            });
        }

        stats.open_size = open.len();
        stats.peak_open_size = stats.peak_open_size.max(open.len());

        if config.progress_interval > 0 && stats.expanded % config.progress_interval == 0 {
            stats.states_visited = best_g.len();
            stats.time_elapsed_ms = start_time.elapsed().as_millis() as u64;
            observer.on_progress(&stats);
        }
    };

    stats.open_size = open.len();
    stats.states_visited = best_g.len();
    stats.time_elapsed_ms = start_time.elapsed().as_millis() as u64;
    observer.on_finish(&outcome, &stats);

    SolverResult { outcome, stats }
}

/// Walk parent indices from `goal` back to the root
fn reconstruct_path(arena: &[Node], goal: usize) -> Vec<Move> {
    let mut moves = Vec::new();
    let mut index = goal;
    while let Some(Node {
        mv: Some(mv),
        parent: Some(parent),
        ..
    }) = arena.get(index)
    {
        moves.push(*mv);
        index = *parent;
    }
    moves.reverse();
    moves
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::InvalidPuzzle;
    use crate::executor::{apply_move, verify_solution};
    use crate::puzzle::Color::{self, *};
    use crate::validator::validate_stacks;

    fn solve_stacks(stacks: &[&[Color]], config: &SolverConfig) -> SolverResult {
        let state = validate_stacks(stacks, config.capacity).unwrap();
        search(&state, config)
    }

    fn solved_moves(result: SolverResult) -> Vec<Move> {
        match result.outcome {
            SearchOutcome::Solved(moves) => moves,
            other => panic!("expected a solution, got {:?}", other),
        }
    }

    #[test]
    fn test_two_color_swap_takes_three_pours() {
        let config = SolverConfig::default().with_capacity(2);
        let state = validate_stacks(&[&[Red, Blue], &[Blue, Red], &[]], 2).unwrap();

        let moves = solved_moves(search(&state, &config));
        assert_eq!(moves.len(), 3);
        assert!(verify_solution(&state, &moves));
    }

    #[test]
    fn test_already_solved_returns_no_moves() {
        let config = SolverConfig::default();
        let result = solve_stacks(&[&[Purple; 4], &[], &[]], &config);
        assert_eq!(result.stats.expanded, 0);
        assert!(solved_moves(result).is_empty());
    }

    #[test]
    fn test_capacity_one_is_already_sorted() {
        let config = SolverConfig::default().with_capacity(1);
        let result = solve_stacks(&[&[Red], &[Blue]], &config);
        assert!(solved_moves(result).is_empty());
    }

    #[test]
    fn test_blocked_puzzle_is_exhausted() {
        let config = SolverConfig::default().with_capacity(2);
        let result = solve_stacks(&[&[Red, Blue], &[Blue, Red]], &config);
        assert_eq!(result.outcome, SearchOutcome::Exhausted);
        assert_eq!(result.stats.expanded, 1);
        assert_eq!(result.into_moves(), Err(SolveError::Exhausted));
    }

    #[test]
    fn test_depth_limit_reports_resource_exceeded() {
        let config = SolverConfig::default().with_capacity(2).with_max_depth(2);
        let result = solve_stacks(&[&[Red, Blue], &[Blue, Red], &[]], &config);
        assert_eq!(
            result.outcome,
            SearchOutcome::ResourceExceeded(SearchLimit::Depth(2))
        );
    }

    #[test]
    fn test_max_moves_caps_depth() {
        let config = SolverConfig::default().with_capacity(2).with_max_moves(2);
        assert_eq!(config.depth_limit(), 2);
        assert_eq!(config.expansion_budget(), 2 * EXPANSIONS_PER_MOVE);

        let result = solve_stacks(&[&[Red, Blue], &[Blue, Red], &[]], &config);
        assert_eq!(
            result.outcome,
            SearchOutcome::ResourceExceeded(SearchLimit::Depth(2))
        );
    }

    #[test]
    fn test_expansion_budget_reports_resource_exceeded() {
        let config = SolverConfig::default()
            .with_capacity(2)
            .with_max_expansions(1);
        let result = solve_stacks(&[&[Red, Blue], &[Blue, Red], &[]], &config);
        assert_eq!(
            result.outcome,
            SearchOutcome::ResourceExceeded(SearchLimit::Expansions(1))
        );
        assert_eq!(result.stats.expanded, 1);
        assert!(matches!(
            result.into_moves(),
            Err(SolveError::ResourceExceeded { .. })
        ));
    }

    #[test]
    fn test_solution_conserves_units() {
        let config = SolverConfig::default();
        let state = validate_stacks(
            &[
                &[Red, Blue, Red, Blue],
                &[Blue, Red, Blue, Red],
                &[],
                &[],
            ],
            4,
        )
        .unwrap();
        let counts = state.color_counts();

        let moves = solved_moves(search(&state, &config));
        let mut current = state.clone();
        for mv in &moves {
            current = apply_move(&current, *mv).unwrap();
            assert_eq!(current.color_counts(), counts);
            assert_eq!(current.tube_count(), state.tube_count());
        }
        assert!(current.is_goal());
    }

    #[test]
    fn test_search_is_deterministic() {
        let config = SolverConfig::default().with_capacity(3);
        let stacks: &[&[Color]] = &[
            &[Red, Green, Blue],
            &[Blue, Red, Green],
            &[Green, Blue, Red],
            &[],
            &[],
        ];
        let first = solved_moves(solve_stacks(stacks, &config));
        let second = solved_moves(solve_stacks(stacks, &config));
        assert_eq!(first, second);
    }

    #[test]
    fn test_pruning_keeps_optimal_length() {
        let stacks: &[&[Color]] = &[
            &[Red, Green, Blue],
            &[Blue, Red, Green],
            &[Green, Blue, Red],
            &[],
            &[],
        ];
        let pruned = SolverConfig::default().with_capacity(3);
        let unpruned = pruned.clone().with_prune(PruneMode::Off);

        let a = solved_moves(solve_stacks(stacks, &pruned));
        let b = solved_moves(solve_stacks(stacks, &unpruned));
        assert_eq!(a.len(), b.len());
    }

    #[test]
    fn test_solve_rejects_invalid_record_before_search() {
        let input = PuzzleInput::from_stacks(vec![
            vec![Orange, Pink, Green, Pink],
            vec![Orange, Red, Red, Blue],
            vec![Blue, Green, Red, Red],
            vec![Pink, Red, Orange, Orange],
            vec![Green, Orange, Pink, Blue],
            vec![],
            vec![],
        ]);
        let err = solve(&input, &SolverConfig::default()).unwrap_err();
        assert_eq!(
            err,
            SolveError::InvalidPuzzle(InvalidPuzzle::ColorCountNotMultiple {
                color: Red,
                count: 5,
                capacity: 4
            })
        );
        assert_eq!(err.kind(), "invalid_puzzle");
    }

    #[derive(Default)]
    struct CountingObserver {
        started_with: Option<u32>,
        progress_calls: usize,
        finished: bool,
    }

    impl SearchObserver for CountingObserver {
        fn on_start(&mut self, _initial: &PuzzleState, initial_estimate: u32) {
            self.started_with = Some(initial_estimate);
        }

        fn on_progress(&mut self, _stats: &SearchStats) {
            self.progress_calls += 1;
        }

        fn on_finish(&mut self, _outcome: &SearchOutcome, _stats: &SearchStats) {
            self.finished = true;
        }
    }

    #[test]
    fn test_observer_sees_every_expansion() {
        let config = SolverConfig::default()
            .with_capacity(2)
            .with_progress_interval(1);
        let state = validate_stacks(&[&[Red, Blue], &[Blue, Red], &[]], 2).unwrap();
        let mut observer = CountingObserver::default();

        let result = search_with_observer(&state, &config, &mut observer);
        assert!(result.is_solved());
        assert_eq!(observer.started_with, Some(estimate(&state)));
        assert_eq!(observer.progress_calls, result.stats.expanded);
        assert!(observer.finished);
    }

    #[test]
    fn test_open_entry_ordering() {
        let mut heap = BinaryHeap::new();
        heap.push(OpenEntry { f: 5, g: 1, seq: 0, node: 0 });
        heap.push(OpenEntry { f: 4, g: 1, seq: 1, node: 1 });
        heap.push(OpenEntry { f: 4, g: 3, seq: 2, node: 2 });
        heap.push(OpenEntry { f: 4, g: 3, seq: 3, node: 3 });

        let order: Vec<usize> = std::iter::from_fn(|| heap.pop().map(|e| e.node)).collect();
        assert_eq!(order, vec![2, 3, 1, 0]);
    }
}
