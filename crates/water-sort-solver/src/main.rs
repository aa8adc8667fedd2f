//! CLI entry point for the water sort solver.
//!
//! Usage:
//!   water-sort-solver solve <puzzle.json> [options]
//!   water-sort-solver solve --stdin [options]
//!   water-sort-solver replay <puzzle.json> --moves '[[0,2],[1,0]]'
//!
//! Options:
//!   --capacity <n>        Units per tube (default: 4)
//!   --max-moves <n>       Longest accepted solution (default: 500)
//!   --max-depth <n>       Deepest search level (default: 100)
//!   --max-expansions <n>  Override the expansion budget
//!   --no-prune            Search without move pruning
//!   --verbose             Print search progress to stderr

use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;

use water_sort_solver::{
    replay, search_with_observer, validate, Color, Move, NoopObserver, PruneMode, PuzzleInput,
    PuzzleState, SearchObserver, SearchOutcome, SearchStats, SolveError, SolverConfig,
    DEFAULT_CAPACITY,
};

#[derive(Parser)]
#[command(name = "water-sort-solver")]
#[command(about = "Finds the shortest pour sequence for a water sort puzzle")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Solve a puzzle and print the move list as JSON
    Solve {
        /// Path to puzzle JSON file (use --stdin to read from stdin)
        #[arg(value_name = "FILE")]
        file: Option<PathBuf>,

        /// Read puzzle from stdin instead of file
        #[arg(long)]
        stdin: bool,

        /// Units per tube
        #[arg(long, default_value_t = DEFAULT_CAPACITY)]
        capacity: usize,

        /// Longest accepted solution in moves
        #[arg(long, default_value = "500")]
        max_moves: u32,

        /// Deepest search level in moves
        #[arg(long, default_value = "100")]
        max_depth: u32,

        /// Expansion budget (default: derived from --max-moves)
        #[arg(long)]
        max_expansions: Option<usize>,

        /// Disable move pruning
        #[arg(long)]
        no_prune: bool,

        /// Print search progress to stderr
        #[arg(short, long)]
        verbose: bool,
    },

    /// Apply a move list to a puzzle and report the final state
    Replay {
        /// Path to puzzle JSON file (use --stdin to read from stdin)
        #[arg(value_name = "FILE")]
        file: Option<PathBuf>,

        /// Read puzzle from stdin instead of file
        #[arg(long)]
        stdin: bool,

        /// Moves as a JSON list of [from, to] pairs
        #[arg(long)]
        moves: String,

        /// Units per tube
        #[arg(long, default_value_t = DEFAULT_CAPACITY)]
        capacity: usize,
    },
}

/// Output format for a solve
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SolveOutput {
    solved: bool,
    outcome: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    moves: Option<Vec<Move>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    move_count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    stats: Option<StatsOutput>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct StatsOutput {
    nodes_expanded: usize,
    nodes_generated: usize,
    stale_skipped: usize,
    states_visited: usize,
    peak_open_size: usize,
    time_elapsed_ms: u64,
}

impl From<&SearchStats> for StatsOutput {
    fn from(stats: &SearchStats) -> Self {
        Self {
            nodes_expanded: stats.expanded,
            nodes_generated: stats.generated,
            stale_skipped: stats.stale_skipped,
            states_visited: stats.states_visited,
            peak_open_size: stats.peak_open_size,
            time_elapsed_ms: stats.time_elapsed_ms,
        }
    }
}

/// Output format for a replay
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ReplayOutput {
    goal_reached: bool,
    moves_applied: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    final_state: Vec<Vec<Color>>,
}

/// Writes periodic search progress to stderr
struct StderrProgress;

impl SearchObserver for StderrProgress {
    fn on_start(&mut self, initial: &PuzzleState, initial_estimate: u32) {
        eprintln!("Initial state:\n{}", initial);
        eprintln!("Heuristic (initial): {}", initial_estimate);
    }

    fn on_progress(&mut self, stats: &SearchStats) {
        eprintln!(
            "Progress: {} expanded, {} queued, {} states seen",
            stats.expanded, stats.open_size, stats.states_visited
        );
    }

    fn on_finish(&mut self, outcome: &SearchOutcome, stats: &SearchStats) {
        match outcome {
            SearchOutcome::Solved(moves) => eprintln!(
                "Solved in {} moves after {} expansions",
                moves.len(),
                stats.expanded
            ),
            SearchOutcome::Exhausted => {
                eprintln!("No solution after {} expansions", stats.expanded)
            }
            SearchOutcome::ResourceExceeded(limit) => eprintln!("Stopped at the {}", limit),
        }
    }
}

const EXIT_INVALID: u8 = 1;
const EXIT_EXHAUSTED: u8 = 2;
const EXIT_RESOURCE_EXCEEDED: u8 = 3;

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Solve {
            file,
            stdin,
            capacity,
            max_moves,
            max_depth,
            max_expansions,
            no_prune,
            verbose,
        } => {
            let mut config = SolverConfig::default()
                .with_capacity(capacity)
                .with_max_moves(max_moves)
                .with_max_depth(max_depth)
                .with_prune(if no_prune { PruneMode::Off } else { PruneMode::On });
            config.max_expansions = max_expansions;
            read_puzzle(file, stdin).and_then(|input| run_solve(&input, &config, verbose))
        }
        Commands::Replay {
            file,
            stdin,
            moves,
            capacity,
        } => read_puzzle(file, stdin).and_then(|input| run_replay(&input, &moves, capacity)),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(EXIT_INVALID)
        }
    }
}

fn read_puzzle(file: Option<PathBuf>, stdin: bool) -> Result<PuzzleInput> {
    let json_content = if stdin {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .context("failed to read from stdin")?;
        buffer
    } else if let Some(path) = file {
        fs::read_to_string(&path).with_context(|| format!("failed to read file {:?}", path))?
    } else {
        bail!("must provide either a file path or --stdin");
    };

    serde_json::from_str(&json_content).context("failed to parse puzzle JSON")
}

fn run_solve(input: &PuzzleInput, config: &SolverConfig, verbose: bool) -> Result<ExitCode> {
    let (output, code) = match validate(input, config.capacity) {
        Err(invalid) => {
            let err = SolveError::from(invalid);
            (failure_output(&err, None), EXIT_INVALID)
        }
        Ok(initial) => {
            let result = if verbose {
                search_with_observer(&initial, config, &mut StderrProgress)
            } else {
                search_with_observer(&initial, config, &mut NoopObserver)
            };
            let stats = StatsOutput::from(&result.stats);
            match result.into_moves() {
                Ok(moves) => (
                    SolveOutput {
                        solved: true,
                        outcome: "solved",
                        reason: None,
                        move_count: Some(moves.len()),
                        moves: Some(moves),
                        stats: Some(stats),
                    },
                    0,
                ),
                Err(err) => {
                    let code = match err {
                        SolveError::Exhausted => EXIT_EXHAUSTED,
                        SolveError::ResourceExceeded { .. } => EXIT_RESOURCE_EXCEEDED,
                        SolveError::InvalidPuzzle(_) => EXIT_INVALID,
                    };
                    (failure_output(&err, Some(stats)), code)
                }
            }
        }
    };

    println!(
        "{}",
        serde_json::to_string_pretty(&output).context("failed to encode report")?
    );
    Ok(ExitCode::from(code))
}

fn failure_output(err: &SolveError, stats: Option<StatsOutput>) -> SolveOutput {
    SolveOutput {
        solved: false,
        outcome: err.kind(),
        reason: Some(err.to_string()),
        moves: None,
        move_count: None,
        stats,
    }
}

fn run_replay(input: &PuzzleInput, moves_json: &str, capacity: usize) -> Result<ExitCode> {
    let moves: Vec<Move> =
        serde_json::from_str(moves_json).context("failed to parse --moves as [[from, to], ...]")?;
    let initial = validate(input, capacity)?;

    let output = match replay(&initial, &moves) {
        Ok(end) => ReplayOutput {
            goal_reached: end.is_goal(),
            moves_applied: moves.len(),
            error: None,
            final_state: end.to_stacks(),
        },
        Err(err) => {
            // show the board just before the illegal move
            let before = replay(&initial, &moves[..err.step])?;
            ReplayOutput {
                goal_reached: false,
                moves_applied: err.step,
                error: Some(err.to_string()),
                final_state: before.to_stacks(),
            }
        }
    };

    println!(
        "{}",
        serde_json::to_string_pretty(&output).context("failed to encode report")?
    );
    Ok(if output.goal_reached {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(EXIT_INVALID)
    })
}
