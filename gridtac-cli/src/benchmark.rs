//! Benchmark command - time the engine over whole games per board size
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: benchmark_size(), report_results()
//! - Level 3: play_timed_game()
//! - Level 4: timing utilities, formatting

use std::time::{Duration, Instant};

use anyhow::{ensure, Context, Result};
use clap::Args;

use gridtac_core::{Board, GameStatus, Mark, MoveEngine, RandomPlayer, MIN_BOARD_SIZE};

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct BenchmarkArgs {
    /// Games to play per board size
    #[arg(long, default_value = "3")]
    pub games: usize,

    /// Largest board size to test (starting from 3)
    #[arg(long, default_value = "4")]
    pub max_size: usize,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

/// Timings for one board size
#[derive(Clone, Debug, serde::Serialize)]
struct BenchmarkResult {
    size: usize,
    games: usize,
    decisions: usize,
    total_nodes: u64,
    #[serde(skip)]
    total_time: Duration,
    avg_decision_ms: f64,
    max_decision_ms: f64,
}

/// Per-game accumulation
#[derive(Default)]
struct GameTiming {
    decisions: usize,
    nodes: u64,
    total: Duration,
    slowest: Duration,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run benchmark command
///
/// 1. Play timed games for every size from 3 to max_size
/// 2. Report results
pub fn run(args: BenchmarkArgs, seed: Option<u64>) -> Result<()> {
    ensure!(
        args.max_size >= MIN_BOARD_SIZE,
        "max size must be at least {}",
        MIN_BOARD_SIZE
    );

    let seed = seed.unwrap_or(42);
    let results: Vec<BenchmarkResult> = (MIN_BOARD_SIZE..=args.max_size)
        .map(|size| benchmark_size(size, args.games, seed))
        .collect();

    report_results(&results, args.json)
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

fn benchmark_size(size: usize, games: usize, seed: u64) -> BenchmarkResult {
    tracing::info!("Benchmarking {}x{} ({} games)", size, size, games);

    let mut total = GameTiming::default();
    for game in 0..games {
        let timing = play_timed_game(size, seed.wrapping_add(game as u64));
        total.decisions += timing.decisions;
        total.nodes += timing.nodes;
        total.total += timing.total;
        total.slowest = total.slowest.max(timing.slowest);
    }

    BenchmarkResult {
        size,
        games,
        decisions: total.decisions,
        total_nodes: total.nodes,
        total_time: total.total,
        avg_decision_ms: if total.decisions > 0 {
            millis(total.total) / total.decisions as f64
        } else {
            0.0
        },
        max_decision_ms: millis(total.slowest),
    }
}

fn report_results(results: &[BenchmarkResult], json: bool) -> Result<()> {
    if json {
        let text =
            serde_json::to_string_pretty(results).context("Failed to serialize benchmark results")?;
        println!("{}", text);
        return Ok(());
    }

    println!("\n=== Engine Benchmark ===");
    println!("| Size | Games | Decisions | Nodes | Avg | Max | Total |");
    println!("|---|---|---|---|---|---|---|");
    for r in results {
        println!(
            "| {0}x{0} | {1} | {2} | {3} | {4:.2}ms | {5:.2}ms | {6:.0}ms |",
            r.size,
            r.games,
            r.decisions,
            r.total_nodes,
            r.avg_decision_ms,
            r.max_decision_ms,
            millis(r.total_time)
        );
    }
    Ok(())
}

// ============================================================================
// LEVEL 3 - STEPS
// ============================================================================

/// Random player (moving first) against the engine, timing every decision
fn play_timed_game(size: usize, seed: u64) -> GameTiming {
    let engine = MoveEngine::new();
    let mut player = RandomPlayer::new(seed);
    let mut board = Board::new(size);
    let mut timing = GameTiming::default();

    while GameStatus::of(&board) == GameStatus::InProgress {
        let Some(cell) = player.choose_cell(&board) else {
            break;
        };
        if board.place(cell.row, cell.col, Mark::Player).is_err()
            || GameStatus::of(&board) != GameStatus::InProgress
        {
            break;
        }

        let start = Instant::now();
        let (decision, stats) = engine.choose_move_with_stats(&mut board);
        let elapsed = start.elapsed();

        if decision.is_none() {
            break;
        }
        timing.decisions += 1;
        timing.nodes += stats.nodes;
        timing.total += elapsed;
        timing.slowest = timing.slowest.max(elapsed);
    }

    timing
}

// ============================================================================
// LEVEL 4 - UTILITIES
// ============================================================================

fn millis(d: Duration) -> f64 {
    d.as_secs_f64() * 1000.0
}
