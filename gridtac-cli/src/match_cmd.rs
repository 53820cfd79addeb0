//! Match command - random player against the engine over many games
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: play_match(), report_results()
//! - Level 3: play_single_game(), compute_match_statistics()
//! - Level 4: formatting utilities

use anyhow::{Context, Result};
use clap::Args;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;

use gridtac_core::{EventLog, FirstMover, GameConfig, GameSession, GameStatus, RandomPlayer};

/// Mixed into each game seed so the random player and the first-mover
/// coin flip draw from different streams
const PLAYER_SEED_SALT: u64 = 0x9E37_79B9_7F4A_7C15;

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct MatchArgs {
    /// Number of games to play
    #[arg(long, default_value = "20")]
    pub games: usize,

    /// Board edge length (3 or more)
    #[arg(long, default_value = "3")]
    pub size: usize,

    /// Who moves first: player, opponent or random
    #[arg(long, default_value = "random")]
    pub first: FirstMover,

    /// Play games in parallel
    #[arg(long)]
    pub parallel: bool,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

/// Result of a single game
#[derive(Clone, Debug)]
struct GameRecord {
    game_number: usize,
    seed: u64,
    result: GameStatus,
    plies: usize,
    opponent_opened: bool,
}

/// Aggregated match results
#[derive(Clone, Debug)]
struct MatchResults {
    games: Vec<GameRecord>,
    player_wins: usize,
    opponent_wins: usize,
    draws: usize,
    avg_plies: f32,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run match command
///
/// 1. Play the match (multiple games, optionally in parallel)
/// 2. Report results
pub fn run(args: MatchArgs, seed: Option<u64>) -> Result<()> {
    GameConfig::new(args.size)
        .validate()
        .context("Invalid match settings")?;

    tracing::info!(
        "Starting match: {} games on {}x{} ({} first, parallel={})",
        args.games,
        args.size,
        args.size,
        args.first,
        args.parallel
    );

    let results = play_match(&args, seed)?;

    report_results(&results, &args)
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

/// Play all games in the match
fn play_match(args: &MatchArgs, seed: Option<u64>) -> Result<MatchResults> {
    let base_seed = match seed {
        Some(s) => s,
        None => ChaCha8Rng::from_entropy().gen(),
    };
    let config = GameConfig::new(args.size).with_first_mover(args.first);

    let play = |game_num: usize| {
        let game_seed = base_seed.wrapping_add(game_num as u64);
        play_single_game(&config, game_num + 1, game_seed)
    };

    let games: Vec<GameRecord> = if args.parallel {
        (0..args.games)
            .into_par_iter()
            .map(play)
            .collect::<Result<_>>()?
    } else {
        (0..args.games).map(play).collect::<Result<_>>()?
    };

    for record in &games {
        tracing::info!(
            "Game {}: {} ({} plies, seed {})",
            record.game_number,
            record.result,
            record.plies,
            record.seed
        );
    }

    Ok(compute_match_statistics(games))
}

/// Report match results
fn report_results(results: &MatchResults, args: &MatchArgs) -> Result<()> {
    if args.json {
        println!("{}", json_report(results, args)?);
    } else {
        print_text_results(results);
    }
    Ok(())
}

// ============================================================================
// LEVEL 3 - STEPS
// ============================================================================

/// Play one game of random moves against the engine
fn play_single_game(config: &GameConfig, game_number: usize, seed: u64) -> Result<GameRecord> {
    let mut session = GameSession::new(config.clone().with_seed(seed), EventLog::new())?;
    let mut player = RandomPlayer::new(seed ^ PLAYER_SEED_SALT);
    let opponent_opened = session.opening().is_some();

    while !session.status().is_over() {
        let Some(cell) = player.choose_cell(session.board()) else {
            break;
        };
        session
            .on_player_move(cell.row, cell.col)
            .with_context(|| format!("Game {game_number}: random move {cell} was rejected"))?;
    }

    Ok(GameRecord {
        game_number,
        seed,
        result: session.status(),
        plies: session.observer().placements().count(),
        opponent_opened,
    })
}

/// Compute aggregate statistics from game records
fn compute_match_statistics(games: Vec<GameRecord>) -> MatchResults {
    let count = |status: GameStatus| games.iter().filter(|g| g.result == status).count();
    let player_wins = count(GameStatus::PlayerWin);
    let opponent_wins = count(GameStatus::OpponentWin);
    let draws = count(GameStatus::Draw);

    let total_plies: usize = games.iter().map(|g| g.plies).sum();
    let avg_plies = if games.is_empty() {
        0.0
    } else {
        total_plies as f32 / games.len() as f32
    };

    MatchResults {
        games,
        player_wins,
        opponent_wins,
        draws,
        avg_plies,
    }
}

// ============================================================================
// LEVEL 4 - UTILITIES
// ============================================================================

fn percent(part: usize, total: usize) -> f32 {
    if total > 0 {
        part as f32 / total as f32 * 100.0
    } else {
        0.0
    }
}

/// Results as pretty-printed JSON
fn json_report(results: &MatchResults, args: &MatchArgs) -> Result<String> {
    #[derive(serde::Serialize)]
    struct JsonGame {
        game_number: usize,
        seed: u64,
        result: GameStatus,
        plies: usize,
        opponent_opened: bool,
    }

    #[derive(serde::Serialize)]
    struct JsonOutput {
        size: usize,
        total_games: usize,
        player_wins: usize,
        opponent_wins: usize,
        draws: usize,
        avg_plies: f32,
        opponent_unbeaten_rate: f32,
        games: Vec<JsonGame>,
    }

    let total = results.games.len();
    let output = JsonOutput {
        size: args.size,
        total_games: total,
        player_wins: results.player_wins,
        opponent_wins: results.opponent_wins,
        draws: results.draws,
        avg_plies: results.avg_plies,
        opponent_unbeaten_rate: percent(total - results.player_wins, total) / 100.0,
        games: results
            .games
            .iter()
            .map(|g| JsonGame {
                game_number: g.game_number,
                seed: g.seed,
                result: g.result,
                plies: g.plies,
                opponent_opened: g.opponent_opened,
            })
            .collect(),
    };

    serde_json::to_string_pretty(&output).context("Failed to serialize match results")
}

/// Print results as text
fn print_text_results(results: &MatchResults) {
    let total = results.games.len();

    println!("\n=== Match Results ===");
    println!("Total games:    {}", total);
    println!(
        "Player wins:    {} ({:.1}%)",
        results.player_wins,
        percent(results.player_wins, total)
    );
    println!(
        "Opponent wins:  {} ({:.1}%)",
        results.opponent_wins,
        percent(results.opponent_wins, total)
    );
    println!(
        "Draws:          {} ({:.1}%)",
        results.draws,
        percent(results.draws, total)
    );
    println!("Avg plies:      {:.1}", results.avg_plies);

    println!("\nGame details:");
    for game in &results.games {
        println!(
            "  Game {}: {} in {} plies{}",
            game.game_number,
            game.result,
            game.plies,
            if game.opponent_opened { " (opponent opened)" } else { "" }
        );
    }
}

// ============================================================================
// TESTS
// ============================================================================
