//! gridtac CLI - Command-line interface
//!
//! Commands:
//! - play: Play against the engine in the terminal
//! - match: Random player vs engine over many games
//! - bench: Time engine decisions per board size

mod benchmark;
mod match_cmd;
mod play_cmd;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "gridtac")]
#[command(about = "Three-in-a-row on N x N boards against a minimax opponent")]
struct Cli {
    /// Random seed for reproducible runs
    #[arg(long, global = true)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play a game in the terminal
    Play(play_cmd::PlayArgs),
    /// Play many games of a random player against the engine
    Match(match_cmd::MatchArgs),
    /// Time engine decisions for each board size
    Bench(benchmark::BenchmarkArgs),
}

fn main() -> anyhow::Result<()> {
    // Logs go to stderr so the board and reports own stdout
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Play(args) => play_cmd::run(args, cli.seed),
        Commands::Match(args) => match_cmd::run(args, cli.seed),
        Commands::Bench(args) => benchmark::run(args, cli.seed),
    }
}
