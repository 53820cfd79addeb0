//! Play command - interactive game against the engine in the terminal
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: resolve_config(), run_loop()
//! - Level 3: parse_command(), apply_command()
//! - Level 4: TerminalView rendering

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Args;

use gridtac_core::{FirstMover, GameConfig, GameObserver, GameSession, GameStatus, Mark, Move};

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct PlayArgs {
    /// Board edge length (3 or more)
    #[arg(long)]
    pub size: Option<usize>,

    /// Who moves first: player, opponent or random
    #[arg(long)]
    pub first: Option<FirstMover>,

    /// JSON game config; flags override its values
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

const HELP: &str = "\
Commands:
  <row> <col>   place your X (0-indexed)
  new           start a new game
  size <n>      switch to an n x n board and start over
  help          show this message
  quit          leave";

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run play command
///
/// 1. Resolve the game config from file and flags
/// 2. Start a session rendered by the terminal view
/// 3. Process commands from stdin until quit or EOF
pub fn run(args: PlayArgs, seed: Option<u64>) -> Result<()> {
    let config = resolve_config(&args, seed)?;

    tracing::info!(
        "Starting game: {}x{} board, {} moves first",
        config.size,
        config.size,
        config.first_mover
    );

    let mut session = GameSession::new(config, TerminalView::new())?;

    let stdin = io::stdin();
    let stdout = io::stdout();
    run_loop(&mut session, stdin.lock(), &mut stdout.lock())
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

/// Merge config file (if any) with command-line overrides
pub fn resolve_config(args: &PlayArgs, seed: Option<u64>) -> Result<GameConfig> {
    let mut config = match &args.config {
        Some(path) => GameConfig::load(path)?,
        None => GameConfig::default(),
    };

    if let Some(size) = args.size {
        config.size = size;
    }
    if let Some(first) = args.first {
        config.first_mover = first;
    }
    if seed.is_some() {
        config.seed = seed;
    }

    config.validate().context("Invalid game settings")?;
    Ok(config)
}

/// Read commands until `quit` or end of input
fn run_loop<R: BufRead, W: Write>(
    session: &mut GameSession<TerminalView>,
    input: R,
    out: &mut W,
) -> Result<()> {
    writeln!(out, "{HELP}")?;
    session.observer_mut().flush(out)?;

    for line in input.lines() {
        let line = line.context("Failed to read input")?;
        if line.trim().is_empty() {
            continue;
        }

        match parse_command(&line) {
            Ok(Command::Quit) => break,
            Ok(command) => apply_command(session, command, out)?,
            Err(err) => writeln!(out, "{err}")?,
        }

        session.observer_mut().flush(out)?;
    }

    Ok(())
}

// ============================================================================
// LEVEL 3 - STEPS
// ============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Command {
    Place { row: usize, col: usize },
    New,
    Size(usize),
    Help,
    Quit,
}

fn parse_command(line: &str) -> Result<Command> {
    let words: Vec<&str> = line.split_whitespace().collect();
    let command = match words.as_slice() {
        ["quit" | "q" | "exit"] => Command::Quit,
        ["new" | "reset"] => Command::New,
        ["help" | "?"] => Command::Help,
        ["size", n] => Command::Size(
            n.parse()
                .with_context(|| format!("'{n}' is not a board size"))?,
        ),
        [row, col] => Command::Place {
            row: row
                .parse()
                .with_context(|| format!("'{row}' is not a row number"))?,
            col: col
                .parse()
                .with_context(|| format!("'{col}' is not a column number"))?,
        },
        _ => bail!("Unknown command '{}' (type 'help')", line.trim()),
    };
    Ok(command)
}

fn apply_command<W: Write>(
    session: &mut GameSession<TerminalView>,
    command: Command,
    out: &mut W,
) -> Result<()> {
    match command {
        Command::Place { row, col } => {
            if let Err(rejected) = session.on_player_move(row, col) {
                writeln!(out, "Move ignored: {rejected}")?;
            }
        }
        Command::New => session.reset_game(),
        Command::Size(size) => {
            if let Err(err) = session.set_game_mode(size) {
                writeln!(out, "{err}")?;
            }
        }
        Command::Help => writeln!(out, "{HELP}")?,
        Command::Quit => {}
    }
    Ok(())
}

// ============================================================================
// LEVEL 4 - TERMINAL VIEW
// ============================================================================

/// Observer that mirrors the board from notifications and prints it on flush
#[derive(Default)]
pub struct TerminalView {
    size: usize,
    cells: Vec<Mark>,
    status: Option<GameStatus>,
    messages: Vec<String>,
    dirty: bool,
}

impl TerminalView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Print the board and any queued messages if something changed
    pub fn flush<W: Write>(&mut self, out: &mut W) -> io::Result<()> {
        if !self.dirty {
            return Ok(());
        }
        writeln!(out)?;
        writeln!(out, "{}", self.render())?;
        for message in self.messages.drain(..) {
            writeln!(out, "{message}")?;
        }
        match self.status {
            Some(GameStatus::InProgress) => write!(out, "> ")?,
            Some(_) => writeln!(out, "Type 'new' to play again.")?,
            None => {}
        }
        out.flush()?;
        self.dirty = false;
        Ok(())
    }

    /// Grid with row and column numbers
    fn render(&self) -> String {
        let width = self.size.saturating_sub(1).to_string().len();
        let mut text = format!("{:width$} ", "");
        for col in 0..self.size {
            text.push_str(&format!(" {col:>width$}"));
        }
        for (row, cells) in self.cells.chunks(self.size.max(1)).enumerate() {
            text.push_str(&format!("\n{row:>width$} "));
            for mark in cells {
                text.push_str(&format!(" {:>width$}", mark.symbol()));
            }
        }
        text
    }
}

impl GameObserver for TerminalView {
    fn on_cell_changed(&mut self, mv: Move, mark: Mark) {
        if let Some(cell) = self.cells.get_mut(mv.row * self.size + mv.col) {
            *cell = mark;
        }
        if mark == Mark::Opponent {
            self.messages.push(format!("Opponent plays {mv}"));
        }
        self.dirty = true;
    }

    fn on_status_changed(&mut self, status: GameStatus) {
        let message = match status {
            GameStatus::InProgress => None,
            GameStatus::PlayerWin => Some("You win!"),
            GameStatus::OpponentWin => Some("Opponent wins!"),
            GameStatus::Draw => Some("Nobody wins!"),
        };
        if let Some(message) = message {
            self.messages.push(message.to_string());
        }
        self.status = Some(status);
        self.dirty = true;
    }

    fn on_board_reset(&mut self, size: usize) {
        self.size = size;
        self.cells = vec![Mark::Empty; size * size];
        self.messages.push(format!("New {size}x{size} game."));
        self.dirty = true;
    }
}

// ============================================================================
// TESTS
// ============================================================================
