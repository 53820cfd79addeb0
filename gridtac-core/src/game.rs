//! Game session: turn flow, status tracking and observer notifications

use std::fmt;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::ai::{Decision, MoveEngine};
use crate::board::{Board, Mark, Move};
use crate::config::{FirstMover, GameConfig};
use crate::error::{validate_size, GameError, MoveRejected};

/// Boards above this size make the fixed-depth search noticeably slow
const SLOW_SEARCH_SIZE: usize = 5;

// ============================================================================
// STATUS
// ============================================================================

/// Outcome of a game so far, always derived from the board
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameStatus {
    InProgress,
    PlayerWin,
    OpponentWin,
    Draw,
}

impl GameStatus {
    pub fn of(board: &Board) -> Self {
        if board.check_win(Mark::Player) {
            GameStatus::PlayerWin
        } else if board.check_win(Mark::Opponent) {
            GameStatus::OpponentWin
        } else if board.is_full() {
            GameStatus::Draw
        } else {
            GameStatus::InProgress
        }
    }

    pub fn is_over(self) -> bool {
        self != GameStatus::InProgress
    }
}

impl fmt::Display for GameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            GameStatus::InProgress => "in progress",
            GameStatus::PlayerWin => "player wins",
            GameStatus::OpponentWin => "opponent wins",
            GameStatus::Draw => "draw",
        })
    }
}

// ============================================================================
// OBSERVERS
// ============================================================================

/// Listener for everything the presentation layer needs to draw.
///
/// Called synchronously from inside session operations; the session never
/// queries the observer.
pub trait GameObserver {
    /// A mark was written to a cell
    fn on_cell_changed(&mut self, _mv: Move, _mark: Mark) {}

    /// Status after a placement or reset
    fn on_status_changed(&mut self, _status: GameStatus) {}

    /// The board was cleared, possibly with a new size
    fn on_board_reset(&mut self, _size: usize) {}
}

/// Ignores every notification
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopObserver;

impl GameObserver for NoopObserver {}

/// A recorded notification
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    BoardReset { size: usize },
    CellChanged { mv: Move, mark: Mark },
    StatusChanged { status: GameStatus },
}

/// Records notifications in order
#[derive(Clone, Debug, Default)]
pub struct EventLog {
    events: Vec<GameEvent>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    /// Placements since the log was created, in order
    pub fn placements(&self) -> impl Iterator<Item = (Move, Mark)> + '_ {
        self.events.iter().filter_map(|e| match *e {
            GameEvent::CellChanged { mv, mark } => Some((mv, mark)),
            _ => None,
        })
    }

    /// Most recent status notification
    pub fn last_status(&self) -> Option<GameStatus> {
        self.events.iter().rev().find_map(|e| match *e {
            GameEvent::StatusChanged { status } => Some(status),
            _ => None,
        })
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl GameObserver for EventLog {
    fn on_cell_changed(&mut self, mv: Move, mark: Mark) {
        self.events.push(GameEvent::CellChanged { mv, mark });
    }

    fn on_status_changed(&mut self, status: GameStatus) {
        self.events.push(GameEvent::StatusChanged { status });
    }

    fn on_board_reset(&mut self, size: usize) {
        self.events.push(GameEvent::BoardReset { size });
    }
}

// ============================================================================
// SESSION
// ============================================================================

/// Result of an accepted player move
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnOutcome {
    pub player_move: Move,
    /// `None` when the player's move ended the game
    pub opponent_move: Option<Decision>,
    pub status: GameStatus,
}

/// One player against the move engine on a square board.
///
/// Owns the board outright; every operation runs the opponent's reply to
/// completion before returning.
pub struct GameSession<O = NoopObserver> {
    board: Board,
    status: GameStatus,
    config: GameConfig,
    engine: MoveEngine,
    rng: ChaCha8Rng,
    /// Opponent move that opened the current game, if any
    opening: Option<Decision>,
    observer: O,
}

impl GameSession<NoopObserver> {
    /// Session without a listener
    pub fn headless(config: GameConfig) -> Result<Self, GameError> {
        Self::new(config, NoopObserver)
    }
}

impl<O: GameObserver> GameSession<O> {
    /// Validate the config and start the first game.
    ///
    /// If the opponent moves first its opening mark is already on the board.
    pub fn new(config: GameConfig, observer: O) -> Result<Self, GameError> {
        let size = validate_size(config.size)?;
        let rng = match config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };

        let mut session = Self {
            board: Board::new(size),
            status: GameStatus::InProgress,
            config,
            engine: MoveEngine::new(),
            rng,
            opening: None,
            observer,
        };
        session.start();
        Ok(session)
    }

    // ========================================================================
    // ACCESSORS
    // ========================================================================

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn size(&self) -> usize {
        self.board.size()
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// The opponent's opening move in the current game
    pub fn opening(&self) -> Option<Decision> {
        self.opening
    }

    pub fn observer(&self) -> &O {
        &self.observer
    }

    pub fn observer_mut(&mut self) -> &mut O {
        &mut self.observer
    }

    pub fn into_observer(self) -> O {
        self.observer
    }

    // ========================================================================
    // OPERATIONS
    // ========================================================================

    /// Place the player's mark, then let the opponent reply if the game
    /// is still running.
    ///
    /// Occupied or out-of-range cells and moves after game over are
    /// rejected without touching the board or notifying the observer.
    pub fn on_player_move(&mut self, row: usize, col: usize) -> Result<TurnOutcome, MoveRejected> {
        if self.status.is_over() {
            tracing::debug!(row, col, status = %self.status, "move rejected: game over");
            return Err(MoveRejected::GameOver(self.status));
        }

        if let Err(err) = self.board.place(row, col, Mark::Player) {
            tracing::debug!(row, col, %err, "move rejected");
            return Err(err.into());
        }

        let player_move = Move::new(row, col);
        self.observer.on_cell_changed(player_move, Mark::Player);
        self.refresh_status();

        let opponent_move = if self.status.is_over() {
            None
        } else {
            self.opponent_turn()
        };

        Ok(TurnOutcome {
            player_move,
            opponent_move,
            status: self.status,
        })
    }

    /// Switch to a `size`×`size` board and start a new game
    pub fn set_game_mode(&mut self, size: usize) -> Result<(), GameError> {
        self.config.size = validate_size(size)?;
        self.start();
        Ok(())
    }

    /// Clear the board and start a new game at the current size
    pub fn reset_game(&mut self) {
        self.start();
    }

    // ========================================================================
    // TURN FLOW
    // ========================================================================

    fn start(&mut self) {
        let size = self.config.size;
        self.board.reset(size);
        self.status = GameStatus::InProgress;
        self.opening = None;

        self.observer.on_board_reset(size);
        self.observer.on_status_changed(self.status);

        if size > SLOW_SEARCH_SIZE {
            tracing::warn!(size, "large board: opponent search may take a long time");
        }

        let opponent_first = self.opponent_opens();
        tracing::info!(size, opponent_first, "new game");

        if opponent_first {
            self.opening = self.opponent_turn();
        }
    }

    fn opponent_opens(&mut self) -> bool {
        match self.config.first_mover {
            FirstMover::Player => false,
            FirstMover::Opponent => true,
            FirstMover::Random => self.rng.gen_bool(0.5),
        }
    }

    fn opponent_turn(&mut self) -> Option<Decision> {
        let decision = self.engine.choose_move(&mut self.board)?;
        self.observer.on_cell_changed(decision.mv, Mark::Opponent);
        self.refresh_status();
        Some(decision)
    }

    fn refresh_status(&mut self) {
        self.status = GameStatus::of(&self.board);
        self.observer.on_status_changed(self.status);
        if self.status.is_over() {
            tracing::info!(status = %self.status, marks = self.board.mark_count(), "game over");
        }
    }
}
