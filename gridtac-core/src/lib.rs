//! gridtac core - board and opponent engine
//!
//! This crate provides the core game logic for gridtac, tic-tac-toe on an
//! N×N board where three in a row wins:
//! - Board state with three-in-a-row detection
//! - Opponent move engine (win-now, block-now, alpha-beta minimax)
//! - Game session with observer callbacks for a presentation layer
//! - JSON game configuration

pub mod board;
pub mod error;
pub mod eval;
pub mod ai;
pub mod game;
pub mod config;

// Re-exports for convenient access
pub use board::{Board, Mark, Move, Speculation, DIRECTIONS, WIN_LENGTH};
pub use error::{GameError, MoveRejected, ParseBoardError, ParseFirstMoverError, PlaceError, MIN_BOARD_SIZE};
pub use eval::{terminal_score, DEPTH_LIMIT, WIN_SCORE};
pub use ai::{Decision, MoveEngine, RandomPlayer, SearchStats, Tactic};
pub use game::{EventLog, GameEvent, GameObserver, GameSession, GameStatus, NoopObserver, TurnOutcome};
pub use config::{FirstMover, GameConfig};
