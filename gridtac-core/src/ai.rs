//! Opponent move engine: win-now, block-now, then alpha-beta minimax

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::board::{Board, Mark, Move};
use crate::eval::terminal_score;

// ============================================================================
// DECISIONS
// ============================================================================

/// Which tier of the decision policy produced a move
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Tactic {
    /// Completes an opponent line immediately
    Win,
    /// Occupies the cell the player would win on
    Block,
    /// Best minimax score among all candidates
    Search { score: i32 },
}

/// A move the engine applied to the board
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Decision {
    pub mv: Move,
    pub tactic: Tactic,
}

/// Counters collected during one decision
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Number of minimax calls
    pub nodes: u64,
}

// ============================================================================
// MOVE ENGINE
// ============================================================================

/// Picks and applies the opponent's move.
///
/// The engine is stateless; every decision runs to completion on the
/// board it is handed and leaves exactly one new opponent mark behind.
#[derive(Clone, Copy, Debug, Default)]
pub struct MoveEngine;

impl MoveEngine {
    pub fn new() -> Self {
        Self
    }

    /// Choose the opponent's move and apply it.
    ///
    /// Returns `None` (and leaves the board untouched) if no cell is empty.
    pub fn choose_move(&self, board: &mut Board) -> Option<Decision> {
        self.choose_move_with_stats(board).0
    }

    /// Same as [`MoveEngine::choose_move`], also reporting search counters
    pub fn choose_move_with_stats(&self, board: &mut Board) -> (Option<Decision>, SearchStats) {
        let mut stats = SearchStats::default();

        let decision = if let Some(mv) = take_winning_cell(board) {
            Some(Decision { mv, tactic: Tactic::Win })
        } else if let Some(mv) = take_blocking_cell(board) {
            Some(Decision { mv, tactic: Tactic::Block })
        } else {
            search_best_cell(board, &mut stats).and_then(|(mv, score)| {
                board.place(mv.row, mv.col, Mark::Opponent).ok()?;
                Some(Decision {
                    mv,
                    tactic: Tactic::Search { score },
                })
            })
        };

        match decision {
            Some(d) => tracing::debug!(
                row = d.mv.row,
                col = d.mv.col,
                tactic = ?d.tactic,
                nodes = stats.nodes,
                "opponent move chosen"
            ),
            None => tracing::debug!("no empty cell left for the opponent"),
        }

        (decision, stats)
    }
}

// ============================================================================
// IMMEDIATE TACTICS
// ============================================================================

/// First empty cell (row-major) that completes an opponent line; the mark is kept
fn take_winning_cell(board: &mut Board) -> Option<Move> {
    let candidates: Vec<Move> = board.empty_cells().collect();
    for mv in candidates {
        let Ok(trial) = board.speculate(mv, Mark::Opponent) else {
            continue;
        };
        if trial.check_win(Mark::Opponent) {
            trial.commit();
            return Some(mv);
        }
    }
    None
}

/// First empty cell (row-major) the player would win on; the opponent takes it
fn take_blocking_cell(board: &mut Board) -> Option<Move> {
    let candidates: Vec<Move> = board.empty_cells().collect();
    for mv in candidates {
        let player_wins = board
            .speculate(mv, Mark::Player)
            .map_or(false, |trial| trial.check_win(Mark::Player));
        if player_wins && board.place(mv.row, mv.col, Mark::Opponent).is_ok() {
            return Some(mv);
        }
    }
    None
}

// ============================================================================
// MINIMAX WITH ALPHA-BETA
// ============================================================================

/// Score every empty cell as an opponent move and return the first strict maximum
fn search_best_cell(board: &mut Board, stats: &mut SearchStats) -> Option<(Move, i32)> {
    let mut best: Option<(Move, i32)> = None;

    let candidates: Vec<Move> = board.empty_cells().collect();
    for mv in candidates {
        let score = match board.speculate(mv, Mark::Opponent) {
            Ok(mut trial) => minimax(&mut trial, 0, false, i32::MIN, i32::MAX, stats),
            Err(_) => continue,
        };

        if best.map_or(true, |(_, best_score)| score > best_score) {
            best = Some((mv, score));
        }
    }

    best
}

/// Opponent-perspective score of `board`, with the opponent to move when
/// `maximizing`.
///
/// A cutoff (`beta <= alpha`) abandons the remaining cells of the current
/// row only; scanning resumes on the next row with the tightened window.
fn minimax(
    board: &mut Board,
    depth: i32,
    maximizing: bool,
    mut alpha: i32,
    mut beta: i32,
    stats: &mut SearchStats,
) -> i32 {
    stats.nodes += 1;

    if let Some(score) = terminal_score(board, depth) {
        return score;
    }

    let (mark, mut best) = if maximizing {
        (Mark::Opponent, i32::MIN)
    } else {
        (Mark::Player, i32::MAX)
    };

    let size = board.size();
    for row in 0..size {
        for col in 0..size {
            // Occupied cells are skipped
            let score = match board.speculate(Move::new(row, col), mark) {
                Ok(mut trial) => minimax(&mut trial, depth + 1, !maximizing, alpha, beta, stats),
                Err(_) => continue,
            };

            if maximizing {
                best = best.max(score);
                alpha = alpha.max(best);
            } else {
                best = best.min(score);
                beta = beta.min(best);
            }

            if beta <= alpha {
                break;
            }
        }
    }

    best
}

// ============================================================================
// RANDOM PLAYER
// ============================================================================

/// Plays a uniformly random empty cell; stands in for a human in matches
pub struct RandomPlayer {
    rng: ChaCha8Rng,
}

impl RandomPlayer {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Pick an empty cell without placing it
    pub fn choose_cell(&mut self, board: &Board) -> Option<Move> {
        let cells: Vec<Move> = board.empty_cells().collect();
        cells.choose(&mut self.rng).copied()
    }
}

// ============================================================================
// TESTS
// ============================================================================
