//! Terminal scoring for the search

use crate::board::{Board, Mark};

/// Score of an opponent win found at ply 0
pub const WIN_SCORE: i32 = 10;

/// Plies beyond the root candidate that the search expands.
/// Positions deeper than this score as a draw.
pub const DEPTH_LIMIT: i32 = 4;

/// Score a position from the opponent's point of view, or `None` if the
/// search should keep expanding it.
///
/// Order matters: an opponent line is checked before a player line, and both
/// before the full-board / depth cutoff.
pub fn terminal_score(board: &Board, depth: i32) -> Option<i32> {
    if board.check_win(Mark::Opponent) {
        return Some(WIN_SCORE - depth);
    }
    if board.check_win(Mark::Player) {
        return Some(depth - WIN_SCORE);
    }
    if board.is_full() || depth > DEPTH_LIMIT {
        return Some(0);
    }
    None
}
