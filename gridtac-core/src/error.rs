//! Error types

use thiserror::Error;

use crate::game::GameStatus;

/// Smallest supported board edge
pub const MIN_BOARD_SIZE: usize = 3;

/// A mark could not be written to the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PlaceError {
    #[error("cell ({row}, {col}) is outside the {size}x{size} board")]
    OutOfBounds { row: usize, col: usize, size: usize },

    #[error("cell ({row}, {col}) is already occupied")]
    Occupied { row: usize, col: usize },

    #[error("cannot place an empty mark")]
    EmptyMark,
}

/// A player move the session ignored; the game is left untouched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MoveRejected {
    #[error(transparent)]
    Cell(#[from] PlaceError),

    #[error("game is already over ({0})")]
    GameOver(GameStatus),
}

/// Invalid game configuration
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("board size {size} is too small (minimum {min})")]
    InvalidSize { size: usize, min: usize },
}

/// Board text could not be parsed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseBoardError {
    #[error("board text is empty")]
    Empty,

    #[error("row {row} has {width} cells, expected {size}")]
    NotSquare { row: usize, width: usize, size: usize },

    #[error("unknown symbol '{symbol}' at ({row}, {col})")]
    UnknownSymbol { symbol: char, row: usize, col: usize },
}

/// Unrecognized first-mover name
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown first mover '{input}' (expected player, opponent or random)")]
pub struct ParseFirstMoverError {
    pub input: String,
}

/// Check a board size against [`MIN_BOARD_SIZE`]
pub fn validate_size(size: usize) -> Result<usize, GameError> {
    if size < MIN_BOARD_SIZE {
        return Err(GameError::InvalidSize {
            size,
            min: MIN_BOARD_SIZE,
        });
    }
    Ok(size)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_size() {
        assert_eq!(validate_size(3), Ok(3));
        assert_eq!(validate_size(7), Ok(7));
        assert_eq!(
            validate_size(2),
            Err(GameError::InvalidSize { size: 2, min: 3 })
        );
    }

    #[test]
    fn test_messages() {
        let err = MoveRejected::from(PlaceError::Occupied { row: 0, col: 2 });
        assert_eq!(err.to_string(), "cell (0, 2) is already occupied");
        assert_eq!(
            MoveRejected::GameOver(GameStatus::Draw).to_string(),
            "game is already over (draw)"
        );
    }
}
