//! Square grid of marks with three-in-a-row detection

use std::fmt;
use std::ops::{Deref, DerefMut};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ParseBoardError, PlaceError};

/// Number of consecutive marks that wins, independent of board size
pub const WIN_LENGTH: usize = 3;

/// Line directions as (d_row, d_col): horizontal, vertical, diagonal, anti-diagonal
pub const DIRECTIONS: [(isize, isize); 4] = [
    (0, 1),  // horizontal
    (1, 0),  // vertical
    (1, 1),  // down-right
    (1, -1), // down-left
];

// ============================================================================
// MARKS AND MOVES
// ============================================================================

/// Content of a single cell
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mark {
    #[default]
    Empty,
    Player,
    Opponent,
}

impl Mark {
    /// The other side; `Empty` maps to itself
    pub fn opponent(self) -> Self {
        match self {
            Mark::Empty => Mark::Empty,
            Mark::Player => Mark::Opponent,
            Mark::Opponent => Mark::Player,
        }
    }

    /// Display symbol (player is always X, opponent always O)
    pub fn symbol(self) -> char {
        match self {
            Mark::Empty => '.',
            Mark::Player => 'X',
            Mark::Opponent => 'O',
        }
    }

    fn from_symbol(symbol: char) -> Option<Self> {
        match symbol {
            '.' | '_' | '-' => Some(Mark::Empty),
            'X' | 'x' => Some(Mark::Player),
            'O' | 'o' => Some(Mark::Opponent),
            _ => None,
        }
    }
}

/// A (row, col) coordinate, 0-indexed
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    pub row: usize,
    pub col: usize,
}

impl Move {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

// ============================================================================
// BOARD
// ============================================================================

/// N×N grid stored row-major.
///
/// Serializes as its text form, so a deserialized board is always square.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct Board {
    size: usize,
    cells: Vec<Mark>,
}

impl Board {
    /// Create an empty `size`×`size` board
    pub fn new(size: usize) -> Self {
        Self {
            size,
            cells: vec![Mark::Empty; size * size],
        }
    }

    /// Discard every mark and resize to `size`×`size`
    pub fn reset(&mut self, size: usize) {
        self.size = size;
        self.cells.clear();
        self.cells.resize(size * size, Mark::Empty);
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Mark at a cell, or `None` outside the grid
    pub fn get(&self, row: usize, col: usize) -> Option<Mark> {
        self.index(row, col).map(|i| self.cells[i])
    }

    /// True only for an in-bounds empty cell
    pub fn is_empty(&self, row: usize, col: usize) -> bool {
        self.get(row, col) == Some(Mark::Empty)
    }

    pub fn is_full(&self) -> bool {
        self.cells.iter().all(|&m| m != Mark::Empty)
    }

    /// Number of non-empty cells
    pub fn mark_count(&self) -> usize {
        self.cells.iter().filter(|&&m| m != Mark::Empty).count()
    }

    /// Empty cells in row-major order
    pub fn empty_cells(&self) -> impl Iterator<Item = Move> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, m)| **m == Mark::Empty)
            .map(move |(i, _)| Move::new(i / self.size, i % self.size))
    }

    /// Write `mark` into an empty cell. Occupied or out-of-range cells are
    /// rejected and the board is left as it was.
    pub fn place(&mut self, row: usize, col: usize, mark: Mark) -> Result<(), PlaceError> {
        if mark == Mark::Empty {
            return Err(PlaceError::EmptyMark);
        }
        let i = self.index(row, col).ok_or(PlaceError::OutOfBounds {
            row,
            col,
            size: self.size,
        })?;
        if self.cells[i] != Mark::Empty {
            return Err(PlaceError::Occupied { row, col });
        }
        self.cells[i] = mark;
        Ok(())
    }

    /// Trial placement that is undone when the returned guard drops,
    /// unless the guard is committed.
    ///
    /// Same rules as [`Board::place`]: occupied or out-of-range cells are
    /// rejected and nothing is written.
    pub fn speculate(&mut self, mv: Move, mark: Mark) -> Result<Speculation<'_>, PlaceError> {
        self.place(mv.row, mv.col, mark)?;
        let index = mv.row * self.size + mv.col;
        Ok(Speculation {
            board: self,
            index,
            committed: false,
        })
    }

    /// Whether `mark` has three consecutive cells in any row, column or diagonal
    pub fn check_win(&self, mark: Mark) -> bool {
        if mark == Mark::Empty {
            return false;
        }
        for row in 0..self.size {
            for col in 0..self.size {
                for &(dr, dc) in &DIRECTIONS {
                    if self.line_from(row, col, dr, dc, mark) {
                        return true;
                    }
                }
            }
        }
        false
    }

    /// Three cells of `mark` starting at (row, col) going (dr, dc), all inside the grid
    fn line_from(&self, row: usize, col: usize, dr: isize, dc: isize, mark: Mark) -> bool {
        (0..WIN_LENGTH as isize).all(|step| {
            let r = row as isize + dr * step;
            let c = col as isize + dc * step;
            r >= 0 && c >= 0 && self.get(r as usize, c as usize) == Some(mark)
        })
    }

    fn index(&self, row: usize, col: usize) -> Option<usize> {
        (row < self.size && col < self.size).then(|| row * self.size + col)
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (r, row) in self.cells.chunks(self.size.max(1)).enumerate() {
            if r > 0 {
                writeln!(f)?;
            }
            for &mark in row {
                write!(f, "{}", mark.symbol())?;
            }
        }
        Ok(())
    }
}

impl From<Board> for String {
    fn from(board: Board) -> Self {
        board.to_string()
    }
}

impl TryFrom<String> for Board {
    type Error = ParseBoardError;

    fn try_from(text: String) -> Result<Self, Self::Error> {
        text.parse()
    }
}

/// Parses whitespace-separated rows, e.g. `"OO. ... ..."`
impl FromStr for Board {
    type Err = ParseBoardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let rows: Vec<&str> = s.split_whitespace().collect();
        if rows.is_empty() {
            return Err(ParseBoardError::Empty);
        }

        let size = rows.len();
        let mut cells = Vec::with_capacity(size * size);
        for (row, text) in rows.iter().enumerate() {
            let width = text.chars().count();
            if width != size {
                return Err(ParseBoardError::NotSquare { row, width, size });
            }
            for (col, symbol) in text.chars().enumerate() {
                let mark = Mark::from_symbol(symbol)
                    .ok_or(ParseBoardError::UnknownSymbol { symbol, row, col })?;
                cells.push(mark);
            }
        }

        Ok(Self { size, cells })
    }
}

// ============================================================================
// SPECULATION GUARD
// ============================================================================

/// A trial mark on a borrowed board, retracted on drop
pub struct Speculation<'a> {
    board: &'a mut Board,
    index: usize,
    committed: bool,
}

impl Speculation<'_> {
    /// Keep the trial mark on the board
    pub fn commit(mut self) {
        self.committed = true;
    }
}

impl Deref for Speculation<'_> {
    type Target = Board;

    fn deref(&self) -> &Board {
        &*self.board
    }
}

impl DerefMut for Speculation<'_> {
    fn deref_mut(&mut self) -> &mut Board {
        &mut *self.board
    }
}

impl Drop for Speculation<'_> {
    fn drop(&mut self) {
        if !self.committed {
            self.board.cells[self.index] = Mark::Empty;
        }
    }
}
