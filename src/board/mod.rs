//! Board representation for Punto

pub mod bitboard;
pub mod board;

// Re-exports
pub use bitboard::Bitboard;
pub use board::{Board, Probe};

use serde::{Deserialize, Serialize};
use std::fmt;

/// Board size (9x9)
pub const BOARD_SIZE: usize = 9;
pub const TOTAL_CELLS: usize = BOARD_SIZE * BOARD_SIZE; // 81

/// The only legal target before the first card is played
pub const CENTER: Pos = Pos { row: 4, col: 4 };

pub const MIN_CARD_VALUE: u8 = 1;
pub const MAX_CARD_VALUE: u8 = 9;
/// Each color owns two cards of every value
pub const COPIES_PER_VALUE: usize = 2;
pub const DECK_SIZE: usize = COPIES_PER_VALUE * MAX_CARD_VALUE as usize; // 18
pub const HAND_SIZE: usize = 3;

/// Line directions: horizontal, vertical, diagonal, anti-diagonal
pub const DIRECTIONS: [(i32, i32); 4] = [(0, 1), (1, 0), (1, 1), (1, -1)];

/// All 8 neighbor offsets
pub const NEIGHBORS: [(i32, i32); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// Errors raised when building boards, cards or moves from raw input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BoardError {
    #[error("card value {0} outside {MIN_CARD_VALUE}..={MAX_CARD_VALUE}")]
    InvalidCardValue(u8),
    #[error("position ({row}, {col}) is off the {BOARD_SIZE}x{BOARD_SIZE} board")]
    OffBoard { row: i32, col: i32 },
    #[error("a game seats 2 to 4 players, got {0}")]
    SeatCount(usize),
    #[error("{0} is seated twice")]
    DuplicateSeat(Color),
    #[error("{card} cannot be placed at {pos}")]
    IllegalPlacement { pos: Pos, card: Card },
}

/// Card colors, one per seat
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    Red,
    Green,
    Blue,
    Yellow,
}

impl Color {
    pub const ALL: [Color; 4] = [Color::Red, Color::Green, Color::Blue, Color::Yellow];
    pub const COUNT: usize = 4;

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Color::Red => "red",
            Color::Green => "green",
            Color::Blue => "blue",
            Color::Yellow => "yellow",
        };
        f.write_str(name)
    }
}

/// A numbered card. Higher values may cover lower ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Card {
    pub value: u8,
    pub color: Color,
}

impl Card {
    #[inline]
    pub fn new(value: u8, color: Color) -> Self {
        debug_assert!((MIN_CARD_VALUE..=MAX_CARD_VALUE).contains(&value));
        Self { value, color }
    }

    pub fn try_new(value: u8, color: Color) -> Result<Self, BoardError> {
        if (MIN_CARD_VALUE..=MAX_CARD_VALUE).contains(&value) {
            Ok(Self { value, color })
        } else {
            Err(BoardError::InvalidCardValue(value))
        }
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.color, self.value)
    }
}

/// Position on the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pos {
    pub row: u8,
    pub col: u8,
}

impl Pos {
    #[inline]
    pub fn new(row: u8, col: u8) -> Self {
        debug_assert!(row < BOARD_SIZE as u8 && col < BOARD_SIZE as u8);
        Self { row, col }
    }

    pub fn try_new(row: i32, col: i32) -> Result<Self, BoardError> {
        if Self::is_valid(row, col) {
            Ok(Self { row: row as u8, col: col as u8 })
        } else {
            Err(BoardError::OffBoard { row, col })
        }
    }

    #[inline]
    pub fn to_index(self) -> usize {
        self.row as usize * BOARD_SIZE + self.col as usize
    }

    #[inline]
    pub fn from_index(idx: usize) -> Self {
        Self {
            row: (idx / BOARD_SIZE) as u8,
            col: (idx % BOARD_SIZE) as u8,
        }
    }

    #[inline]
    pub fn is_valid(row: i32, col: i32) -> bool {
        row >= 0 && row < BOARD_SIZE as i32 && col >= 0 && col < BOARD_SIZE as i32
    }

    /// Step `k` cells along `(dr, dc)`, or `None` past the edge
    #[inline]
    pub fn offset(self, dr: i32, dc: i32, k: i32) -> Option<Pos> {
        let r = self.row as i32 + dr * k;
        let c = self.col as i32 + dc * k;
        if Self::is_valid(r, c) {
            Some(Pos { row: r as u8, col: c as u8 })
        } else {
            None
        }
    }

    /// Manhattan distance to the center cell
    #[inline]
    pub fn center_distance(self) -> i32 {
        (self.row as i32 - CENTER.row as i32).abs() + (self.col as i32 - CENTER.col as i32).abs()
    }

    /// Row-major iteration over every cell
    pub fn all() -> impl Iterator<Item = Pos> {
        (0..TOTAL_CELLS).map(Pos::from_index)
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

impl PartialOrd for Pos {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Pos {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.to_index().cmp(&other.to_index())
    }
}

/// A candidate placement. Never stored on the board itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    pub pos: Pos,
    pub card: Card,
}

impl Move {
    #[inline]
    pub fn new(pos: Pos, card: Card) -> Self {
        Self { pos, card }
    }

    #[inline]
    pub fn row(&self) -> u8 {
        self.pos.row
    }

    #[inline]
    pub fn col(&self) -> u8 {
        self.pos.col
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at {}", self.card, self.pos)
    }
}
