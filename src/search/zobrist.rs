//! Zobrist hashing for position identification
//!
//! Every `(cell, color, value)` triple gets a random key, so a board hash is
//! the XOR of the keys of its top cards. Placing or covering a card is an O(1)
//! update, and undoing it is the same update again.
//!
//! The seated colors and the win length are folded in as well. A cached score
//! depends on who can win and how, and the tables outlive a single game.
//!
//! # Example
//!
//! ```
//! use punto::board::{Board, Card, Color, Pos};
//! use punto::search::ZobristTable;
//!
//! let zt = ZobristTable::new();
//! let mut board = Board::new(&[Color::Red, Color::Blue]);
//! let hash1 = zt.hash(&board);
//!
//! let pos = Pos::new(4, 4);
//! let card = Card::new(7, Color::Red);
//! let covered = board.place_card(pos, card);
//!
//! // Incremental update is equivalent to full recomputation
//! assert_eq!(zt.update(hash1, pos, covered, card), zt.hash(&board));
//! ```

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::board::{Board, Card, Color, Pos, BOARD_SIZE, MAX_CARD_VALUE, TOTAL_CELLS};

const VALUES: usize = MAX_CARD_VALUE as usize;

/// Fixed seed so hashes are reproducible across runs
const ZOBRIST_SEED: u64 = 0x5EED_0F_CA4D5;

/// Zobrist hash table for position hashing.
pub struct ZobristTable {
    /// Keys indexed by `[cell][color][value - 1]`
    cards: Vec<[[u64; VALUES]; Color::COUNT]>,
    /// Folded in once per search so each AI color gets its own keyspace
    perspective: [u64; Color::COUNT],
    /// One key per seated color
    seats: [u64; Color::COUNT],
    /// Indexed by win length, clamped to the board size
    win_length: [u64; BOARD_SIZE + 1],
}

impl ZobristTable {
    /// Create a new Zobrist table with deterministic random values.
    #[must_use]
    pub fn new() -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(ZOBRIST_SEED);

        let cards = (0..TOTAL_CELLS)
            .map(|_| {
                let mut cell = [[0u64; VALUES]; Color::COUNT];
                for color in cell.iter_mut() {
                    for key in color.iter_mut() {
                        *key = rng.gen();
                    }
                }
                cell
            })
            .collect();

        let mut perspective = [0u64; Color::COUNT];
        let mut seats = [0u64; Color::COUNT];
        let mut win_length = [0u64; BOARD_SIZE + 1];
        for key in perspective.iter_mut().chain(&mut seats).chain(&mut win_length) {
            *key = rng.gen();
        }

        Self {
            cards,
            perspective,
            seats,
            win_length,
        }
    }

    #[inline]
    fn key(&self, pos: Pos, card: Card) -> u64 {
        self.cards[pos.to_index()][card.color.index()][card.value as usize - 1]
    }

    /// Full hash of the cards on `board` under its seats and win length.
    #[must_use]
    pub fn hash(&self, board: &Board) -> u64 {
        let rules = board
            .seats()
            .iter()
            .fold(self.win_length[(board.win_length() as usize).min(BOARD_SIZE)], |h, c| {
                h ^ self.seats[c.index()]
            });
        board
            .occupied()
            .iter_ones()
            .filter_map(|pos| board.get(pos).map(|card| self.key(pos, card)))
            .fold(rules, |h, k| h ^ k)
    }

    /// Hash seen from one searching color
    #[inline]
    #[must_use]
    pub fn with_perspective(&self, hash: u64, color: Color) -> u64 {
        hash ^ self.perspective[color.index()]
    }

    /// Incrementally update a hash after `card` replaces `covered` at `pos`.
    ///
    /// Applying the same update again undoes it.
    #[inline]
    #[must_use]
    pub fn update(&self, hash: u64, pos: Pos, covered: Option<Card>, card: Card) -> u64 {
        let old = covered.map_or(0, |c| self.key(pos, c));
        hash ^ old ^ self.key(pos, card)
    }
}

impl Default for ZobristTable {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SEATS: [Color; 3] = [Color::Red, Color::Green, Color::Blue];

    #[test]
    fn test_zobrist_empty_board() {
        let zt = ZobristTable::new();
        assert_eq!(zt.hash(&Board::new(&SEATS)), zt.hash(&Board::new(&SEATS)));
        assert_ne!(zt.hash(&Board::new(&SEATS)), 0);
    }

    #[test]
    fn test_zobrist_seats_and_win_length_matter() {
        let zt = ZobristTable::new();
        let card = Card::new(4, Color::Red);
        let three = Board::opened(&SEATS, card);
        let two = Board::opened(&[Color::Red, Color::Green], card);
        let other_two = Board::opened(&[Color::Red, Color::Blue], card);
        let mut longer = Board::with_win_length(&SEATS, 5);
        longer.place_card(Pos::new(4, 4), card);

        assert_ne!(zt.hash(&three), zt.hash(&two));
        assert_ne!(zt.hash(&two), zt.hash(&other_two));
        assert_ne!(zt.hash(&three), zt.hash(&longer));
        // Seat order is not part of the rules
        let reordered = Board::opened(&[Color::Blue, Color::Red, Color::Green], card);
        assert_eq!(zt.hash(&three), zt.hash(&reordered));
    }

    #[test]
    fn test_zobrist_deterministic() {
        let zt1 = ZobristTable::new();
        let zt2 = ZobristTable::new();
        let board = Board::opened(&SEATS, Card::new(4, Color::Green));
        assert_eq!(zt1.hash(&board), zt2.hash(&board));
    }

    #[test]
    fn test_zobrist_incremental_stack() {
        let zt = ZobristTable::new();
        let mut board = Board::opened(&SEATS, Card::new(3, Color::Red));
        board.place_card(Pos::new(4, 5), Card::new(2, Color::Blue));
        let h0 = zt.hash(&board);

        let card = Card::new(6, Color::Green);
        let covered = board.place_card(Pos::new(4, 5), card);
        let h1 = zt.update(h0, Pos::new(4, 5), covered, card);
        assert_eq!(h1, zt.hash(&board));

        // Same update restores the old hash
        assert_eq!(zt.update(h1, Pos::new(4, 5), covered, card), h0);
    }

    #[test]
    fn test_zobrist_value_and_color_matter() {
        let zt = ZobristTable::new();
        let a = Board::opened(&SEATS, Card::new(4, Color::Red));
        let b = Board::opened(&SEATS, Card::new(5, Color::Red));
        let c = Board::opened(&SEATS, Card::new(4, Color::Blue));
        assert_ne!(zt.hash(&a), zt.hash(&b));
        assert_ne!(zt.hash(&a), zt.hash(&c));
    }

    #[test]
    fn test_zobrist_same_position_different_path() {
        let zt = ZobristTable::new();
        let mut board1 = Board::new(&SEATS);
        let mut board2 = Board::new(&SEATS);

        board1.place_card(Pos::new(4, 4), Card::new(1, Color::Red));
        board1.place_card(Pos::new(4, 5), Card::new(2, Color::Blue));

        board2.place_card(Pos::new(4, 5), Card::new(2, Color::Blue));
        board2.place_card(Pos::new(4, 4), Card::new(1, Color::Red));

        assert_eq!(zt.hash(&board1), zt.hash(&board2));
    }

    #[test]
    fn test_zobrist_perspective_separates_colors() {
        let zt = ZobristTable::new();
        let h = zt.hash(&Board::opened(&SEATS, Card::new(4, Color::Red)));
        assert_ne!(zt.with_perspective(h, Color::Red), zt.with_perspective(h, Color::Blue));
        assert_eq!(zt.with_perspective(zt.with_perspective(h, Color::Red), Color::Red), h);
    }
}
