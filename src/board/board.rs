//! Board structure with stacking and scoped probing

use std::ops::{Deref, DerefMut};

use super::bitboard::Bitboard;
use super::{BoardError, Card, Color, Move, Pos, BOARD_SIZE, CENTER, TOTAL_CELLS};

/// Game board: one optional top card per cell plus per-color bitboards
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    cells: [Option<Card>; TOTAL_CELLS],
    /// All occupied cells
    occupied: Bitboard,
    /// Occupied cells per color, indexed by `Color::index`
    colors: [Bitboard; Color::COUNT],
    first_move_placed: bool,
    /// 5 for two players, 4 for three or four
    win_length: u8,
    /// Seated colors in turn order
    seats: Vec<Color>,
}

impl Board {
    /// Empty board for the given seats. The win length follows the seat count.
    pub fn new(seats: &[Color]) -> Self {
        let win_length = if seats.len() <= 2 { 5 } else { 4 };
        Self::with_win_length(seats, win_length)
    }

    /// Empty board, rejecting seat lists a real game can't have
    pub fn try_new(seats: &[Color]) -> Result<Self, BoardError> {
        if !(2..=4).contains(&seats.len()) {
            return Err(BoardError::SeatCount(seats.len()));
        }
        for (i, color) in seats.iter().enumerate() {
            if seats[..i].contains(color) {
                return Err(BoardError::DuplicateSeat(*color));
            }
        }
        Ok(Self::new(seats))
    }

    /// Empty board with an explicit win length
    pub fn with_win_length(seats: &[Color], win_length: u8) -> Self {
        Self {
            cells: [None; TOTAL_CELLS],
            occupied: Bitboard::new(),
            colors: [Bitboard::new(); Color::COUNT],
            first_move_placed: false,
            win_length,
            seats: seats.to_vec(),
        }
    }

    /// Board with `card` already played on the center
    pub fn opened(seats: &[Color], card: Card) -> Self {
        let mut board = Self::new(seats);
        board.place_card(CENTER, card);
        board
    }

    #[inline]
    pub fn size(&self) -> usize {
        BOARD_SIZE
    }

    #[inline]
    pub fn win_length(&self) -> u8 {
        self.win_length
    }

    #[inline]
    pub fn first_move_placed(&self) -> bool {
        self.first_move_placed
    }

    #[inline]
    pub fn seats(&self) -> &[Color] {
        &self.seats
    }

    /// Every seated color except `color`
    pub fn opponents(&self, color: Color) -> impl Iterator<Item = Color> + '_ {
        self.seats.iter().copied().filter(move |&c| c != color)
    }

    /// Top card at position
    #[inline]
    pub fn get(&self, pos: Pos) -> Option<Card> {
        self.cells[pos.to_index()]
    }

    /// Color of the top card at position
    #[inline]
    pub fn color_at(&self, pos: Pos) -> Option<Color> {
        self.cells[pos.to_index()].map(|card| card.color)
    }

    #[inline]
    pub fn is_empty(&self, pos: Pos) -> bool {
        !self.occupied.get(pos)
    }

    #[inline]
    pub fn is_board_empty(&self) -> bool {
        self.occupied.is_empty()
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.occupied.count() as usize == TOTAL_CELLS
    }

    #[inline]
    pub fn occupied(&self) -> Bitboard {
        self.occupied
    }

    /// Bitboard of cells whose top card has `color`
    #[inline]
    pub fn cells_of(&self, color: Color) -> Bitboard {
        self.colors[color.index()]
    }

    /// Cells touching at least one card
    #[inline]
    pub fn frontier(&self) -> Bitboard {
        self.occupied.neighbors()
    }

    /// Total cards visible on the board
    #[inline]
    pub fn card_count(&self) -> u32 {
        self.occupied.count()
    }

    /// Permanently place a card, covering whatever was there.
    /// Returns the covered card. Legality is the caller's concern; see `play`.
    pub fn place_card(&mut self, pos: Pos, card: Card) -> Option<Card> {
        let covered = self.set_cell(pos, Some(card));
        self.first_move_placed = true;
        covered
    }

    /// Place a card after checking the placement rule
    pub fn play(&mut self, mv: Move) -> Result<Option<Card>, BoardError> {
        if !crate::rules::is_legal_placement(self, mv.pos, mv.card.value) {
            return Err(BoardError::IllegalPlacement {
                pos: mv.pos,
                card: mv.card,
            });
        }
        Ok(self.place_card(mv.pos, mv.card))
    }

    /// Temporarily place `card` at `pos`. The previous cell content and the
    /// first-move flag come back when the returned guard is dropped.
    #[inline]
    pub fn probe(&mut self, pos: Pos, card: Card) -> Probe<'_> {
        let was_placed = self.first_move_placed;
        let covered = self.set_cell(pos, Some(card));
        self.first_move_placed = true;
        Probe {
            board: self,
            pos,
            covered,
            was_placed,
        }
    }

    /// Write a cell and keep the bitboards in sync. Returns the old content.
    fn set_cell(&mut self, pos: Pos, content: Option<Card>) -> Option<Card> {
        let idx = pos.to_index();
        let old = std::mem::replace(&mut self.cells[idx], content);
        if let Some(card) = old {
            self.colors[card.color.index()].clear(pos);
        }
        match content {
            Some(card) => {
                self.colors[card.color.index()].set(pos);
                self.occupied.set(pos);
            }
            None => self.occupied.clear(pos),
        }
        old
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new(&[Color::Red, Color::Green])
    }
}

/// Scoped placement on a board. Dereferences to the probed board and
/// restores the touched cell on drop, including early returns and breaks.
pub struct Probe<'a> {
    board: &'a mut Board,
    pos: Pos,
    covered: Option<Card>,
    was_placed: bool,
}

impl Probe<'_> {
    /// Card that the probe is covering, if any
    #[inline]
    pub fn covered(&self) -> Option<Card> {
        self.covered
    }

    #[inline]
    pub fn pos(&self) -> Pos {
        self.pos
    }
}

impl Deref for Probe<'_> {
    type Target = Board;

    fn deref(&self) -> &Board {
        self.board
    }
}

impl DerefMut for Probe<'_> {
    fn deref_mut(&mut self) -> &mut Board {
        self.board
    }
}

impl Drop for Probe<'_> {
    fn drop(&mut self) {
        self.board.set_cell(self.pos, self.covered);
        self.board.first_move_placed = self.was_placed;
    }
}
