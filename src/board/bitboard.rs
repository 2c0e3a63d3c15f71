//! Bitboard implementation for fast occupancy and adjacency queries

use super::{Pos, BOARD_SIZE, TOTAL_CELLS};

/// Mask of the 81 valid cells
const FULL: u128 = (1u128 << TOTAL_CELLS) - 1;

const fn column_mask(col: usize) -> u128 {
    let mut mask = 0u128;
    let mut row = 0;
    while row < BOARD_SIZE {
        mask |= 1u128 << (row * BOARD_SIZE + col);
        row += 1;
    }
    mask
}

const NOT_FIRST_COL: u128 = FULL & !column_mask(0);
const NOT_LAST_COL: u128 = FULL & !column_mask(BOARD_SIZE - 1);

/// Bitboard representation of a 9x9 cell set.
/// A single u128 covers all 81 cells (row-major, bit = row * 9 + col).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Bitboard {
    bits: u128,
}

impl Bitboard {
    /// Create empty bitboard
    pub const fn new() -> Self {
        Self { bits: 0 }
    }

    /// Bitboard with every cell set
    pub const fn full() -> Self {
        Self { bits: FULL }
    }

    /// Set a bit at position
    #[inline]
    pub fn set(&mut self, pos: Pos) {
        self.bits |= 1u128 << pos.to_index();
    }

    /// Clear a bit at position
    #[inline]
    pub fn clear(&mut self, pos: Pos) {
        self.bits &= !(1u128 << pos.to_index());
    }

    /// Check if bit is set at position
    #[inline]
    pub fn get(&self, pos: Pos) -> bool {
        (self.bits >> pos.to_index()) & 1 == 1
    }

    /// Count total set bits (popcount)
    #[inline]
    pub fn count(&self) -> u32 {
        self.bits.count_ones()
    }

    /// Check if empty
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bits == 0
    }

    #[inline]
    pub fn and(self, other: Bitboard) -> Bitboard {
        Bitboard { bits: self.bits & other.bits }
    }

    #[inline]
    pub fn or(self, other: Bitboard) -> Bitboard {
        Bitboard { bits: self.bits | other.bits }
    }

    /// Cells not in this set (within the board)
    #[inline]
    pub fn complement(self) -> Bitboard {
        Bitboard { bits: !self.bits & FULL }
    }

    /// Cells with at least one 8-neighbor in this set.
    ///
    /// A set cell is only included when another set cell touches it.
    #[inline]
    pub fn neighbors(self) -> Bitboard {
        let b = self.bits;
        let east = (b & NOT_LAST_COL) << 1;
        let west = (b & NOT_FIRST_COL) >> 1;
        let row = b | east | west;
        let vertical = (row << BOARD_SIZE) | (row >> BOARD_SIZE);
        Bitboard {
            bits: (east | west | vertical) & FULL,
        }
    }

    /// Iterate over set bit positions in row-major order
    pub fn iter_ones(&self) -> BitboardIter {
        BitboardIter { bits: self.bits }
    }
}

/// Iterator over set bits in a Bitboard
pub struct BitboardIter {
    bits: u128,
}

impl Iterator for BitboardIter {
    type Item = Pos;

    fn next(&mut self) -> Option<Self::Item> {
        if self.bits == 0 {
            return None;
        }
        let idx = self.bits.trailing_zeros() as usize;
        // Clear the bit we just found
        self.bits &= self.bits - 1;
        Some(Pos::from_index(idx))
    }
}
