//! Draw resolution
//!
//! When every hand and deck is empty without a winner, the color with the
//! most short runs (length 2 to 4) takes the game, ties going to the higher
//! summed card value.

use serde::{Deserialize, Serialize};

use crate::board::{Bitboard, Board, Color, DIRECTIONS};
use crate::player::Player;

/// Longest stretch a single walk inspects
const MAX_WALK: i32 = 4;

/// Runs counted for one color during draw resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SequenceTally {
    pub sequences: u32,
    pub total_value: u32,
}

/// Count `color`'s runs of length >= 2.
///
/// Each not-yet-counted cell starts a walk of up to 4 cells in every
/// direction; walked cells are marked counted and never start a walk
/// themselves.
pub fn count_sequences(board: &Board, color: Color) -> SequenceTally {
    let mine = board.cells_of(color);
    let mut counted = Bitboard::new();
    let mut tally = SequenceTally::default();

    for start in mine.iter_ones() {
        if counted.get(start) {
            continue;
        }
        for &(dr, dc) in &DIRECTIONS {
            let mut len = 0;
            let mut value = 0;
            for k in 0..MAX_WALK {
                let Some(pos) = start.offset(dr, dc, k) else {
                    break;
                };
                let Some(card) = board.get(pos).filter(|card| card.color == color) else {
                    break;
                };
                len += 1;
                value += card.value as u32;
                counted.set(pos);
            }
            if len >= 2 {
                tally.sequences += 1;
                tally.total_value += value;
            }
        }
    }
    tally
}

/// Pick the draw winner among the seated colors.
///
/// Most sequences first, then higher total value; exact ties keep the
/// earlier seat. `None` when no seated color holds a single run.
pub fn resolve_draw(board: &Board) -> Option<Color> {
    let mut best: Option<(Color, SequenceTally)> = None;
    for &color in board.seats() {
        let tally = count_sequences(board, color);
        let better = match best {
            None => true,
            Some((_, top)) => {
                (tally.sequences, tally.total_value) > (top.sequences, top.total_value)
            }
        };
        if better {
            best = Some((color, tally));
        }
    }
    best.filter(|(_, tally)| tally.sequences > 0).map(|(color, _)| color)
}

/// True when no player has a card left to play
pub fn hands_exhausted(players: &[Player]) -> bool {
    players
        .iter()
        .all(|p| p.hand.is_empty() && p.deck.is_empty())
}
