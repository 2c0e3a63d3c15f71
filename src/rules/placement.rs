//! Placement rule
//!
//! Before the first card only the center is playable. Afterwards a target
//! must touch an occupied cell (8-neighborhood) and be either empty or
//! hold a strictly lower card.

use crate::board::{Board, Pos, CENTER};

/// True when `pos` touches at least one card
#[inline]
fn is_adjacent(board: &Board, pos: Pos) -> bool {
    board.frontier().get(pos)
}

/// Empty cell that may receive any card.
///
/// Used for theoretical moves and open-end checks, where the card value is
/// unknown.
#[inline]
pub fn is_open_cell(board: &Board, pos: Pos) -> bool {
    if !board.first_move_placed() {
        return pos == CENTER;
    }
    board.is_empty(pos) && is_adjacent(board, pos)
}

/// Whether a card of `value` may be placed at `pos`
#[inline]
pub fn is_legal_placement(board: &Board, pos: Pos, value: u8) -> bool {
    if !board.first_move_placed() {
        return pos == CENTER;
    }
    if let Some(occupant) = board.get(pos) {
        if occupant.value >= value {
            return false;
        }
    }
    is_adjacent(board, pos)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{Card, Color, Pos};

    const SEATS: [Color; 2] = [Color::Red, Color::Blue];

    #[test]
    fn test_empty_board_only_center() {
        let board = Board::new(&SEATS);
        for pos in Pos::all() {
            for value in 1..=9 {
                assert_eq!(is_legal_placement(&board, pos, value), pos == CENTER);
            }
            assert_eq!(is_open_cell(&board, pos), pos == CENTER);
        }
    }

    #[test]
    fn test_stacking_requires_strictly_higher() {
        let mut board = Board::opened(&SEATS, Card::new(9, Color::Red));
        let target = Pos::new(4, 5);
        board.place_card(target, Card::new(5, Color::Red));

        assert!(is_legal_placement(&board, target, 7));
        assert!(!is_legal_placement(&board, target, 5));
        assert!(!is_legal_placement(&board, target, 3));
        assert!(!is_open_cell(&board, target));
    }

    #[test]
    fn test_adjacency_required() {
        let board = Board::opened(&SEATS, Card::new(3, Color::Red));
        assert!(is_legal_placement(&board, Pos::new(3, 3), 1));
        assert!(is_legal_placement(&board, Pos::new(5, 4), 1));
        assert!(!is_legal_placement(&board, Pos::new(2, 4), 9));
        assert!(!is_open_cell(&board, Pos::new(4, 6)));
    }

    #[test]
    fn test_isolated_occupied_cell_still_stackable_when_touching() {
        let mut board = Board::opened(&SEATS, Card::new(3, Color::Red));
        board.place_card(Pos::new(3, 3), Card::new(4, Color::Blue));
        // The center touches (3,3), so a higher card may cover it.
        assert!(is_legal_placement(&board, CENTER, 4));
        assert!(!is_legal_placement(&board, CENTER, 3));
    }
}
