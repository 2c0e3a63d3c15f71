//! Win condition checking
//!
//! A color wins with `win_length` of its cards in a row (5 with two
//! players, 4 with three or four) in any of the four line directions.
//! Only the top card of a cell counts.

use crate::board::{Board, Color, Pos, DIRECTIONS};

/// Length of the same-color line through `pos` along `(dr, dc)`
#[inline]
fn line_length(board: &Board, pos: Pos, (dr, dc): (i32, i32), color: Color) -> u8 {
    let mine = board.cells_of(color);
    let mut count = 1u8;
    for sign in [1, -1] {
        let mut k = 1;
        while let Some(next) = pos.offset(dr * sign, dc * sign, k) {
            if !mine.get(next) {
                break;
            }
            count += 1;
            k += 1;
        }
    }
    count
}

/// Fast win check through a specific position.
///
/// Only looks at the 4 lines crossing `pos`; `pos` is assumed to hold `color`.
#[inline]
pub fn has_line_through(board: &Board, pos: Pos, color: Color) -> bool {
    let target = board.win_length();
    DIRECTIONS
        .iter()
        .any(|&dir| line_length(board, pos, dir, color) >= target)
}

/// Find the cells of a winning line for `color`, starting from its first cell.
pub fn find_winning_line(board: &Board, color: Color) -> Option<Vec<Pos>> {
    let mine = board.cells_of(color);
    let target = board.win_length() as usize;

    for pos in mine.iter_ones() {
        for &(dr, dc) in &DIRECTIONS {
            // Only start from the first cell of a run
            if pos.offset(-dr, -dc, 1).is_some_and(|prev| mine.get(prev)) {
                continue;
            }
            let line: Vec<Pos> = (0..)
                .map_while(|k| pos.offset(dr, dc, k))
                .take_while(|&p| mine.get(p))
                .collect();
            if line.len() >= target {
                return Some(line);
            }
        }
    }
    None
}

/// Check if `color` has a winning line anywhere on the board
#[inline]
pub fn has_winning_line(board: &Board, color: Color) -> bool {
    find_winning_line(board, color).is_some()
}

/// First seated color holding a winning line, in seat order
pub fn check_winner(board: &Board) -> Option<Color> {
    board
        .seats()
        .iter()
        .copied()
        .find(|&color| has_winning_line(board, color))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{Card, CENTER};

    const TWO: [Color; 2] = [Color::Red, Color::Blue];
    const THREE: [Color; 3] = [Color::Red, Color::Green, Color::Blue];

    fn place_line(board: &mut Board, cells: &[(u8, u8)], color: Color) {
        for &(r, c) in cells {
            board.place_card(Pos::new(r, c), Card::new(3, color));
        }
    }

    #[test]
    fn test_four_wins_with_three_players() {
        let mut board = Board::new(&THREE);
        place_line(&mut board, &[(2, 2), (2, 3), (2, 4)], Color::Green);
        assert!(!has_winning_line(&board, Color::Green));
        place_line(&mut board, &[(2, 5)], Color::Green);
        assert!(has_winning_line(&board, Color::Green));
        assert_eq!(check_winner(&board), Some(Color::Green));
        assert!(has_line_through(&board, Pos::new(2, 3), Color::Green));
    }

    #[test]
    fn test_two_players_need_five() {
        let mut board = Board::new(&TWO);
        place_line(&mut board, &[(0, 0), (1, 1), (2, 2), (3, 3)], Color::Red);
        assert!(!has_winning_line(&board, Color::Red));
        place_line(&mut board, &[(4, 4)], Color::Red);
        assert_eq!(
            find_winning_line(&board, Color::Red),
            Some((0..5).map(|i| Pos::new(i, i)).collect())
        );
    }

    #[test]
    fn test_anti_diagonal() {
        let mut board = Board::new(&THREE);
        place_line(&mut board, &[(1, 7), (2, 6), (3, 5), (4, 4)], Color::Blue);
        assert!(has_winning_line(&board, Color::Blue));
        assert!(has_line_through(&board, CENTER, Color::Blue));
    }

    #[test]
    fn test_covered_card_breaks_line() {
        let mut board = Board::new(&THREE);
        place_line(&mut board, &[(5, 1), (5, 2), (5, 3), (5, 4)], Color::Red);
        assert!(has_winning_line(&board, Color::Red));
        board.place_card(Pos::new(5, 2), Card::new(9, Color::Green));
        assert!(!has_winning_line(&board, Color::Red));
        assert_eq!(check_winner(&board), None);
    }

    #[test]
    fn test_line_does_not_wrap_rows() {
        let mut board = Board::new(&THREE);
        place_line(&mut board, &[(0, 7), (0, 8), (1, 0), (1, 1)], Color::Red);
        assert!(!has_winning_line(&board, Color::Red));
    }
}
