//! Move generation and cheap one-ply move ordering
//!
//! Two generators:
//! - `legal_moves`: concrete moves for a known hand, under the full placement rule
//! - `theoretical_moves`: every open cell with a placeholder card, standing in
//!   for an opponent whose hand is hidden

use crate::board::{Board, Card, Color, Move, Pos, CENTER, DIRECTIONS};
use crate::eval::line_run;
use crate::rules::is_legal_placement;

/// Card value assumed for theoretical moves
pub const THEORETICAL_VALUE: u8 = 5;

/// Reach of the ordering scan on each side of the move
const ORDERING_REACH: i32 = 3;

/// Cells that could possibly take some card: the center before the first
/// move, afterwards every cell touching a card.
fn candidate_cells(board: &Board) -> Vec<Pos> {
    if !board.first_move_placed() {
        return vec![CENTER];
    }
    board.frontier().iter_ones().collect()
}

/// Every legal move for `hand`, in hand order then row-major order.
#[must_use]
pub fn legal_moves(hand: &[Card], board: &Board) -> Vec<Move> {
    let cells = candidate_cells(board);
    let mut moves = Vec::with_capacity(hand.len() * cells.len());
    for &card in hand {
        for &pos in &cells {
            if is_legal_placement(board, pos, card.value) {
                moves.push(Move::new(pos, card));
            }
        }
    }
    moves
}

/// One placeholder move per open cell, row-major.
#[must_use]
pub fn theoretical_moves(color: Color, board: &Board) -> Vec<Move> {
    let card = Card::new(THEORETICAL_VALUE, color);
    if !board.first_move_placed() {
        return vec![Move::new(CENTER, card)];
    }
    board
        .frontier()
        .and(board.occupied().complement())
        .iter_ones()
        .map(|pos| Move::new(pos, card))
        .collect()
}

/// One-ply ordering score for `color` playing `mv`.
///
/// Rewards the runs the move creates (length and open ends), centrality, and
/// sitting next to opponent runs it cuts short. The board is probed and
/// restored.
pub fn quick_score(board: &mut Board, mv: Move, color: Color) -> i32 {
    let probe = board.probe(mv.pos, Card::new(mv.card.value, color));
    let mut score = 0;

    for &dir in &DIRECTIONS {
        let run = line_run(&probe, mv.pos, dir, color, ORDERING_REACH);
        score += match run.count {
            c if c >= 4 => 10_000,
            3 if run.open_ends >= 2 => 500,
            3 => 200,
            2 if run.open_ends >= 2 => 100,
            2 => 30,
            _ => 0,
        };
    }

    score += (8 - mv.pos.center_distance()) * 5;

    for opp in probe.opponents(color) {
        let theirs = probe.cells_of(opp);
        for &(dr, dc) in &DIRECTIONS {
            let mut opp_count = 0;
            for sign in [1, -1] {
                for k in 1..=ORDERING_REACH {
                    match mv.pos.offset(dr * sign, dc * sign, k) {
                        Some(next) if theirs.get(next) => opp_count += 1,
                        _ => break,
                    }
                }
            }
            if opp_count >= 2 {
                score += opp_count * 80;
            }
        }
    }

    score
}

/// Sort `moves` by `quick_score`, best first. Ties keep generation order.
pub fn order_moves(board: &mut Board, moves: &mut [Move], color: Color) {
    moves.sort_by_cached_key(|&mv| std::cmp::Reverse(quick_score(board, mv, color)));
}

/// Sort pooled opponent moves by distance to the center, nearest first.
pub fn order_by_center(moves: &mut [Move]) {
    moves.sort_by_key(|mv| mv.pos.center_distance());
}

#[cfg(test)]
mod tests {
    use super::*;

    const THREE: [Color; 3] = [Color::Red, Color::Green, Color::Blue];

    fn hand(values: &[u8], color: Color) -> Vec<Card> {
        values.iter().map(|&v| Card::new(v, color)).collect()
    }

    #[test]
    fn test_first_move_only_center() {
        let board = Board::new(&THREE);
        let moves = legal_moves(&hand(&[1, 5, 9], Color::Red), &board);
        assert_eq!(moves.len(), 3);
        assert!(moves.iter().all(|m| m.pos == CENTER));
        assert_eq!(theoretical_moves(Color::Blue, &board).len(), 1);
    }

    #[test]
    fn test_legal_moves_hand_then_row_major() {
        let board = Board::opened(&THREE, Card::new(6, Color::Green));
        let moves = legal_moves(&hand(&[7, 2], Color::Red), &board);
        // A lone center card cannot be covered: 8 neighbors per card
        assert_eq!(moves.len(), 16);
        assert_eq!(moves[0], Move::new(Pos::new(3, 3), Card::new(7, Color::Red)));
        assert_eq!(moves[8].card.value, 2);
        assert!(moves[..8].windows(2).all(|w| w[0].pos < w[1].pos));
    }

    #[test]
    fn test_legal_moves_include_stacking() {
        let mut board = Board::opened(&THREE, Card::new(3, Color::Green));
        board.place_card(Pos::new(4, 5), Card::new(5, Color::Blue));
        let high = legal_moves(&hand(&[7], Color::Red), &board);
        assert!(high.iter().any(|m| m.pos == Pos::new(4, 5)));
        assert!(high.iter().any(|m| m.pos == CENTER));
        let low = legal_moves(&hand(&[3], Color::Red), &board);
        assert!(!low.iter().any(|m| m.pos == Pos::new(4, 5) || m.pos == CENTER));
    }

    #[test]
    fn test_theoretical_moves_skip_occupied() {
        let mut board = Board::opened(&THREE, Card::new(3, Color::Green));
        board.place_card(Pos::new(4, 5), Card::new(1, Color::Blue));
        let moves = theoretical_moves(Color::Red, &board);
        assert_eq!(moves.len(), 10);
        assert!(moves.iter().all(|m| board.is_empty(m.pos)));
        assert!(moves.iter().all(|m| m.card == Card::new(THEORETICAL_VALUE, Color::Red)));
    }

    #[test]
    fn test_generators_do_not_mutate() {
        let board = Board::opened(&THREE, Card::new(3, Color::Green));
        let cards = hand(&[4, 8, 8], Color::Blue);
        let first = legal_moves(&cards, &board);
        let second = legal_moves(&cards, &board);
        assert_eq!(first, second);
    }

    #[test]
    fn test_quick_score_prefers_extending_run() {
        let mut board = Board::opened(&THREE, Card::new(3, Color::Red));
        board.place_card(Pos::new(4, 3), Card::new(3, Color::Red));
        let before = board.clone();
        let extend = Move::new(Pos::new(4, 5), Card::new(5, Color::Red));
        let side = Move::new(Pos::new(5, 2), Card::new(5, Color::Red));
        let (extend, side) = (
            quick_score(&mut board, extend, Color::Red),
            quick_score(&mut board, side, Color::Red),
        );
        assert!(extend > side);
        assert_eq!(board, before);
    }

    #[test]
    fn test_quick_score_rewards_cutting_opponent_run() {
        let mut board = Board::opened(&THREE, Card::new(3, Color::Blue));
        board.place_card(Pos::new(4, 3), Card::new(3, Color::Blue));
        let cut = Move::new(Pos::new(4, 5), Card::new(5, Color::Red));
        let plain = Move::new(Pos::new(3, 5), Card::new(5, Color::Red));
        // (4,5) sits against a blue pair; (3,5) is one step further from center
        let cut = quick_score(&mut board, cut, Color::Red);
        let plain = quick_score(&mut board, plain, Color::Red);
        assert!(cut - plain >= 160);
    }

    #[test]
    fn test_order_moves_best_first() {
        let mut board = Board::opened(&THREE, Card::new(3, Color::Red));
        board.place_card(Pos::new(4, 3), Card::new(3, Color::Red));
        let mut moves = theoretical_moves(Color::Red, &board);
        order_moves(&mut board, &mut moves, Color::Red);
        let scores: Vec<i32> = moves
            .iter()
            .map(|&m| quick_score(&mut board, m, Color::Red))
            .collect();
        assert!(scores.windows(2).all(|w| w[0] >= w[1]));
    }

    #[test]
    fn test_order_by_center() {
        let card = Card::new(5, Color::Green);
        let mut moves = vec![
            Move::new(Pos::new(0, 0), card),
            Move::new(Pos::new(4, 5), card),
            Move::new(Pos::new(2, 4), card),
        ];
        order_by_center(&mut moves);
        let dists: Vec<i32> = moves.iter().map(|m| m.pos.center_distance()).collect();
        assert_eq!(dists, vec![1, 2, 8]);
    }
}
