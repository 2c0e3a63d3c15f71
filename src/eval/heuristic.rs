//! Heuristic evaluation function for Punto board positions
//!
//! Scores a board from one color's perspective as a weighted sum of:
//! - Run census (own runs add, every opponent's runs subtract harder)
//! - Positional heatmap and center dominance
//! - Mobility and opponent restriction
//! - Shape templates and forking potential
//! - Stacking opportunities on enemy cards
//!
//! A decided game short-circuits the sum; see `terminal_score`.

use crate::board::{Board, Color, Pos, DIRECTIONS};
use crate::rules::has_winning_line;

use super::patterns::{
    win_score, FeatureWeight, PatternScore, HEATMAP, RESTRICTION_BASE, SHAPES, SHAPE_MATCH,
};
use super::sequences::{analyze_sequences, is_part_of_sequence, line_run, SequenceCounts};

/// Score of a decided position, or `None` while nobody has won.
///
/// `color` winning beats any heuristic score and grows with `depth` (prefer
/// faster wins); any other seated color winning loses and shrinks with `depth`
/// (prefer slower losses).
#[inline]
pub fn terminal_score(board: &Board, color: Color, depth: u8) -> Option<i32> {
    if has_winning_line(board, color) {
        return Some(win_score(depth));
    }
    if board
        .opponents(color)
        .any(|opp| has_winning_line(board, opp))
    {
        return Some(-win_score(depth));
    }
    None
}

/// Evaluate the board from the perspective of the given color.
///
/// Positive values favor `color`. Decided games return the terminal score
/// with no depth bonus.
#[must_use]
pub fn evaluate(board: &Board, color: Color) -> i32 {
    evaluate_at_depth(board, color, 0)
}

/// `evaluate` with the remaining search depth feeding the terminal bias
#[must_use]
pub fn evaluate_at_depth(board: &Board, color: Color, depth: u8) -> i32 {
    if let Some(score) = terminal_score(board, color, depth) {
        return score;
    }
    static_score(board, color)
}

/// Weighted feature sum, clamped strictly inside the terminal band
pub fn static_score(board: &Board, color: Color) -> i32 {
    let mut score = own_runs(analyze_sequences(board, color));
    for opp in board.opponents(color) {
        score -= opponent_runs(analyze_sequences(board, opp));
    }

    score += positional(board, color) as i64 * FeatureWeight::POSITIONAL as i64;
    score += mobility(board, color) as i64 * FeatureWeight::MOBILITY as i64;
    score += center_dominance(board, color) as i64 * FeatureWeight::CENTER as i64;
    score += shapes(board, color) as i64 * FeatureWeight::SHAPES as i64;
    score += forking_potential(board, color) as i64 * FeatureWeight::FORK as i64;
    score += opponent_restriction(board, color) as i64 * FeatureWeight::RESTRICTION as i64;
    score += stacking_advantage(board, color) as i64 * FeatureWeight::STACKING as i64;

    score.clamp(-PatternScore::HEURISTIC_CAP, PatternScore::HEURISTIC_CAP) as i32
}

fn own_runs(c: SequenceCounts) -> i64 {
    c.four as i64 * PatternScore::FOUR as i64
        + c.three as i64 * PatternScore::THREE as i64
        + c.open_three as i64 * PatternScore::OPEN_THREE as i64
        + c.two as i64 * PatternScore::TWO as i64
        + c.open_two as i64 * PatternScore::OPEN_TWO as i64
}

fn opponent_runs(c: SequenceCounts) -> i64 {
    c.four as i64 * PatternScore::OPP_FOUR as i64
        + c.three as i64 * PatternScore::OPP_THREE as i64
        + c.open_three as i64 * PatternScore::OPP_OPEN_THREE as i64
        + c.two as i64 * PatternScore::OPP_TWO as i64
        + c.open_two as i64 * PatternScore::OPP_OPEN_TWO as i64
}

/// Heatmap sum over own cells
pub fn positional(board: &Board, color: Color) -> i32 {
    board
        .cells_of(color)
        .iter_ones()
        .map(|p| HEATMAP[p.row as usize][p.col as usize])
        .sum()
}

/// Own cells with at least one empty neighbor
pub fn mobility(board: &Board, color: Color) -> i32 {
    let empty = board.occupied().complement();
    board.cells_of(color).and(empty.neighbors()).count() as i32
}

/// Bonus for holding the 3x3 core, larger nearer the center
pub fn center_dominance(board: &Board, color: Color) -> i32 {
    let mine = board.cells_of(color);
    let mut score = 0;
    for row in 3..=5 {
        for col in 3..=5 {
            let pos = Pos::new(row, col);
            if mine.get(pos) {
                score += (3 - pos.center_distance()) * 2;
            }
        }
    }
    score
}

/// Matches of the shape templates anchored anywhere in the top-left 8x8
pub fn shapes(board: &Board, color: Color) -> i32 {
    let mine = board.cells_of(color);
    let mut score = 0;
    for row in 0..8i32 {
        for col in 0..8i32 {
            for shape in SHAPES.iter() {
                let full = shape.iter().all(|&(dr, dc)| {
                    let (r, c) = (row + dr as i32, col + dc as i32);
                    Pos::is_valid(r, c) && mine.get(Pos::new(r as u8, c as u8))
                });
                if full {
                    score += SHAPE_MATCH;
                }
            }
        }
    }
    score
}

/// Own cells that extend two or more open runs at once
pub fn forking_potential(board: &Board, color: Color) -> i32 {
    let mut score = 0;
    for pos in board.cells_of(color).iter_ones() {
        let threats = DIRECTIONS
            .iter()
            .filter(|&&dir| {
                let run = line_run(board, pos, dir, color, 2);
                run.count >= 2 && run.open_ends > 0
            })
            .count() as i32;
        if threats >= 2 {
            score += threats * 5;
        }
    }
    score
}

/// Rewards every opponent having few cards with room to grow
pub fn opponent_restriction(board: &Board, color: Color) -> i32 {
    board
        .opponents(color)
        .map(|opp| (RESTRICTION_BASE - mobility(board, opp)) * 2)
        .sum()
}

/// Covering opportunities on enemy cards: central ones and those in runs count more
pub fn stacking_advantage(board: &Board, color: Color) -> i32 {
    let mut advantage = 0;
    for opp in board.opponents(color) {
        for pos in board.cells_of(opp).iter_ones() {
            let value = (8 - pos.center_distance()) * 2;
            if is_part_of_sequence(board, pos, opp) {
                advantage += value * 3;
            } else {
                advantage += value;
            }
        }
    }
    advantage
}
