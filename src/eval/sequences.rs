//! Run scanning shared by the evaluator, the threat analyzer and move ordering

use crate::board::{Board, Color, Pos, DIRECTIONS};
use crate::rules::is_open_cell;

/// Same-color run through a cell along one direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LineRun {
    /// Cells in the run, the probed cell included
    pub count: i32,
    /// Sides (0..=2) whose first non-run cell is empty and placeable
    pub open_ends: i32,
}

/// Measure the `color` run through `pos` along `(dr, dc)`, looking at most
/// `reach` cells to each side. `pos` itself always counts.
///
/// A side is open when the first cell after the run, within reach, can take
/// a card. Runs longer than `reach` on a side report that side closed.
pub fn line_run(
    board: &Board,
    pos: Pos,
    (dr, dc): (i32, i32),
    color: Color,
    reach: i32,
) -> LineRun {
    let mut run = LineRun { count: 1, open_ends: 0 };
    for sign in [1, -1] {
        for k in 1..=reach {
            let Some(next) = pos.offset(dr * sign, dc * sign, k) else {
                break;
            };
            match board.color_at(next) {
                Some(c) if c == color => run.count += 1,
                None if is_open_cell(board, next) => {
                    run.open_ends += 1;
                    break;
                }
                _ => break,
            }
        }
    }
    run
}

/// Count-only variant of `line_run`
#[inline]
pub fn run_length(board: &Board, pos: Pos, dir: (i32, i32), color: Color, reach: i32) -> i32 {
    let mine = board.cells_of(color);
    let (dr, dc) = dir;
    let mut count = 1;
    for sign in [1, -1] {
        for k in 1..=reach {
            match pos.offset(dr * sign, dc * sign, k) {
                Some(next) if mine.get(next) => count += 1,
                _ => break,
            }
        }
    }
    count
}

/// Whether `pos` sits in a `color` run of at least two within two cells
pub fn is_part_of_sequence(board: &Board, pos: Pos, color: Color) -> bool {
    DIRECTIONS
        .iter()
        .any(|&dir| run_length(board, pos, dir, color, 2) >= 2)
}

/// Run census for one color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SequenceCounts {
    /// Runs of four or more, open or not
    pub four: i32,
    pub three: i32,
    pub open_three: i32,
    pub two: i32,
    pub open_two: i32,
}

/// Classify every maximal `color` run by length and open ends.
///
/// Each run is counted once, from its first cell in scan direction. An end
/// is open when the adjacent cell beyond the run is empty.
pub fn analyze_sequences(board: &Board, color: Color) -> SequenceCounts {
    let mine = board.cells_of(color);
    let mut counts = SequenceCounts::default();

    for pos in mine.iter_ones() {
        for &(dr, dc) in &DIRECTIONS {
            let before = pos.offset(-dr, -dc, 1);
            // Only start from the first cell of a run
            if before.is_some_and(|p| mine.get(p)) {
                continue;
            }

            let mut count = 0;
            let mut open_ends = 0;
            let mut k = 0;
            while let Some(next) = pos.offset(dr, dc, k) {
                if mine.get(next) {
                    count += 1;
                    k += 1;
                } else {
                    if board.is_empty(next) {
                        open_ends += 1;
                    }
                    break;
                }
            }
            if before.is_some_and(|p| board.is_empty(p)) {
                open_ends += 1;
            }

            match count {
                c if c >= 4 => counts.four += 1,
                3 if open_ends >= 2 => counts.open_three += 1,
                3 => counts.three += 1,
                2 if open_ends >= 2 => counts.open_two += 1,
                2 => counts.two += 1,
                _ => {}
            }
        }
    }
    counts
}
