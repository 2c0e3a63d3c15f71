//! Pattern scores and static tables for Punto evaluation
//!
//! Opponent run weights are larger than the matching own-run weights: with
//! up to three rivals, letting any one of them build costs more than
//! failing to build yourself.

use crate::board::BOARD_SIZE;

/// Pattern scores for evaluation
pub struct PatternScore;

impl PatternScore {
    // Terminal scores
    /// Score of a decided game, before the remaining-depth bonus
    pub const WIN: i32 = 100_000_000;
    /// Added per remaining ply so faster wins (and slower losses) rank higher
    pub const DEPTH_BONUS: i32 = 1_000_000;
    /// Heuristic sums are clamped below this so a decided game always dominates
    pub const HEURISTIC_CAP: i64 = Self::WIN as i64 - 1;

    // Own runs
    pub const FOUR: i32 = 100_000;
    pub const THREE: i32 = 8_000;
    pub const OPEN_THREE: i32 = 12_000;
    pub const TWO: i32 = 800;
    pub const OPEN_TWO: i32 = 1_500;

    // Opponent runs (subtracted, per opponent)
    pub const OPP_FOUR: i32 = 150_000;
    pub const OPP_THREE: i32 = 9_000;
    pub const OPP_OPEN_THREE: i32 = 13_000;
    pub const OPP_TWO: i32 = 900;
    pub const OPP_OPEN_TWO: i32 = 1_600;
}

/// Multipliers for the positional features
pub struct FeatureWeight;

impl FeatureWeight {
    pub const POSITIONAL: i32 = 150;
    pub const MOBILITY: i32 = 80;
    pub const CENTER: i32 = 300;
    pub const SHAPES: i32 = 400;
    pub const FORK: i32 = 600;
    pub const RESTRICTION: i32 = 250;
    pub const STACKING: i32 = 350;
}

/// Concentric weights favoring the center
pub const HEATMAP: [[i32; BOARD_SIZE]; BOARD_SIZE] = [
    [3, 4, 5, 5, 6, 5, 5, 4, 3],
    [4, 6, 7, 7, 8, 7, 7, 6, 4],
    [5, 7, 8, 9, 10, 9, 8, 7, 5],
    [5, 7, 9, 10, 11, 10, 9, 7, 5],
    [6, 8, 10, 11, 12, 11, 10, 8, 6],
    [5, 7, 9, 10, 11, 10, 9, 7, 5],
    [5, 7, 8, 9, 10, 9, 8, 7, 5],
    [4, 6, 7, 7, 8, 7, 7, 6, 4],
    [3, 4, 5, 5, 6, 5, 5, 4, 3],
];

/// Small shape templates as (row, col) offsets from an anchor
pub const SHAPES: [&[(u8, u8)]; 4] = [
    // L-corner
    &[(0, 0), (0, 1), (1, 0)],
    // Horizontal triple
    &[(0, 0), (0, 1), (0, 2)],
    // T
    &[(0, 0), (0, 1), (0, 2), (1, 1)],
    // S
    &[(0, 1), (1, 0), (1, 1), (1, 2)],
];

/// Points per matched shape
pub const SHAPE_MATCH: i32 = 5;

/// Opponent restriction baseline: `(RESTRICTION_BASE - mobility) * 2` per opponent
pub const RESTRICTION_BASE: i32 = 50;

/// Terminal score for a decided position, biased by remaining depth
#[inline]
pub fn win_score(depth: u8) -> i32 {
    PatternScore::WIN + depth as i32 * PatternScore::DEPTH_BONUS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opponent_weights_dominate_own() {
        assert!(PatternScore::OPP_FOUR > PatternScore::FOUR);
        assert!(PatternScore::OPP_OPEN_THREE > PatternScore::OPEN_THREE);
        assert!(PatternScore::OPP_THREE > PatternScore::THREE);
        assert!(PatternScore::OPP_OPEN_TWO > PatternScore::OPEN_TWO);
        assert!(PatternScore::OPP_TWO > PatternScore::TWO);
    }

    #[test]
    fn test_open_runs_beat_closed() {
        assert!(PatternScore::OPEN_THREE > PatternScore::THREE);
        assert!(PatternScore::OPEN_TWO > PatternScore::TWO);
    }

    #[test]
    fn test_heatmap_symmetric_and_peaks_at_center() {
        for r in 0..BOARD_SIZE {
            for c in 0..BOARD_SIZE {
                assert_eq!(HEATMAP[r][c], HEATMAP[BOARD_SIZE - 1 - r][c]);
                assert_eq!(HEATMAP[r][c], HEATMAP[r][BOARD_SIZE - 1 - c]);
                assert!(HEATMAP[r][c] <= HEATMAP[4][4]);
            }
        }
    }

    #[test]
    fn test_win_score_grows_with_depth() {
        assert!(win_score(3) > win_score(2));
        assert_eq!(win_score(0), PatternScore::WIN);
        // Deepest configurable search stays inside i32
        assert!(win_score(u8::MAX).checked_neg().is_some());
    }
}
