//! Tactical shortcuts run before any tree search
//!
//! This module implements the one-ply decisions of the cascade:
//! - Immediate win: a hand card that completes a line right now
//! - Critical threat: the cell where some opponent would win next, blocked
//!   with the highest card that fits
//! - Optimal stacking: covering an enemy card where it hurts most
//! - Aggressive block: occupying an end of an opponent run of two or more
//!
//! Every check probes the board and restores it before returning.

use crate::board::{Board, Card, Color, Move, Pos, DIRECTIONS, MAX_CARD_VALUE, TOTAL_CELLS};
use crate::eval::{line_run, run_length};
use crate::movegen::legal_moves;
use crate::rules::{has_line_through, is_legal_placement, is_open_cell};

/// Card value an opponent is assumed to hold when probing its threats
pub const THREAT_PROBE_VALUE: u8 = MAX_CARD_VALUE;

/// Cells scanned from a run start when collecting opponent threats
const THREAT_SCAN: i32 = 5;

/// An opponent run of two or more and the cells that would cut it short
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Threat {
    pub color: Color,
    /// Run cells found along the scan (gaps allowed)
    pub count: i32,
    pub cells: Vec<Pos>,
    /// Open cells along the scan plus the one before its start
    pub blocks: Vec<Pos>,
    pub direction: (i32, i32),
}

/// One-ply tactical analyzer
#[derive(Debug, Clone)]
pub struct ThreatAnalyzer {
    /// Minimum stack value for a stacking move to be played
    stacking_threshold: i32,
    /// Minimum block score for an aggressive block to be played
    aggressive_block_threshold: i32,
}

impl ThreatAnalyzer {
    #[must_use]
    pub fn new(stacking_threshold: i32, aggressive_block_threshold: i32) -> Self {
        Self {
            stacking_threshold,
            aggressive_block_threshold,
        }
    }

    /// First legal move of `hand` that completes a line for `color`.
    pub fn find_immediate_win(
        &self,
        board: &mut Board,
        color: Color,
        hand: &[Card],
    ) -> Option<Move> {
        legal_moves(hand, board).into_iter().find(|mv| {
            let probe = board.probe(mv.pos, Card::new(mv.card.value, color));
            has_line_through(&probe, mv.pos, color)
        })
    }

    /// Block the most severe cell where an opponent would win next turn.
    ///
    /// Every cell a top card could take is probed for every opponent. The
    /// highest-severity hit is blocked with the highest hand card that may
    /// legally go there; if none can, there is no answer.
    ///
    /// Returns the move and the severity of the threat it blocks.
    pub fn find_critical_threat(
        &self,
        board: &mut Board,
        color: Color,
        hand: &[Card],
    ) -> Option<(Move, i32)> {
        let opponents: Vec<Color> = board.opponents(color).collect();
        let mut threats: Vec<(Pos, Color, i32)> = Vec::new();

        for opp in opponents {
            for pos in Pos::all() {
                if !is_legal_placement(board, pos, THREAT_PROBE_VALUE) {
                    continue;
                }
                let wins = {
                    let probe = board.probe(pos, Card::new(THREAT_PROBE_VALUE, opp));
                    has_line_through(&probe, pos, opp)
                };
                if wins {
                    threats.push((pos, opp, threat_level(board, pos, opp)));
                }
            }
        }

        // Stable: equal levels keep seat order, then row-major order
        threats.sort_by_key(|&(_, _, level)| std::cmp::Reverse(level));
        let &(pos, _, level) = threats.first()?;

        let mut cards = hand.to_vec();
        cards.sort_by_key(|c| std::cmp::Reverse(c.value));
        cards
            .into_iter()
            .find(|card| is_legal_placement(board, pos, card.value))
            .map(|card| (Move::new(pos, card), level))
    }

    /// Best stack on an enemy card, if its value clears the threshold.
    ///
    /// Returns the move and its stack value.
    pub fn find_optimal_stacking(
        &self,
        board: &mut Board,
        color: Color,
        hand: &[Card],
    ) -> Option<(Move, i32)> {
        let threats = self.all_threats(board, color);
        let mut best: Option<(Move, i32)> = None;

        let enemy_cells: Vec<(Pos, Card)> = Pos::all()
            .filter_map(|pos| board.get(pos).map(|card| (pos, card)))
            .filter(|(_, card)| card.color != color && board.seats().contains(&card.color))
            .collect();

        for (pos, enemy) in enemy_cells {
            for &card in hand {
                if !is_legal_placement(board, pos, card.value) {
                    continue;
                }
                let value = stacking_value(board, pos, card, enemy, color, &threats);
                if best.map_or(true, |(_, v)| value > v) {
                    best = Some((Move::new(pos, card), value));
                }
            }
        }

        best.filter(|&(_, value)| value > self.stacking_threshold)
    }

    /// Best block on an end of an opponent run, if it clears the threshold.
    ///
    /// Returns the move and its block score.
    pub fn find_aggressive_block(
        &self,
        board: &mut Board,
        color: Color,
        hand: &[Card],
    ) -> Option<(Move, i32)> {
        let mut best: Option<(Move, i32)> = None;

        for threat in self.all_threats(board, color) {
            for &pos in &threat.blocks {
                for &card in hand {
                    if !is_legal_placement(board, pos, card.value) {
                        continue;
                    }
                    let score = block_score(pos, card, &threat);
                    if best.map_or(true, |(_, s)| score > s) {
                        best = Some((Move::new(pos, card), score));
                    }
                }
            }
        }

        best.filter(|&(_, score)| score > self.aggressive_block_threshold)
    }

    fn all_threats(&self, board: &Board, color: Color) -> Vec<Threat> {
        board
            .opponents(color)
            .flat_map(|opp| opponent_threats(board, opp))
            .collect()
    }
}

impl Default for ThreatAnalyzer {
    fn default() -> Self {
        Self::new(1200, 500)
    }
}

/// Runs of two or more for `color`, longest first.
///
/// From each unvisited card the scan walks up to five cells, counting the
/// color's cards and collecting open cells, and stops at anything else.
/// The open cell just before the start is a block cell too.
pub fn opponent_threats(board: &Board, color: Color) -> Vec<Threat> {
    let mine = board.cells_of(color);
    let mut checked = vec![[false; 4]; TOTAL_CELLS];
    let mut threats = Vec::new();

    for start in mine.iter_ones() {
        for (d, &(dr, dc)) in DIRECTIONS.iter().enumerate() {
            if checked[start.to_index()][d] {
                continue;
            }

            let mut cells = Vec::new();
            let mut blocks = Vec::new();
            for k in 0..THREAT_SCAN {
                let Some(pos) = start.offset(dr, dc, k) else {
                    break;
                };
                if mine.get(pos) {
                    cells.push(pos);
                    checked[pos.to_index()][d] = true;
                } else if is_open_cell(board, pos) {
                    blocks.push(pos);
                } else {
                    break;
                }
            }
            if let Some(before) = start.offset(-dr, -dc, 1) {
                if is_open_cell(board, before) {
                    blocks.push(before);
                }
            }

            if cells.len() >= 2 {
                threats.push(Threat {
                    color,
                    count: cells.len() as i32,
                    cells,
                    blocks,
                    direction: (dr, dc),
                });
            }
        }
    }

    threats.sort_by_key(|t| std::cmp::Reverse(t.count));
    threats
}

/// Severity of a winning cell for `color`: longer runs through it weigh more
pub fn threat_level(board: &Board, pos: Pos, color: Color) -> i32 {
    let mut level = 100;
    for &dir in &DIRECTIONS {
        level += match run_length(board, pos, dir, color, 3) {
            c if c >= 4 => 10_000,
            3 => 1_000,
            2 => 100,
            _ => 0,
        };
    }
    level
}

/// Composite value of covering `enemy` at `pos` with `card`
fn stacking_value(
    board: &mut Board,
    pos: Pos,
    card: Card,
    enemy: Card,
    color: Color,
    threats: &[Threat],
) -> i32 {
    let mut value = 0;

    // Enemy runs broken by the stack
    for &dir in &DIRECTIONS {
        value += match run_length(board, pos, dir, enemy.color, 3) {
            c if c >= 3 => 2_500,
            2 => 1_000,
            _ => 0,
        };
    }

    {
        let probe = board.probe(pos, Card::new(card.value, color));
        let mut forks = 0;
        for &dir in &DIRECTIONS {
            let run = line_run(&probe, pos, dir, color, 3);
            value += match (run.count, run.open_ends) {
                (c, o) if c >= 3 && o >= 1 => 1_500,
                (c, _) if c >= 3 => 800,
                (2, o) if o >= 2 => 600,
                (2, 1) => 300,
                _ => 0,
            };

            let short = line_run(&probe, pos, dir, color, 2);
            if short.count >= 2 && short.open_ends > 0 {
                forks += 1;
            }
        }
        if forks >= 2 {
            value += 800 * forks;
        }
    }

    value += (8 - pos.center_distance()) * 80;
    value += (card.value as i32 - enemy.value as i32) * 30;
    // Other runs this cell would also cut; the run being covered has `pos` among its cards
    value += threats.iter().filter(|t| t.blocks.contains(&pos)).count() as i32 * 500;

    value
}

fn block_score(pos: Pos, card: Card, threat: &Threat) -> i32 {
    let base = match threat.count {
        c if c >= 3 => 2_000,
        2 => 800,
        _ => 0,
    };
    let centrality = (8 - pos.center_distance()) * 50;
    base + threat.blocks.len() as i32 * 100 - card.value as i32 * 10 + centrality
}
