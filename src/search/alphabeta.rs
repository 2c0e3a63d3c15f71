//! Alpha-Beta search with iterative deepening and transposition table
//!
//! This module implements the standard search of the engine: minimax with
//! alpha-beta pruning over two node kinds. MAX nodes are the searching AI's
//! turns; MIN nodes pool every other seated color into one flattened ply.
//!
//! # Features
//!
//! - Iterative deepening with anytime behavior under a wall-clock budget
//! - Fixed shallow-depth variant for the medium skill level
//! - Transposition table keyed by hash, remaining depth and node kind
//! - One-ply move ordering at MAX nodes
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//! use punto::board::{Board, Card, Color};
//! use punto::search::{Deadline, Searcher};
//!
//! let mut searcher = Searcher::new(16); // 16 MB transposition table
//! let mut board = Board::opened(&[Color::Red, Color::Blue], Card::new(5, Color::Blue));
//! let hand = [Card::new(7, Color::Red)];
//!
//! let deadline = Deadline::from_now(Duration::from_secs(5));
//! let result = searcher.search_iterative(&mut board, Color::Red, &hand, 2, deadline);
//! if let Some(best_move) = result.best_move {
//!     println!("Best move: {best_move}");
//! }
//! ```

use log::{debug, trace};

use crate::board::{Board, Card, Color, Move};
use crate::eval::{evaluate_at_depth, static_score, terminal_score, PatternScore};
use crate::movegen::{legal_moves, order_moves, theoretical_moves};

use super::{Deadline, EntryType, NodeKind, TTStats, TranspositionTable, ZobristTable};

/// Infinity score for alpha-beta bounds, above every terminal score
pub(crate) const INF: i32 = i32::MAX / 2;

/// Search statistics for diagnostics and tuning.
#[derive(Debug, Clone, Default)]
pub struct SearchStats {
    /// Total beta cutoffs (fail-high at MAX, fail-low at MIN)
    pub cutoffs: u64,
    /// Cutoffs on the first move tried (measures move ordering quality)
    pub first_move_cutoffs: u64,
    /// Total TT probes
    pub tt_probes: u64,
    /// TT probes that returned a usable score
    pub tt_hits: u64,
}

impl SearchStats {
    /// First-move cutoff rate in percent
    pub fn first_move_rate(&self) -> f64 {
        if self.cutoffs == 0 {
            0.0
        } else {
            self.first_move_cutoffs as f64 / self.cutoffs as f64 * 100.0
        }
    }

    /// TT score hit rate in percent
    pub fn tt_hit_rate(&self) -> f64 {
        if self.tt_probes == 0 {
            0.0
        } else {
            self.tt_hits as f64 / self.tt_probes as f64 * 100.0
        }
    }
}

/// Search result containing the best move found and associated statistics.
#[derive(Debug, Clone)]
pub struct SearchResult {
    /// Best move found, `None` only when there was no legal move
    pub best_move: Option<Move>,
    /// Evaluation score of the best move
    pub score: i32,
    /// Deepest root pass that finished (0 if none did)
    pub depth: u8,
    /// Total nodes searched
    pub nodes: u64,
    /// Whether `depth` was searched to the end
    pub completed: bool,
    /// Wall time spent in this search
    pub elapsed_ms: u64,
    /// Search diagnostics
    pub stats: SearchStats,
}

impl SearchResult {
    pub(crate) fn none() -> Self {
        Self {
            best_move: None,
            score: 0,
            depth: 0,
            nodes: 0,
            completed: true,
            elapsed_ms: 0,
            stats: SearchStats::default(),
        }
    }
}

/// Outcome of one root pass
pub(crate) struct RootOutcome {
    pub best: Option<(Move, i32)>,
    pub completed: bool,
}

/// Standard alpha-beta searcher. Owns its transposition table, which
/// persists across searches until `clear_tt`.
pub struct Searcher {
    zobrist: ZobristTable,
    tt: TranspositionTable,
    use_ordering: bool,
    use_tt: bool,
    nodes: u64,
    stopped: bool,
    deadline: Deadline,
    stats: SearchStats,
}

impl Searcher {
    /// Searcher with ordering and caching enabled and a `tt_size_mb` table.
    #[must_use]
    pub fn new(tt_size_mb: usize) -> Self {
        Self::with_options(tt_size_mb, true, true)
    }

    #[must_use]
    pub fn with_options(tt_size_mb: usize, use_ordering: bool, use_tt: bool) -> Self {
        Self {
            zobrist: ZobristTable::new(),
            tt: TranspositionTable::new(tt_size_mb),
            use_ordering,
            use_tt,
            nodes: 0,
            stopped: false,
            deadline: Deadline::from_now(std::time::Duration::MAX),
            stats: SearchStats::default(),
        }
    }

    fn reset(&mut self, deadline: Deadline) {
        self.nodes = 0;
        self.stopped = false;
        self.deadline = deadline;
        self.stats = SearchStats::default();
    }

    /// Check time and latch the stop flag once the budget is spent.
    #[inline]
    fn check_time(&mut self) -> bool {
        if !self.stopped && self.deadline.expired() {
            self.stopped = true;
        }
        self.stopped
    }

    /// Iterative deepening from depth 1 to `max_depth` over the moves of `hand`.
    ///
    /// Each depth restarts the root with the previous best move first. A
    /// depth's result is adopted only when its pass finished; an unfinished
    /// pass is used only when no depth finished. A proven win stops
    /// deepening. Always returns a move when `hand` has a legal one.
    pub fn search_iterative(
        &mut self,
        board: &mut Board,
        ai: Color,
        hand: &[Card],
        max_depth: u8,
        deadline: Deadline,
    ) -> SearchResult {
        self.reset(deadline);
        let mut moves = legal_moves(hand, board);
        if moves.is_empty() {
            return SearchResult::none();
        }

        let hash = self.zobrist.with_perspective(self.zobrist.hash(board), ai);
        let mut best: Option<(Move, i32, u8)> = None;
        let mut partial: Option<(Move, i32)> = None;

        for depth in 1..=max_depth.max(1) {
            if self.check_time() {
                debug!("iterative deepening out of time before depth {depth}");
                break;
            }

            if depth > 1 {
                if self.use_ordering && depth == 2 {
                    order_moves(board, &mut moves, ai);
                }
                if let Some((mv, _, _)) = best {
                    if let Some(i) = moves.iter().position(|&m| m == mv) {
                        moves[..=i].rotate_right(1);
                    }
                }
            }

            let outcome = self.search_root(board, ai, &moves, depth, hash, deadline);
            if !outcome.completed {
                if best.is_none() {
                    partial = outcome.best;
                }
                debug!("depth {depth} aborted after {} nodes", self.nodes);
                break;
            }

            if let Some((mv, score)) = outcome.best {
                debug!("depth {depth} complete: {mv} scores {score} ({} nodes)", self.nodes);
                best = Some((mv, score, depth));
                if score >= PatternScore::WIN {
                    break;
                }
            }
        }

        let (best_move, score, depth, completed) = match (best, partial) {
            (Some((mv, score, depth)), _) => (mv, score, depth, true),
            (None, Some((mv, score))) => (mv, score, 0, false),
            (None, None) => {
                if self.use_ordering {
                    order_moves(board, &mut moves, ai);
                }
                (moves[0], static_score(board, ai), 0, false)
            }
        };

        self.finish(best_move, score, depth, completed)
    }

    /// Single alpha-beta pass at `depth` with the moves ordered first.
    ///
    /// `root` is checked after every root move and stops the pass early;
    /// `deadline` bounds the recursion below it.
    pub fn search_fixed(
        &mut self,
        board: &mut Board,
        ai: Color,
        hand: &[Card],
        depth: u8,
        root: Deadline,
        deadline: Deadline,
    ) -> SearchResult {
        self.reset(deadline);
        let mut moves = legal_moves(hand, board);
        if moves.is_empty() {
            return SearchResult::none();
        }
        if self.use_ordering {
            order_moves(board, &mut moves, ai);
        }

        let hash = self.zobrist.with_perspective(self.zobrist.hash(board), ai);
        let depth = depth.max(1);
        let outcome = self.search_root(board, ai, &moves, depth, hash, root);

        match outcome.best {
            Some((mv, score)) => {
                let reached = if outcome.completed { depth } else { 0 };
                self.finish(mv, score, reached, outcome.completed)
            }
            None => self.finish(moves[0], static_score(board, ai), 0, false),
        }
    }

    fn finish(&self, best_move: Move, score: i32, depth: u8, completed: bool) -> SearchResult {
        trace!("search tt: {:?}", self.tt.stats());
        SearchResult {
            best_move: Some(best_move),
            score,
            depth,
            nodes: self.nodes,
            completed,
            elapsed_ms: self.deadline.elapsed().as_millis() as u64,
            stats: self.stats.clone(),
        }
    }

    /// Root-level search with full alpha-beta window.
    ///
    /// Stops after the current move when the recursion was cut short or
    /// `root` expired with moves left.
    fn search_root(
        &mut self,
        board: &mut Board,
        ai: Color,
        moves: &[Move],
        depth: u8,
        hash: u64,
        root: Deadline,
    ) -> RootOutcome {
        let mut alpha = -INF;
        let beta = INF;
        let mut best: Option<(Move, i32)> = None;

        for (i, &mv) in moves.iter().enumerate() {
            let score = {
                let mut probe = board.probe(mv.pos, mv.card);
                let child = self.zobrist.update(hash, mv.pos, probe.covered(), mv.card);
                self.alpha_beta(&mut probe, ai, depth - 1, alpha, beta, false, child)
            };

            if self.stopped {
                if best.is_none() {
                    best = Some((mv, score));
                }
                return RootOutcome { best, completed: false };
            }

            if best.map_or(true, |(_, s)| score > s) {
                best = Some((mv, score));
                alpha = alpha.max(score);
            }

            if i + 1 < moves.len() && root.expired() {
                return RootOutcome { best, completed: false };
            }
        }

        RootOutcome { best, completed: true }
    }

    /// Alpha-beta over MAX (the AI) and MIN (all other seats pooled) nodes.
    #[allow(clippy::too_many_arguments)]
    fn alpha_beta(
        &mut self,
        board: &mut Board,
        ai: Color,
        depth: u8,
        mut alpha: i32,
        mut beta: i32,
        maximizing: bool,
        hash: u64,
    ) -> i32 {
        self.nodes += 1;

        if self.check_time() {
            return evaluate_at_depth(board, ai, depth);
        }
        if let Some(score) = terminal_score(board, ai, depth) {
            return score;
        }
        if depth == 0 {
            return static_score(board, ai);
        }

        let node = if maximizing { NodeKind::Max } else { NodeKind::Min };
        if self.use_tt {
            self.stats.tt_probes += 1;
            if let Some(score) = self.tt.probe(hash, depth, node, alpha, beta) {
                self.stats.tt_hits += 1;
                return score;
            }
        }

        let (orig_alpha, orig_beta) = (alpha, beta);

        let best = if maximizing {
            let mut moves = theoretical_moves(ai, board);
            if moves.is_empty() {
                return static_score(board, ai);
            }
            if self.use_ordering {
                order_moves(board, &mut moves, ai);
            }

            let mut best = -INF;
            for (i, &mv) in moves.iter().enumerate() {
                let score = {
                    let mut probe = board.probe(mv.pos, mv.card);
                    let child = self.zobrist.update(hash, mv.pos, probe.covered(), mv.card);
                    self.alpha_beta(&mut probe, ai, depth - 1, alpha, beta, false, child)
                };
                best = best.max(score);
                alpha = alpha.max(score);
                if alpha >= beta {
                    self.stats.cutoffs += 1;
                    if i == 0 {
                        self.stats.first_move_cutoffs += 1;
                    }
                    break;
                }
                if self.stopped {
                    break;
                }
            }
            best
        } else {
            let opponents: Vec<Color> = board.opponents(ai).collect();
            let mut best = INF;
            let mut tried = 0usize;

            'colors: for opp in opponents {
                for mv in theoretical_moves(opp, board) {
                    let score = {
                        let mut probe = board.probe(mv.pos, mv.card);
                        let child = self.zobrist.update(hash, mv.pos, probe.covered(), mv.card);
                        self.alpha_beta(&mut probe, ai, depth - 1, alpha, beta, true, child)
                    };
                    tried += 1;
                    best = best.min(score);
                    beta = beta.min(score);
                    if beta <= alpha {
                        self.stats.cutoffs += 1;
                        if tried == 1 {
                            self.stats.first_move_cutoffs += 1;
                        }
                        break 'colors;
                    }
                    if self.stopped {
                        break 'colors;
                    }
                }
            }

            if tried == 0 {
                return static_score(board, ai);
            }
            best
        };

        if self.use_tt && !self.stopped {
            let entry_type = EntryType::from_window(best, orig_alpha, orig_beta);
            self.tt.store(hash, depth, node, best, entry_type);
        }

        best
    }

    /// Clear the transposition table.
    pub fn clear_tt(&mut self) {
        self.tt.clear();
    }

    /// Get transposition table statistics.
    #[must_use]
    pub fn tt_stats(&self) -> TTStats {
        self.tt.stats()
    }
}

impl Default for Searcher {
    fn default() -> Self {
        Self::new(16)
    }
}
