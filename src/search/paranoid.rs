//! Paranoid coalition search
//!
//! Every other seated color is treated as one adversary that minimizes the
//! AI's score. MIN nodes pool all opponents' moves, each tagged with its own
//! color, and try them nearest-to-center first. MAX nodes are the AI's own
//! placements. Depth comes straight from the skill level.
//!
//! Only MIN nodes are cached, in a table separate from the standard searcher's.

use log::{debug, trace};

use crate::board::{Board, Card, Color, Move};
use crate::eval::{evaluate_at_depth, static_score, terminal_score};
use crate::movegen::{legal_moves, order_by_center, order_moves, theoretical_moves};

use super::alphabeta::{SearchResult, SearchStats, INF};
use super::{Deadline, EntryType, NodeKind, TTStats, TranspositionTable, ZobristTable};

/// Paranoid searcher with its own MIN-node cache
pub struct ParanoidSearcher {
    zobrist: ZobristTable,
    tt: TranspositionTable,
    use_ordering: bool,
    use_tt: bool,
    nodes: u64,
    stopped: bool,
    /// Absolute ceiling for the recursion
    hard_limit: Deadline,
    stats: SearchStats,
}

impl ParanoidSearcher {
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
            hard_limit: Deadline::from_now(std::time::Duration::MAX),
            stats: SearchStats::default(),
        }
    }

    #[inline]
    fn check_time(&mut self) -> bool {
        if !self.stopped && self.hard_limit.expired() {
            self.stopped = true;
        }
        self.stopped
    }

    /// Search the moves of `hand` to `depth` plies.
    ///
    /// Root moves are always ordered. The root loop stops once `root`
    /// expires; the recursion returns static scores once `hard_limit` does.
    /// The first ordered move is the answer when nothing better is proven.
    pub fn search(
        &mut self,
        board: &mut Board,
        ai: Color,
        hand: &[Card],
        depth: u8,
        root: Deadline,
        hard_limit: Deadline,
    ) -> SearchResult {
        self.nodes = 0;
        self.stopped = false;
        self.hard_limit = hard_limit;
        self.stats = SearchStats::default();

        let mut moves = legal_moves(hand, board);
        if moves.is_empty() {
            return SearchResult::none();
        }
        order_moves(board, &mut moves, ai);

        let depth = depth.max(1);
        let hash = self.zobrist.with_perspective(self.zobrist.hash(board), ai);
        let mut alpha = -INF;
        let beta = INF;
        let mut best_move = moves[0];
        let mut best_score = -INF;
        let mut completed = true;

        for (i, &mv) in moves.iter().enumerate() {
            let score = {
                let mut probe = board.probe(mv.pos, mv.card);
                let child = self.zobrist.update(hash, mv.pos, probe.covered(), mv.card);
                self.min_node(&mut probe, ai, depth - 1, alpha, beta, child)
            };

            if score > best_score {
                best_score = score;
                best_move = mv;
            }
            alpha = alpha.max(best_score);

            if beta <= alpha {
                break;
            }
            if i + 1 < moves.len() && (self.stopped || root.expired()) {
                debug!("paranoid root stopped after {} of {} moves", i + 1, moves.len());
                completed = false;
                break;
            }
        }
        if self.stopped {
            completed = false;
        }

        trace!("paranoid tt: {:?}", self.tt.stats());
        SearchResult {
            best_move: Some(best_move),
            score: best_score,
            depth: if completed { depth } else { 0 },
            nodes: self.nodes,
            completed,
            elapsed_ms: root.elapsed().as_millis() as u64,
            stats: self.stats.clone(),
        }
    }

    /// Coalition turn: every opponent's moves in one pool, nearest center first.
    fn min_node(
        &mut self,
        board: &mut Board,
        ai: Color,
        depth: u8,
        alpha: i32,
        mut beta: i32,
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

        if self.use_tt {
            self.stats.tt_probes += 1;
            if let Some(score) = self.tt.probe(hash, depth, NodeKind::Min, alpha, beta) {
                self.stats.tt_hits += 1;
                return score;
            }
        }

        let mut pool: Vec<Move> = Vec::new();
        for opp in board.opponents(ai) {
            pool.extend(theoretical_moves(opp, board));
        }
        if pool.is_empty() {
            return static_score(board, ai);
        }
        order_by_center(&mut pool);

        let orig_beta = beta;
        let mut best = INF;
        for (i, &mv) in pool.iter().enumerate() {
            let score = {
                let mut probe = board.probe(mv.pos, mv.card);
                let child = self.zobrist.update(hash, mv.pos, probe.covered(), mv.card);
                self.max_node(&mut probe, ai, depth - 1, alpha, beta, child)
            };
            best = best.min(score);
            beta = beta.min(score);
            if beta <= alpha {
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

        if self.use_tt && !self.stopped {
            let entry_type = EntryType::from_window(best, alpha, orig_beta);
            self.tt.store(hash, depth, NodeKind::Min, best, entry_type);
        }
        best
    }

    /// The AI's own turn
    fn max_node(
        &mut self,
        board: &mut Board,
        ai: Color,
        depth: u8,
        mut alpha: i32,
        beta: i32,
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
                self.min_node(&mut probe, ai, depth - 1, alpha, beta, child)
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
    }

    pub fn clear_tt(&mut self) {
        self.tt.clear();
    }

    #[must_use]
    pub fn tt_stats(&self) -> TTStats {
        self.tt.stats()
    }
}

impl Default for ParanoidSearcher {
    fn default() -> Self {
        Self::new(16)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Pos;
    use crate::eval::PatternScore;
    use std::time::Duration;

    const THREE: [Color; 3] = [Color::Red, Color::Green, Color::Blue];

    fn generous() -> Deadline {
        Deadline::from_now(Duration::from_secs(600))
    }

    fn put(board: &mut Board, r: u8, c: u8, value: u8, color: Color) {
        board.place_card(Pos::new(r, c), Card::new(value, color));
    }

    #[test]
    fn test_paranoid_takes_win() {
        let mut searcher = ParanoidSearcher::new(1);
        let mut board = Board::new(&THREE);
        for c in 2..5 {
            put(&mut board, 4, c, 5, Color::Red);
        }
        put(&mut board, 5, 3, 5, Color::Green);
        let hand = [Card::new(8, Color::Red)];

        let result = searcher.search(&mut board, Color::Red, &hand, 2, generous(), generous());
        let pos = result.best_move.unwrap().pos;
        assert!(pos == Pos::new(4, 1) || pos == Pos::new(4, 5));
        assert!(result.score >= PatternScore::WIN);
    }

    #[test]
    fn test_paranoid_blocks_any_opponent() {
        let mut searcher = ParanoidSearcher::new(1);
        let mut board = Board::new(&THREE);
        // Blue three closed on the left by the edge, Green far away
        for c in 0..3 {
            put(&mut board, 4, c, 9, Color::Blue);
        }
        put(&mut board, 5, 1, 2, Color::Green);
        let hand = [Card::new(6, Color::Red)];

        let result = searcher.search(&mut board, Color::Red, &hand, 2, generous(), generous());
        assert_eq!(result.best_move.map(|m| m.pos), Some(Pos::new(4, 3)));
    }

    #[test]
    fn test_paranoid_restores_board() {
        let mut searcher = ParanoidSearcher::new(1);
        let mut board = Board::opened(&THREE, Card::new(4, Color::Green));
        put(&mut board, 4, 5, 3, Color::Blue);
        let before = board.clone();
        let hand = [Card::new(5, Color::Red), Card::new(9, Color::Red)];

        for depth in 1..=3 {
            searcher.search(&mut board, Color::Red, &hand, depth, generous(), generous());
            assert_eq!(board, before);
        }
    }

    #[test]
    fn test_paranoid_only_caches_min_nodes() {
        let mut searcher = ParanoidSearcher::new(1);
        let mut board = Board::opened(&THREE, Card::new(4, Color::Green));
        let hand = [Card::new(5, Color::Red)];

        searcher.search(&mut board, Color::Red, &hand, 1, generous(), generous());
        // Depth 1 reaches MIN nodes only at depth 0, which are never cached
        assert_eq!(searcher.tt_stats().used, 0);

        searcher.search(&mut board, Color::Red, &hand, 2, generous(), generous());
        assert!(searcher.tt_stats().used > 0);
        searcher.clear_tt();
        assert_eq!(searcher.tt_stats().used, 0);
    }

    #[test]
    fn test_paranoid_expired_root_keeps_first_move() {
        let mut searcher = ParanoidSearcher::new(1);
        let mut board = Board::opened(&THREE, Card::new(4, Color::Green));
        let hand = [Card::new(5, Color::Red)];

        let before = board.clone();

        let expired = Deadline::from_now(Duration::ZERO);
        let result = searcher.search(&mut board, Color::Red, &hand, 3, expired, expired);
        assert!(result.best_move.is_some());
        assert!(!result.completed);
        assert_eq!(board, before);
    }

    #[test]
    fn test_paranoid_time_abort_restores_board() {
        let mut board = Board::opened(&THREE, Card::new(5, Color::Green));
        put(&mut board, 4, 5, 3, Color::Blue);
        put(&mut board, 3, 4, 6, Color::Red);
        put(&mut board, 5, 5, 2, Color::Green);
        put(&mut board, 3, 3, 7, Color::Blue);
        put(&mut board, 5, 3, 4, Color::Red);
        let before = board.clone();
        let hand = [Card::new(3, Color::Red), Card::new(6, Color::Red), Card::new(9, Color::Red)];

        for ms in [0, 1, 5, 20] {
            let mut searcher = ParanoidSearcher::new(1);
            let budget = Duration::from_millis(ms);
            // Root guard generous, so the abort lands inside the recursion
            let hard = Deadline::from_now(budget);
            let result = searcher.search(&mut board, Color::Red, &hand, 3, generous(), hard);
            assert!(result.best_move.is_some());
            assert_eq!(board, before, "hard limit {ms}ms");

            let root = Deadline::from_now(budget);
            let result = searcher.search(&mut board, Color::Red, &hand, 3, root, generous());
            assert!(result.best_move.is_some());
            assert_eq!(board, before, "root limit {ms}ms");
        }
    }

    #[test]
    fn test_paranoid_no_legal_move() {
        let mut searcher = ParanoidSearcher::new(1);
        let mut board = Board::opened(&THREE, Card::new(4, Color::Green));
        let result = searcher.search(&mut board, Color::Red, &[], 2, generous(), generous());
        assert!(result.best_move.is_none());
    }
}
