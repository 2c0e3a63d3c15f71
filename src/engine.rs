//! Main AI Engine integrating all search components
//!
//! This module provides the decision cascade that picks a move for an AI
//! seat. The phases run strictly in order and the first one with an answer
//! wins:
//!
//! 1. **Immediate win**: a hand card that completes a line now
//! 2. **Critical block**: the cell where an opponent would win next turn
//! 3. **Stacking**: covering an enemy card, if valuable enough
//! 4. **Aggressive block**: cutting an opponent run short, if valuable enough
//! 5. **Search**: greedy at level 1, shallow alpha-beta at level 2, iterative
//!    deepening at level 3; paranoid seats run the coalition search instead
//!
//! # Example
//!
//! ```
//! use std::time::Instant;
//! use punto::{AIEngine, AiLevel, AiProfile, Board, Card, Color, Player};
//!
//! let mut engine = AIEngine::new();
//! let mut board = Board::opened(&[Color::Red, Color::Blue], Card::new(5, Color::Blue));
//! let player = Player::ai(Color::Red, AiProfile::smart(AiLevel::Easy))
//!     .with_hand(vec![Card::new(3, Color::Red), Card::new(8, Color::Red)]);
//!
//! let result = engine.choose_move(&mut board, &player, Instant::now());
//! println!("{} {:?}", result.search_type.tag(), result.best_move);
//! ```

use std::fmt;
use std::time::Instant;

use log::{debug, info, trace};
use serde::Serialize;

use crate::board::{Board, Move};
use crate::config::{AiLevel, AiType, ConfigError, EngineConfig};
use crate::eval::PatternScore;
use crate::movegen::legal_moves;
use crate::player::Player;
use crate::search::{Deadline, ParanoidSearcher, SearchResult, Searcher, TTStats, ThreatAnalyzer};

/// Phase of the cascade that produced the move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchType {
    /// Completed a winning line
    ImmediateWin,
    /// Occupied an opponent's winning cell
    CriticalBlock,
    /// Covered an enemy card
    Stacking,
    /// Occupied an end of an opponent run
    AggressiveBlock,
    /// First legal move (level 1)
    Greedy,
    /// Fixed-depth alpha-beta (level 2)
    ShallowSearch,
    /// Iterative deepening alpha-beta (level 3)
    IterativeDeepening,
    /// Coalition search
    Paranoid,
    /// Nothing playable
    NoMove,
}

impl SearchType {
    /// Short rationale tag for display and logs
    pub fn tag(self) -> &'static str {
        match self {
            SearchType::ImmediateWin => "WIN",
            SearchType::CriticalBlock | SearchType::AggressiveBlock => "BLOCK",
            SearchType::Stacking => "STACK",
            SearchType::Greedy
            | SearchType::ShallowSearch
            | SearchType::IterativeDeepening
            | SearchType::Paranoid => "SEARCH",
            SearchType::NoMove => "NONE",
        }
    }
}

impl fmt::Display for SearchType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Result of a move search with detailed statistics.
#[derive(Debug, Clone, Serialize)]
pub struct MoveResult {
    /// Best move found, if any
    pub best_move: Option<Move>,
    /// Phase-specific score (win score, threat severity, stack value, search score)
    pub score: i32,
    /// Phase that found this move
    pub search_type: SearchType,
    /// Time taken in milliseconds, measured from the caller's start
    pub time_ms: u64,
    /// Number of search nodes visited
    pub nodes: u64,
    /// Search depth reached (0 outside tree search)
    pub depth: u8,
}

impl MoveResult {
    #[inline]
    fn tactical(mv: Move, score: i32, search_type: SearchType, start: Instant) -> Self {
        Self {
            best_move: Some(mv),
            score,
            search_type,
            time_ms: start.elapsed().as_millis() as u64,
            nodes: 0,
            depth: 0,
        }
    }

    #[inline]
    fn from_search(result: SearchResult, search_type: SearchType, start: Instant) -> Self {
        let search_type = if result.best_move.is_some() {
            search_type
        } else {
            SearchType::NoMove
        };
        Self {
            best_move: result.best_move,
            score: result.score,
            search_type,
            time_ms: start.elapsed().as_millis() as u64,
            nodes: result.nodes,
            depth: result.depth,
        }
    }
}

/// Main AI Engine for Punto.
///
/// Owns one standard searcher and one paranoid searcher, each with its own
/// transposition table that lives as long as the engine. Separate engines
/// share nothing.
pub struct AIEngine {
    config: EngineConfig,
    analyzer: ThreatAnalyzer,
    searcher: Searcher,
    paranoid: ParanoidSearcher,
}

impl AIEngine {
    /// Create a new AI engine with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::build(EngineConfig::default())
    }

    /// Create an AI engine with custom configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` when `config.validate()` fails.
    pub fn with_config(config: EngineConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: EngineConfig) -> Self {
        let ordering = config.use_move_ordering;
        let caching = config.use_transposition_table;
        Self {
            analyzer: ThreatAnalyzer::new(
                config.stacking_threshold,
                config.aggressive_block_threshold,
            ),
            searcher: Searcher::with_options(config.tt_size_mb, ordering, caching),
            paranoid: ParanoidSearcher::with_options(config.tt_size_mb, ordering, caching),
            config,
        }
    }

    #[inline]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Get the best move for `player`, timing from now.
    #[must_use]
    pub fn get_move(&mut self, board: &mut Board, player: &Player) -> Option<Move> {
        self.choose_move(board, player, Instant::now()).best_move
    }

    /// Run the decision cascade for `player`.
    ///
    /// Every time budget is measured from `start`. The board is probed in
    /// place and is identical to its input when this returns. `best_move`
    /// is `None` only when the hand has no legal placement.
    pub fn choose_move(
        &mut self,
        board: &mut Board,
        player: &Player,
        start: Instant,
    ) -> MoveResult {
        let color = player.color;
        let hand = player.hand.as_slice();
        let profile = player.effective_profile();

        let result = self.cascade(board, player, start);
        match result.best_move {
            Some(mv) => info!(
                "{color} ({profile}) {}: {mv} score {} in {}ms ({} nodes, depth {})",
                result.search_type, result.score, result.time_ms, result.nodes, result.depth
            ),
            None => info!("{color} ({profile}) has no legal move with {} cards", hand.len()),
        }
        result
    }

    fn cascade(&mut self, board: &mut Board, player: &Player, start: Instant) -> MoveResult {
        let color = player.color;
        let hand = player.hand.as_slice();
        let profile = player.effective_profile();

        // 1. Immediate win
        if let Some(mv) = self.analyzer.find_immediate_win(board, color, hand) {
            return MoveResult::tactical(mv, PatternScore::WIN, SearchType::ImmediateWin, start);
        }
        debug!("phase 1: no immediate win for {color}");

        // 2. An opponent wins next turn unless blocked
        if let Some((mv, level)) = self.analyzer.find_critical_threat(board, color, hand) {
            return MoveResult::tactical(mv, level, SearchType::CriticalBlock, start);
        }
        debug!("phase 2: no blockable critical threat");

        // 3. Stacking
        if let Some((mv, value)) = self.analyzer.find_optimal_stacking(board, color, hand) {
            return MoveResult::tactical(mv, value, SearchType::Stacking, start);
        }
        debug!("phase 3: no stack above {}", self.config.stacking_threshold);

        // 4. Aggressive block
        if let Some((mv, score)) = self.analyzer.find_aggressive_block(board, color, hand) {
            return MoveResult::tactical(mv, score, SearchType::AggressiveBlock, start);
        }
        debug!("phase 4: no block above {}", self.config.aggressive_block_threshold);

        // 5. Search
        let result = match (profile.kind, profile.level) {
            (AiType::Paranoid, level) => {
                let root = Deadline::new(start, self.config.paranoid_root_limit(level));
                let hard = Deadline::new(start, self.config.paranoid_time_limit());
                let result = self.paranoid.search(board, color, hand, level.number(), root, hard);
                MoveResult::from_search(result, SearchType::Paranoid, start)
            }
            (AiType::Smart, AiLevel::Easy) => match legal_moves(hand, board).first() {
                Some(&mv) => MoveResult::tactical(mv, 0, SearchType::Greedy, start),
                None => MoveResult::from_search(SearchResult::none(), SearchType::Greedy, start),
            },
            (AiType::Smart, AiLevel::Medium) => {
                let root = Deadline::new(start, self.config.shallow_time_limit());
                let inner = Deadline::new(start, self.config.time_limit());
                let depth = self.config.shallow_depth;
                let result = self.searcher.search_fixed(board, color, hand, depth, root, inner);
                MoveResult::from_search(result, SearchType::ShallowSearch, start)
            }
            (AiType::Smart, AiLevel::Hard) => {
                let deadline = Deadline::new(start, self.config.time_limit());
                let max_depth = self.config.max_depth;
                let result =
                    self.searcher.search_iterative(board, color, hand, max_depth, deadline);
                MoveResult::from_search(result, SearchType::IterativeDeepening, start)
            }
        };
        trace!(
            "tt usage: standard {:?}, paranoid {:?}",
            self.searcher.tt_stats(),
            self.paranoid.tt_stats()
        );
        result
    }

    /// Clear both transposition tables.
    pub fn clear_cache(&mut self) {
        self.searcher.clear_tt();
        self.paranoid.clear_tt();
    }

    /// Table statistics of the standard and the paranoid searcher.
    #[must_use]
    pub fn tt_stats(&self) -> (TTStats, TTStats) {
        (self.searcher.tt_stats(), self.paranoid.tt_stats())
    }
}

impl Default for AIEngine {
    fn default() -> Self {
        Self::new()
    }
}
