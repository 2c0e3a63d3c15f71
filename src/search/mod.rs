//! Search module for the Punto AI
//!
//! Contains:
//! - Zobrist hashing for position identification
//! - Bounded transposition tables for caching search results
//! - Wall-clock deadlines shared by every search
//! - Standard alpha-beta with iterative deepening
//! - Paranoid coalition search
//! - One-ply threat and stacking analysis

pub mod alphabeta;
pub mod deadline;
pub mod paranoid;
pub mod threat;
pub mod tt;
pub mod zobrist;

pub use alphabeta::{SearchResult, SearchStats, Searcher};
pub use deadline::Deadline;
pub use paranoid::ParanoidSearcher;
pub use threat::{opponent_threats, threat_level, Threat, ThreatAnalyzer, THREAT_PROBE_VALUE};
pub use tt::{EntryType, NodeKind, TTEntry, TTStats, TranspositionTable};
pub use zobrist::ZobristTable;
