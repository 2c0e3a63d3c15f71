//! Position evaluation

pub mod heuristic;
pub mod patterns;
pub mod sequences;

pub use heuristic::{evaluate, evaluate_at_depth, static_score, terminal_score};
pub use patterns::{win_score, FeatureWeight, PatternScore};
pub use sequences::{analyze_sequences, line_run, run_length, LineRun, SequenceCounts};
