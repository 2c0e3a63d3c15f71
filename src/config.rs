//! Engine tunables and per-player AI profiles.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Errors raised for malformed AI settings.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("unknown AI type '{0}' (expected smart or paranoid)")]
    UnknownAiType(String),
    #[error("AI level {0} outside 1..=3")]
    InvalidLevel(u8),
    #[error("invalid engine config: {0}")]
    Invalid(&'static str),
}

/// Search strategy used in the last phase of the decision cascade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AiType {
    /// Alternating alpha-beta with every opponent pooled into one MIN ply
    #[default]
    Smart,
    /// Coalition search: all opponents act as one worst-case adversary
    Paranoid,
}

impl FromStr for AiType {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "smart" => Ok(AiType::Smart),
            "paranoid" => Ok(AiType::Paranoid),
            _ => Err(ConfigError::UnknownAiType(s.to_string())),
        }
    }
}

impl fmt::Display for AiType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AiType::Smart => f.write_str("smart"),
            AiType::Paranoid => f.write_str("paranoid"),
        }
    }
}

/// Skill level 1..=3
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum AiLevel {
    /// First legal move after the heuristic phases
    Easy = 1,
    /// Fixed shallow search
    #[default]
    Medium = 2,
    /// Iterative deepening (or the deepest paranoid search)
    Hard = 3,
}

impl AiLevel {
    #[inline]
    pub fn number(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for AiLevel {
    type Error = ConfigError;

    fn try_from(level: u8) -> Result<Self, Self::Error> {
        match level {
            1 => Ok(AiLevel::Easy),
            2 => Ok(AiLevel::Medium),
            3 => Ok(AiLevel::Hard),
            other => Err(ConfigError::InvalidLevel(other)),
        }
    }
}

impl From<AiLevel> for u8 {
    fn from(level: AiLevel) -> u8 {
        level.number()
    }
}

/// Agent type and skill level of an AI seat
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct AiProfile {
    pub kind: AiType,
    pub level: AiLevel,
}

impl AiProfile {
    pub fn new(kind: AiType, level: AiLevel) -> Self {
        Self { kind, level }
    }

    pub fn smart(level: AiLevel) -> Self {
        Self::new(AiType::Smart, level)
    }

    pub fn paranoid(level: AiLevel) -> Self {
        Self::new(AiType::Paranoid, level)
    }
}

impl FromStr for AiProfile {
    type Err = ConfigError;

    /// Parses `kind:level`, e.g. `paranoid:3`. A bare kind means level 2.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (kind, level) = match s.split_once(':') {
            Some((kind, level)) => {
                let level: u8 = level
                    .trim()
                    .parse()
                    .map_err(|_| ConfigError::Invalid("AI level must be a number"))?;
                (kind.parse()?, AiLevel::try_from(level)?)
            }
            None => (s.parse()?, AiLevel::default()),
        };
        Ok(Self::new(kind, level))
    }
}

impl fmt::Display for AiProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind, self.level.number())
    }
}

/// Engine tunables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Iterative deepening ceiling
    pub max_depth: u8,
    /// Iterative deepening budget, also the inner budget of the shallow search
    pub time_limit_ms: u64,
    /// Depth of the fixed shallow search
    pub shallow_depth: u8,
    /// Root-loop guard of the shallow search
    pub shallow_time_limit_ms: u64,
    /// Absolute ceiling inside paranoid recursion
    pub paranoid_time_limit_ms: u64,
    /// Paranoid root-loop ceiling for levels 1 and 2
    pub paranoid_root_limit_ms: u64,
    /// Paranoid root-loop ceiling for level 3
    pub paranoid_deep_root_limit_ms: u64,
    pub use_move_ordering: bool,
    pub use_transposition_table: bool,
    /// Capacity of each transposition table in MiB
    pub tt_size_mb: usize,
    /// Minimum stack value for the stacking phase to fire
    pub stacking_threshold: i32,
    /// Minimum score for the aggressive block phase to fire
    pub aggressive_block_threshold: i32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_depth: 6,
            time_limit_ms: 8000,
            shallow_depth: 2,
            shallow_time_limit_ms: 1200,
            paranoid_time_limit_ms: 6000,
            paranoid_root_limit_ms: 1500,
            paranoid_deep_root_limit_ms: 3500,
            use_move_ordering: true,
            use_transposition_table: true,
            tt_size_mb: 16,
            stacking_threshold: 1200,
            aggressive_block_threshold: 500,
        }
    }
}

impl EngineConfig {
    pub fn with_max_depth(mut self, depth: u8) -> Self {
        self.max_depth = depth;
        self
    }

    pub fn with_time_limit_ms(mut self, ms: u64) -> Self {
        self.time_limit_ms = ms;
        self
    }

    pub fn with_shallow_search(mut self, depth: u8, time_limit_ms: u64) -> Self {
        self.shallow_depth = depth;
        self.shallow_time_limit_ms = time_limit_ms;
        self
    }

    pub fn with_paranoid_limits(mut self, hard_ms: u64, root_ms: u64, deep_root_ms: u64) -> Self {
        self.paranoid_time_limit_ms = hard_ms;
        self.paranoid_root_limit_ms = root_ms;
        self.paranoid_deep_root_limit_ms = deep_root_ms;
        self
    }

    pub fn with_move_ordering(mut self, enabled: bool) -> Self {
        self.use_move_ordering = enabled;
        self
    }

    pub fn with_transposition_table(mut self, enabled: bool) -> Self {
        self.use_transposition_table = enabled;
        self
    }

    pub fn with_tt_size_mb(mut self, mb: usize) -> Self {
        self.tt_size_mb = mb;
        self
    }

    pub fn with_thresholds(mut self, stacking: i32, aggressive_block: i32) -> Self {
        self.stacking_threshold = stacking;
        self.aggressive_block_threshold = aggressive_block;
        self
    }

    pub fn time_limit(&self) -> Duration {
        Duration::from_millis(self.time_limit_ms)
    }

    pub fn shallow_time_limit(&self) -> Duration {
        Duration::from_millis(self.shallow_time_limit_ms)
    }

    pub fn paranoid_time_limit(&self) -> Duration {
        Duration::from_millis(self.paranoid_time_limit_ms)
    }

    /// Root-loop ceiling of the paranoid search for a given level
    pub fn paranoid_root_limit(&self, level: AiLevel) -> Duration {
        match level {
            AiLevel::Hard => Duration::from_millis(self.paranoid_deep_root_limit_ms),
            _ => Duration::from_millis(self.paranoid_root_limit_ms),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_depth == 0 {
            return Err(ConfigError::Invalid("max_depth must be at least 1"));
        }
        if self.shallow_depth == 0 || self.shallow_depth > self.max_depth {
            return Err(ConfigError::Invalid("shallow_depth must be within 1..=max_depth"));
        }
        if self.time_limit_ms == 0
            || self.shallow_time_limit_ms == 0
            || self.paranoid_time_limit_ms == 0
            || self.paranoid_root_limit_ms == 0
            || self.paranoid_deep_root_limit_ms == 0
        {
            return Err(ConfigError::Invalid("time limits must be positive"));
        }
        if self.tt_size_mb == 0 {
            return Err(ConfigError::Invalid("tt_size_mb must be positive"));
        }
        Ok(())
    }
}
