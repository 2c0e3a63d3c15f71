//! Bounded score cache shared by the recursion of one searcher
//!
//! Entries are keyed by `(board hash, remaining depth, node kind)` and stored
//! direct-mapped in a fixed number of slots, so memory stays bounded for the
//! lifetime of the engine. Each searcher owns its own table.
//!
//! # Example
//!
//! ```
//! use punto::search::{EntryType, NodeKind, TranspositionTable};
//!
//! let mut tt = TranspositionTable::new(1);
//!
//! let hash = 0x1234_5678_9ABC_DEF0;
//! tt.store(hash, 3, NodeKind::Max, 250, EntryType::Exact);
//!
//! assert_eq!(tt.probe(hash, 3, NodeKind::Max, -1000, 1000), Some(250));
//! // Other depths and node kinds are separate keys
//! assert_eq!(tt.probe(hash, 2, NodeKind::Max, -1000, 1000), None);
//! assert_eq!(tt.probe(hash, 3, NodeKind::Min, -1000, 1000), None);
//! ```

/// Slots allocated however small the requested size
const MIN_SLOTS: usize = 1024;

/// Which side moves at the cached node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// The searching AI to move
    Max,
    /// The pooled opponents to move
    Min,
}

/// How a cached score relates to the true value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryType {
    /// Searched inside the window
    Exact,
    /// Failed high: the true value is at least the score
    LowerBound,
    /// Failed low: the true value is at most the score
    UpperBound,
}

impl EntryType {
    /// Classify a fail-soft result against the window it was searched with
    #[inline]
    pub fn from_window(score: i32, alpha: i32, beta: i32) -> Self {
        if score <= alpha {
            EntryType::UpperBound
        } else if score >= beta {
            EntryType::LowerBound
        } else {
            EntryType::Exact
        }
    }
}

/// One cached node
#[derive(Debug, Clone, Copy)]
pub struct TTEntry {
    /// Full key, checked on probe
    pub hash: u64,
    /// Plies that were left below the node
    pub depth: u8,
    pub node: NodeKind,
    pub score: i32,
    pub entry_type: EntryType,
}

/// Fixed-capacity, direct-mapped cache. A slot holds one entry; deeper
/// entries win collisions.
pub struct TranspositionTable {
    entries: Vec<Option<TTEntry>>,
    size: usize,
}

impl TranspositionTable {
    /// Table filling roughly `size_mb` megabytes, never fewer than 1024 slots
    #[must_use]
    pub fn new(size_mb: usize) -> Self {
        let slots = (size_mb << 20) / std::mem::size_of::<Option<TTEntry>>();
        let size = slots.max(MIN_SLOTS);

        Self {
            entries: vec![None; size],
            size,
        }
    }

    #[inline]
    fn slot(&self, hash: u64, depth: u8, node: NodeKind) -> usize {
        let salt = (depth as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15)
            ^ match node {
                NodeKind::Max => 0,
                NodeKind::Min => 0xD6E8_FEB8_6659_FD93,
            };
        ((hash ^ salt) % self.size as u64) as usize
    }

    /// Returns the cached score when an entry with the same key exists and
    /// its bound is usable for the `(alpha, beta)` window.
    #[must_use]
    pub fn probe(
        &self,
        hash: u64,
        depth: u8,
        node: NodeKind,
        alpha: i32,
        beta: i32,
    ) -> Option<i32> {
        let entry = self.entries[self.slot(hash, depth, node)]?;

        if entry.hash != hash || entry.depth != depth || entry.node != node {
            return None;
        }

        match entry.entry_type {
            EntryType::Exact => Some(entry.score),
            EntryType::LowerBound if entry.score >= beta => Some(entry.score),
            EntryType::UpperBound if entry.score <= alpha => Some(entry.score),
            _ => None,
        }
    }

    /// Cache a searched node. An occupied slot is replaced when it holds the same key or an entry
    /// searched no deeper than the new one.
    pub fn store(
        &mut self,
        hash: u64,
        depth: u8,
        node: NodeKind,
        score: i32,
        entry_type: EntryType,
    ) {
        let idx = self.slot(hash, depth, node);

        let replace = match &self.entries[idx] {
            None => true,
            Some(e) => (e.hash == hash && e.node == node) || e.depth <= depth,
        };

        if replace {
            self.entries[idx] = Some(TTEntry {
                hash,
                depth,
                node,
                score,
                entry_type,
            });
        }
    }

    /// Drop every entry, keeping the capacity
    pub fn clear(&mut self) {
        self.entries.fill(None);
    }

    /// Number of slots
    #[inline]
    pub fn capacity(&self) -> usize {
        self.size
    }

    /// Occupancy snapshot
    #[must_use]
    pub fn stats(&self) -> TTStats {
        let used = self.entries.iter().flatten().count();
        TTStats {
            size: self.size,
            used,
            usage_percent: (used * 100 / self.size) as u8,
        }
    }
}

/// Table occupancy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TTStats {
    /// Slots
    pub size: usize,
    /// Occupied slots
    pub used: usize,
    /// 0 to 100
    pub usage_percent: u8,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tt_exact_hit() {
        let mut tt = TranspositionTable::new(1);
        tt.store(42, 4, NodeKind::Max, 123, EntryType::Exact);
        assert_eq!(tt.probe(42, 4, NodeKind::Max, -1000, 1000), Some(123));
    }

    #[test]
    fn test_tt_depth_is_part_of_key() {
        let mut tt = TranspositionTable::new(1);
        tt.store(42, 4, NodeKind::Max, 123, EntryType::Exact);
        assert_eq!(tt.probe(42, 3, NodeKind::Max, -1000, 1000), None);
        assert_eq!(tt.probe(42, 5, NodeKind::Max, -1000, 1000), None);
    }

    #[test]
    fn test_tt_node_kind_is_part_of_key() {
        let mut tt = TranspositionTable::new(1);
        tt.store(42, 2, NodeKind::Min, -50, EntryType::Exact);
        assert_eq!(tt.probe(42, 2, NodeKind::Max, -1000, 1000), None);
        assert_eq!(tt.probe(42, 2, NodeKind::Min, -1000, 1000), Some(-50));
    }

    #[test]
    fn test_tt_fail_high_needs_beta() {
        let mut tt = TranspositionTable::new(1);
        tt.store(7, 2, NodeKind::Max, 500, EntryType::LowerBound);
        // Usable only when it already beats beta
        assert_eq!(tt.probe(7, 2, NodeKind::Max, 0, 400), Some(500));
        assert_eq!(tt.probe(7, 2, NodeKind::Max, 0, 600), None);
    }

    #[test]
    fn test_tt_fail_low_needs_alpha() {
        let mut tt = TranspositionTable::new(1);
        tt.store(7, 2, NodeKind::Min, -200, EntryType::UpperBound);
        assert_eq!(tt.probe(7, 2, NodeKind::Min, -100, 100), Some(-200));
        assert_eq!(tt.probe(7, 2, NodeKind::Min, -300, 100), None);
    }

    /// A different hash landing in the same slot as `(hash, depth, node)`
    fn colliding(
        tt: &TranspositionTable,
        hash: u64,
        depth: u8,
        node: NodeKind,
        at_depth: u8,
    ) -> u64 {
        let target = tt.slot(hash, depth, node);
        (hash + 1..)
            .find(|&h| tt.slot(h, at_depth, node) == target)
            .unwrap()
    }

    #[test]
    fn test_tt_colliding_key_misses() {
        let mut tt = TranspositionTable::new(1);
        tt.store(5, 1, NodeKind::Max, 10, EntryType::Exact);
        let other = colliding(&tt, 5, 1, NodeKind::Max, 1);
        assert_eq!(tt.probe(other, 1, NodeKind::Max, -100, 100), None);
    }

    #[test]
    fn test_tt_equal_depth_replaces() {
        let mut tt = TranspositionTable::new(1);
        tt.store(5, 1, NodeKind::Max, 10, EntryType::Exact);
        let other = colliding(&tt, 5, 1, NodeKind::Max, 1);
        tt.store(other, 1, NodeKind::Max, 20, EntryType::Exact);
        assert_eq!(tt.probe(other, 1, NodeKind::Max, -100, 100), Some(20));
        assert_eq!(tt.probe(5, 1, NodeKind::Max, -100, 100), None);
    }

    #[test]
    fn test_tt_deeper_entry_survives() {
        let mut tt = TranspositionTable::new(1);
        tt.store(5, 4, NodeKind::Max, 10, EntryType::Exact);
        let other = colliding(&tt, 5, 4, NodeKind::Max, 2);
        tt.store(other, 2, NodeKind::Max, 20, EntryType::Exact);
        assert_eq!(tt.probe(5, 4, NodeKind::Max, -100, 100), Some(10));
        assert_eq!(tt.probe(other, 2, NodeKind::Max, -100, 100), None);
    }

    #[test]
    fn test_tt_clear_and_stats() {
        let mut tt = TranspositionTable::new(1);
        assert_eq!(tt.stats().used, 0);
        tt.store(1, 1, NodeKind::Max, 1, EntryType::Exact);
        tt.store(2, 1, NodeKind::Min, 2, EntryType::Exact);
        let stats = tt.stats();
        assert_eq!(stats.used, 2);
        assert_eq!(stats.size, tt.capacity());
        tt.clear();
        assert_eq!(tt.stats().used, 0);
        assert_eq!(tt.probe(1, 1, NodeKind::Max, -10, 10), None);
    }

    #[test]
    fn test_tt_capacity_is_bounded() {
        let mut tt = TranspositionTable::new(1);
        for hash in 0..(tt.capacity() as u64 * 3) {
            tt.store(hash, 1, NodeKind::Max, 0, EntryType::Exact);
        }
        assert!(tt.stats().used <= tt.capacity());
    }

    #[test]
    fn test_tt_floor_capacity() {
        let tt = TranspositionTable::new(0);
        assert_eq!(tt.capacity(), MIN_SLOTS);
    }

    #[test]
    fn test_entry_type_from_window() {
        assert_eq!(EntryType::from_window(-5, 0, 10), EntryType::UpperBound);
        assert_eq!(EntryType::from_window(10, 0, 10), EntryType::LowerBound);
        assert_eq!(EntryType::from_window(5, 0, 10), EntryType::Exact);
    }
}
