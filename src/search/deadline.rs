//! Cooperative wall-clock budgets
//!
//! Searches poll a `Deadline` at every node and root iteration; nothing is
//! preempted, so a search may overrun by one leaf evaluation.

use std::time::{Duration, Instant};

/// A time budget measured from a fixed start
#[derive(Debug, Clone, Copy)]
pub struct Deadline {
    start: Instant,
    limit: Duration,
}

impl Deadline {
    #[inline]
    pub fn new(start: Instant, limit: Duration) -> Self {
        Self { start, limit }
    }

    /// Budget starting now
    #[inline]
    pub fn from_now(limit: Duration) -> Self {
        Self::new(Instant::now(), limit)
    }

    #[inline]
    pub fn expired(&self) -> bool {
        self.start.elapsed() >= self.limit
    }

    #[inline]
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    #[inline]
    pub fn start(&self) -> Instant {
        self.start
    }
}
