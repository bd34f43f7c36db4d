//! Cache Statistics Module
//!
//! Counts read outcomes and writes seen by the facade.

use serde::Serialize;

// == Cache Stats ==
/// Per-facade operation counters.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CacheStats {
    /// Keys found by reads
    pub hits: u64,
    /// Keys not found (or classified missing) by reads
    pub misses: u64,
    /// Successful writes
    pub sets: u64,
    /// Keys removed by `bust`
    pub busted: u64,
}

impl CacheStats {
    // == Constructor ==
    /// Creates a new CacheStats with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    // == Hit Rate ==
    /// Calculates the cache hit rate.
    ///
    /// Returns hits / (hits + misses), or 0.0 if no reads have been made.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    pub fn record_hits(&mut self, count: u64) {
        self.hits += count;
    }

    pub fn record_misses(&mut self, count: u64) {
        self.misses += count;
    }

    pub fn record_set(&mut self) {
        self.sets += 1;
    }

    pub fn record_busted(&mut self, count: u64) {
        self.busted += count;
    }
}
