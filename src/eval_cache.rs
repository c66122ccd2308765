//! Memo of leaf evaluations keyed by Zobrist hash.
//!
//! The cache only grows during a game; callers decide when to [`clear`] it.
//!
//! [`clear`]: EvalCache::clear

use std::collections::HashMap;

#[derive(Debug, Default)]
pub struct EvalCache {
    entries: HashMap<u64, f32>,
    hits: u64,
    misses: u64,
}

impl EvalCache {
    #[must_use]
    pub fn new() -> Self {
        EvalCache::default()
    }

    /// Look up a score, counting the hit or miss.
    pub fn probe(&mut self, hash: u64) -> Option<f32> {
        let found = self.entries.get(&hash).copied();
        if found.is_some() {
            self.hits += 1;
        } else {
            self.misses += 1;
        }
        found
    }

    #[must_use]
    pub fn contains(&self, hash: u64) -> bool {
        self.entries.contains_key(&hash)
    }

    pub fn store(&mut self, hash: u64, score: f32) {
        self.entries.insert(hash, score);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn hits(&self) -> u64 {
        self.hits
    }

    #[must_use]
    pub fn misses(&self) -> u64 {
        self.misses
    }

    /// Drop every entry and reset the counters.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.hits = 0;
        self.misses = 0;
    }
}
