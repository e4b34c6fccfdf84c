//! Match caching
//!
//! Matching is a pure function of the tree and the location, so initial
//! matches can be reused across navigations. Entries are keyed by the raw
//! location string and evicted least-recently-used. Failed matches are never
//! stored, and the payload and transition flag are re-stamped on every hit.

use crate::matcher::RouteMatchList;
use crate::{trace_log, Extra};
use lru::LruCache;
use std::num::NonZeroUsize;

/// Cache performance statistics
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: usize,
    pub misses: usize,
    pub invalidations: usize,
}

impl CacheStats {
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

/// LRU cache of successful match lists
#[derive(Debug)]
pub struct MatchCache {
    entries: LruCache<String, RouteMatchList>,
    stats: CacheStats,
}

impl MatchCache {
    pub const DEFAULT_CAPACITY: usize = 64;

    /// Create a cache, or `None` for a zero capacity
    pub fn with_capacity(capacity: usize) -> Option<Self> {
        let cap = NonZeroUsize::new(capacity)?;
        Some(Self {
            entries: LruCache::new(cap),
            stats: CacheStats::default(),
        })
    }

    /// Look up a location, stamping the given payload and transition flag
    pub fn get(
        &mut self,
        location: &str,
        extra: Option<Extra>,
        transition_enabled: bool,
    ) -> Option<RouteMatchList> {
        if let Some(cached) = self.entries.get(location) {
            self.stats.hits += 1;
            trace_log!("match cache hit for '{}'", location);
            Some(cached.clone().with_navigation(extra, transition_enabled))
        } else {
            self.stats.misses += 1;
            trace_log!("match cache miss for '{}'", location);
            None
        }
    }

    /// Store a match; failures are ignored
    pub fn insert(&mut self, location: &str, matches: &RouteMatchList) {
        if matches.is_error() {
            return;
        }
        self.entries
            .push(location.to_string(), matches.clone().with_navigation(None, true));
    }

    pub fn clear(&mut self) {
        trace_log!("clearing match cache");
        self.entries.clear();
        self.stats.invalidations += 1;
    }

    pub fn stats(&self) -> &CacheStats {
        &self.stats
    }

    pub fn reset_stats(&mut self) {
        self.stats = CacheStats::default();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.entries.cap().get()
    }
}
