//! Statistics for cache operations.
//!
//! Plain counters bumped by the engine on its normal paths. The engine is
//! single-threaded, so no atomics are involved; read them through
//! `Cache::stats()`.

/// Counters for cache activity.
///
/// # Example
/// ```
/// use cachetrax::{Cache, CacheConfig};
///
/// let mut cache: Cache<&str> = Cache::new(CacheConfig::default());
/// cache.put("key", "value");
/// let _ = cache.read("key");
/// let _ = cache.read("missing");
///
/// let stats = cache.stats();
/// assert_eq!(stats.hits(), 1);
/// assert_eq!(stats.misses(), 1);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Lookups that found a live entry.
    hits: u64,

    /// Lookups for an absent key.
    misses: u64,

    /// New entries inserted.
    inserts: u64,

    /// In-place value replacements on an existing key.
    updates: u64,

    /// Entries evicted by the capacity bound.
    evictions: u64,

    /// Entries removed because they aged out.
    expirations: u64,

    /// Entries removed by a caller-supplied predicate.
    custom_removals: u64,
}

impl CacheStats {
    /// Create a new stats instance with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record_hit(&mut self) {
        self.hits += 1;
    }

    pub(crate) fn record_miss(&mut self) {
        self.misses += 1;
    }

    pub(crate) fn record_insert(&mut self) {
        self.inserts += 1;
    }

    pub(crate) fn record_update(&mut self) {
        self.updates += 1;
    }

    pub(crate) fn record_eviction(&mut self) {
        self.evictions += 1;
    }

    pub(crate) fn record_expiration(&mut self) {
        self.expirations += 1;
    }

    pub(crate) fn record_custom_removal(&mut self) {
        self.custom_removals += 1;
    }

    /// Number of lookups that found a live entry.
    pub fn hits(&self) -> u64 {
        self.hits
    }

    /// Number of lookups for an absent key.
    pub fn misses(&self) -> u64 {
        self.misses
    }

    /// Number of new entries inserted.
    pub fn inserts(&self) -> u64 {
        self.inserts
    }

    /// Number of in-place value replacements.
    pub fn updates(&self) -> u64 {
        self.updates
    }

    /// Number of entries evicted by the capacity bound.
    pub fn evictions(&self) -> u64 {
        self.evictions
    }

    /// Number of entries removed because they aged out.
    pub fn expirations(&self) -> u64 {
        self.expirations
    }

    /// Number of entries removed by caller-supplied predicates.
    pub fn custom_removals(&self) -> u64 {
        self.custom_removals
    }

    /// Total number of lookups (hits + misses).
    pub fn lookups(&self) -> u64 {
        self.hits + self.misses
    }

    /// Hit rate as a fraction in `[0.0, 1.0]`. Returns 0.0 if no lookups.
    pub fn hit_rate(&self) -> f64 {
        let total = self.lookups();
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}
