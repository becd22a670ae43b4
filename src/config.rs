//! Configuration for the cache.
//!
//! This module provides a builder pattern for configuring the two built-in
//! eviction policies: the entry-count bound (`max_length`) and the entry-age
//! bound (`max_age_ms`).

/// Configuration for creating a new cache instance.
///
/// Use the builder pattern to construct configuration:
///
/// ```
/// use cachetrax::CacheConfig;
///
/// let config = CacheConfig::new()
///     .max_length(10_000)
///     .max_age_ms(300_000)
///     .build();
/// ```
///
/// Both limits are unsigned, so an invalid (negative) bound is
/// unrepresentable and construction never fails. Zero means "no limit" for
/// either policy, which is also the default.
#[derive(Debug, Clone, Default)]
pub struct CacheConfig {
    /// Maximum number of entries the cache may hold. When an insertion
    /// pushes the count past this limit, the oldest entry is evicted.
    /// `None` means unbounded.
    pub(crate) max_length: Option<usize>,

    /// Maximum entry age in milliseconds before an age-based prune pass
    /// removes it. `None` means entries never age out.
    pub(crate) max_age_ms: Option<u64>,
}

impl CacheConfig {
    /// Create a new configuration builder with both limits disabled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum number of entries.
    ///
    /// When an insertion pushes the cache past this bound, the oldest entry
    /// is evicted. Use `0` for unbounded.
    pub fn max_length(mut self, length: usize) -> Self {
        self.max_length = if length == 0 { None } else { Some(length) };
        self
    }

    /// Set the maximum entry age in milliseconds.
    ///
    /// Entries whose age reaches this bound are removed by the age-based
    /// prune pass. Use `0` to disable age-based pruning.
    pub fn max_age_ms(mut self, age_ms: u64) -> Self {
        self.max_age_ms = if age_ms == 0 { None } else { Some(age_ms) };
        self
    }

    /// Build the final configuration.
    pub fn build(self) -> Self {
        self
    }

    /// Get the maximum length, if bounded.
    pub fn get_max_length(&self) -> Option<usize> {
        self.max_length
    }

    /// Get the maximum age in milliseconds, if bounded.
    pub fn get_max_age_ms(&self) -> Option<u64> {
        self.max_age_ms
    }
}
