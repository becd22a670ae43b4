//! Cache entry with metadata for age tracking.

/// Metadata recorded for every cache entry.
///
/// The only field is the creation timestamp: an entry's age is the one
/// input the built-in pruning policies need. `created_at` is stamped exactly
/// once, when the entry is inserted into the sequence. An in-place value
/// update does not reset it; only a full remove-and-reinsert (`touch`) does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Metadata {
    /// When this entry was inserted, in milliseconds since the Unix epoch.
    pub(crate) created_at: u64,
}

impl Metadata {
    /// Get the insertion timestamp in milliseconds since the Unix epoch.
    pub fn created_at(&self) -> u64 {
        self.created_at
    }

    /// Age of the entry at a given clock reading, in milliseconds.
    ///
    /// Saturates to zero if `now_ms` is earlier than the creation time
    /// (the wall clock moved backwards).
    pub fn age_at(&self, now_ms: u64) -> u64 {
        now_ms.saturating_sub(self.created_at)
    }
}

/// A single cache entry: the caller's value plus the bookkeeping the cache
/// keeps about it.
///
/// Entries are owned by the cache while live. Removal operations (`expire`
/// and the prune family) hand the entry back by value so the caller can
/// inspect what was evicted.
#[derive(Debug, Clone, PartialEq)]
pub struct Entry<V> {
    /// The key this entry is registered under.
    pub(crate) key: String,

    /// The stored value.
    pub(crate) value: V,

    /// Insertion metadata.
    pub(crate) meta: Metadata,
}

impl<V> Entry<V> {
    /// Create a new entry stamped at the given clock reading.
    pub(crate) fn new(key: String, value: V, now_ms: u64) -> Self {
        Self {
            key,
            value,
            meta: Metadata { created_at: now_ms },
        }
    }

    /// The key this entry is stored under.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Borrow the stored value.
    pub fn value(&self) -> &V {
        &self.value
    }

    /// The entry's metadata.
    pub fn metadata(&self) -> &Metadata {
        &self.meta
    }

    /// Consume the entry and return the stored value.
    pub fn into_value(self) -> V {
        self.value
    }

    /// Consume the entry and return `(key, value)`.
    pub fn into_parts(self) -> (String, V) {
        (self.key, self.value)
    }

    /// Check whether this entry has reached `max_age_ms` at a given clock
    /// reading. An age exactly equal to the limit counts as expired.
    /// This is useful for testing with a controlled clock.
    pub fn is_expired_at(&self, max_age_ms: u64, now_ms: u64) -> bool {
        self.meta.age_at(now_ms) >= max_age_ms
    }
}
