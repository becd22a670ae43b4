//! The cache engine.
//!
//! This module provides the primary `Cache` type: a unique-key index layered
//! over the ordered entry sequence, plus the capacity, age, and
//! custom-predicate pruning policies that operate over both.

use indexmap::IndexMap;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{debug, info, trace};

use crate::config::CacheConfig;
use crate::entry::Entry;
use crate::list::EntryList;
use crate::stats::CacheStats;

/// Current wall-clock time in milliseconds since the Unix epoch.
fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

/// An insertion-ordered, key-addressed in-memory cache.
///
/// # Features
/// - **Unique keys**: at most one live entry per key; callers may supply
///   keys or let the cache generate them.
/// - **Capacity eviction**: inserting past `max_length` evicts the oldest
///   entry.
/// - **Age pruning**: `prune_expired` removes entries older than
///   `max_age_ms`.
/// - **Custom pruning**: `prune_custom` removes entries selected by a
///   caller-supplied predicate.
/// - **Statistics**: hits, misses, and per-policy removal counts.
///
/// Lookups for an absent key report it through `None`; a missing key is a
/// normal outcome, never an error.
///
/// The engine is single-threaded: every operation takes `&self` or
/// `&mut self` and completes before the next begins. To share it across
/// threads, put the whole cache behind one lock — every mutating operation
/// touches both the key index and the entry sequence and must observe them
/// together.
///
/// # Example
/// ```
/// use cachetrax::{Cache, CacheConfig};
///
/// let config = CacheConfig::new()
///     .max_length(1000)
///     .max_age_ms(300_000)
///     .build();
///
/// let mut cache = Cache::new(config);
///
/// cache.put("user:123", "Alice");
/// assert_eq!(cache.read("user:123"), Some(&"Alice"));
///
/// // Periodically enforce both policies.
/// let removed = cache.prune();
/// println!("pruned {} entries", removed.len());
/// ```
#[derive(Debug)]
pub struct Cache<V> {
    /// Ordered entry sequence, oldest at the head.
    list: EntryList<V>,

    /// Key to slot-handle index. Its iteration order is not meaningful;
    /// entry order lives in the list.
    index: IndexMap<String, usize>,

    config: CacheConfig,
    stats: CacheStats,

    /// Counter for generated keys.
    next_key: u64,
}

impl<V> Cache<V> {
    /// Create a new cache with the given configuration.
    ///
    /// # Example
    /// ```
    /// use cachetrax::{Cache, CacheConfig};
    ///
    /// let cache: Cache<String> = Cache::new(CacheConfig::default());
    /// assert!(cache.is_empty());
    /// ```
    pub fn new(config: CacheConfig) -> Self {
        Self {
            list: EntryList::new(),
            index: IndexMap::new(),
            config,
            stats: CacheStats::new(),
            next_key: 0,
        }
    }

    /// Add or update a value under `key`, returning a reference to the
    /// stored value.
    ///
    /// If the key already holds an entry, the value is replaced in place:
    /// the entry keeps its position in the sequence and its original
    /// creation timestamp. Otherwise a new entry is appended at the
    /// most-recent end, and if that pushes the cache past `max_length`, the
    /// oldest entry is evicted — at most one eviction per call. Use
    /// [`touch`](Cache::touch) to refresh an existing entry instead.
    ///
    /// # Example
    /// ```
    /// use cachetrax::Cache;
    ///
    /// let mut cache = Cache::default();
    /// assert_eq!(cache.put("a", 1), &1);
    /// assert_eq!(cache.put("a", 2), &2); // replaced in place
    /// assert_eq!(cache.len(), 1);
    /// ```
    pub fn put(&mut self, key: impl Into<String>, value: V) -> &V {
        self.put_at(key, value, now_ms())
    }

    /// Like [`put`](Cache::put), with an explicit clock reading for the
    /// creation timestamp. This is useful for testing with a controlled
    /// clock.
    pub fn put_at(&mut self, key: impl Into<String>, value: V, now_ms: u64) -> &V {
        let key = key.into();
        match self.index.get(&key).copied() {
            Some(slot) => {
                trace!(key = %key, "put: replacing value in place");
                self.stats.record_update();
                let entry = &mut self.list[slot];
                entry.value = value;
                &entry.value
            }
            None => {
                trace!(key = %key, "put: appending new entry");
                self.stats.record_insert();
                let slot = self.list.push_tail(Entry::new(key.clone(), value, now_ms));
                self.index.insert(key, slot);

                // Capacity eviction removes at most one entry per insertion;
                // prune_to_length is the catch-up path after a runtime
                // max_length reduction.
                if let Some(max_length) = self.config.max_length {
                    if self.list.len() > max_length {
                        if let Some(evicted) = self.list.pop_head() {
                            self.index.swap_remove(evicted.key());
                            self.stats.record_eviction();
                            debug!(key = %evicted.key(), "capacity eviction");
                        }
                    }
                }

                &self.list[slot].value
            }
        }
    }

    /// Add a value under a generated key, returning the key and a reference
    /// to the stored value.
    ///
    /// Generated keys are unique among currently-live keys for the lifetime
    /// of this cache.
    ///
    /// # Example
    /// ```
    /// use cachetrax::Cache;
    ///
    /// let mut cache = Cache::default();
    /// let (key, _) = cache.put_anon("payload");
    /// assert_eq!(cache.read(&key), Some(&"payload"));
    /// ```
    pub fn put_anon(&mut self, value: V) -> (String, &V) {
        let key = self.generate_key();
        let value = self.put(key.clone(), value);
        (key, value)
    }

    /// Read a value by key.
    ///
    /// Returns `None` if the key is absent. Reading never changes entry
    /// order or timestamps; only the hit/miss counters move.
    ///
    /// # Example
    /// ```
    /// use cachetrax::Cache;
    ///
    /// let mut cache = Cache::default();
    /// cache.put("key", 7);
    /// assert_eq!(cache.read("key"), Some(&7));
    /// assert_eq!(cache.read("missing"), None);
    /// ```
    pub fn read(&mut self, key: &str) -> Option<&V> {
        match self.index.get(key).copied() {
            Some(slot) => {
                self.stats.record_hit();
                Some(&self.list[slot].value)
            }
            None => {
                self.stats.record_miss();
                None
            }
        }
    }

    /// Refresh an entry: move it to the most-recent position and restart
    /// its age.
    ///
    /// Implemented as a full remove-and-reinsert of the value under the
    /// same key, so the entry gets a fresh creation timestamp and any other
    /// metadata is discarded. Returns the value, or `None` if the key is
    /// absent.
    ///
    /// # Example
    /// ```
    /// use cachetrax::Cache;
    ///
    /// let mut cache = Cache::default();
    /// cache.put("a", 1);
    /// cache.put("b", 2);
    /// let _ = cache.touch("a"); // "a" is now the most recent entry
    ///
    /// let order: Vec<_> = cache.iter().map(|(k, _)| k.to_string()).collect();
    /// assert_eq!(order, vec!["b", "a"]);
    /// ```
    pub fn touch(&mut self, key: &str) -> Option<&V> {
        self.touch_at(key, now_ms())
    }

    /// Like [`touch`](Cache::touch), with an explicit clock reading.
    /// This is useful for testing with a controlled clock.
    pub fn touch_at(&mut self, key: &str, now_ms: u64) -> Option<&V> {
        let entry = self.remove_by_key(key)?;
        let (key, value) = entry.into_parts();
        trace!(key = %key, "touch: reinserting at tail");
        Some(self.put_at(key, value, now_ms))
    }

    /// Remove one entry by key, returning it with its metadata so the
    /// caller can inspect what was evicted. Returns `None` if the key is
    /// absent.
    ///
    /// # Example
    /// ```
    /// use cachetrax::Cache;
    ///
    /// let mut cache = Cache::default();
    /// cache.put("a", 1);
    /// let entry = cache.expire("a").unwrap();
    /// assert_eq!(entry.into_value(), 1);
    /// assert_eq!(cache.read("a"), None);
    /// ```
    pub fn expire(&mut self, key: &str) -> Option<Entry<V>> {
        let entry = self.remove_by_key(key)?;
        debug!(key = %entry.key(), "entry expired");
        Some(entry)
    }

    /// Remove every entry whose age has reached `max_age_ms`, returning the
    /// removed entries. No-op when no age limit is configured.
    ///
    /// The scan visits a snapshot of the keys that were live when it
    /// started; entries inserted mid-scan are not considered. An age exactly
    /// equal to the limit counts as expired.
    pub fn prune_expired(&mut self) -> Vec<Entry<V>> {
        self.prune_expired_at(now_ms())
    }

    /// Like [`prune_expired`](Cache::prune_expired), with an explicit clock
    /// reading. This is useful for testing with a controlled clock.
    pub fn prune_expired_at(&mut self, now_ms: u64) -> Vec<Entry<V>> {
        let Some(max_age) = self.config.max_age_ms else {
            return Vec::new();
        };

        let keys: Vec<String> = self.index.keys().cloned().collect();
        let mut removed = Vec::new();
        for key in keys {
            let expired = match self.index.get(&key) {
                Some(&slot) => self.list[slot].is_expired_at(max_age, now_ms),
                None => false,
            };
            if expired {
                if let Some(entry) = self.remove_by_key(&key) {
                    self.stats.record_expiration();
                    removed.push(entry);
                }
            }
        }

        if !removed.is_empty() {
            info!(
                removed = removed.len(),
                max_age_ms = max_age,
                "age prune pass"
            );
        }
        removed
    }

    /// Pop oldest entries until the cache is within `max_length`, returning
    /// the removed entries. No-op when no length limit is configured.
    ///
    /// Unlike the single eviction in [`put`](Cache::put), this evicts until
    /// the bound holds, so it also catches up after
    /// [`set_max_length`](Cache::set_max_length) shrinks the limit below the
    /// current length.
    pub fn prune_to_length(&mut self) -> Vec<Entry<V>> {
        let Some(max_length) = self.config.max_length else {
            return Vec::new();
        };

        let mut removed = Vec::new();
        while self.list.len() > max_length {
            let Some(entry) = self.list.pop_head() else {
                break;
            };
            self.index.swap_remove(entry.key());
            self.stats.record_eviction();
            removed.push(entry);
        }

        if !removed.is_empty() {
            info!(
                removed = removed.len(),
                max_length = max_length,
                "length prune pass"
            );
        }
        removed
    }

    /// Remove every entry the predicate selects, returning the removed
    /// entries.
    ///
    /// The predicate sees each live entry (key, value, and metadata) once,
    /// against a snapshot of the keys live at scan start. It must not
    /// mutate the cache; it is borrowed only for the duration of this call.
    ///
    /// # Example
    /// ```
    /// use cachetrax::Cache;
    ///
    /// let mut cache = Cache::default();
    /// cache.put("x", 1);
    /// cache.put("y", 2);
    /// cache.put("z", 3);
    ///
    /// let removed = cache.prune_custom(|entry| entry.value() % 2 == 1);
    /// assert_eq!(removed.len(), 2);
    /// assert_eq!(cache.read("y"), Some(&2));
    /// ```
    pub fn prune_custom<F>(&mut self, mut predicate: F) -> Vec<Entry<V>>
    where
        F: FnMut(&Entry<V>) -> bool,
    {
        let result: Result<_, std::convert::Infallible> =
            self.try_prune_custom(|entry| Ok(predicate(entry)));
        match result {
            Ok(removed) => removed,
            Err(never) => match never {},
        }
    }

    /// Fallible form of [`prune_custom`](Cache::prune_custom).
    ///
    /// A predicate error aborts the pass and propagates to the caller:
    /// entries already removed stay removed, entries not yet visited are
    /// untouched.
    ///
    /// # Example
    /// ```
    /// use cachetrax::Cache;
    ///
    /// let mut cache = Cache::default();
    /// cache.put("a", "12");
    /// cache.put("b", "oops");
    ///
    /// // Remove entries whose value parses to an even number; a parse
    /// // failure aborts the pass.
    /// let result = cache.try_prune_custom(|entry| {
    ///     entry.value().parse::<i64>().map(|n| n % 2 == 0)
    /// });
    /// assert!(result.is_err());
    /// ```
    pub fn try_prune_custom<F, E>(&mut self, mut predicate: F) -> Result<Vec<Entry<V>>, E>
    where
        F: FnMut(&Entry<V>) -> Result<bool, E>,
    {
        let keys: Vec<String> = self.index.keys().cloned().collect();
        let mut removed = Vec::new();
        for key in keys {
            let matched = match self.index.get(&key) {
                Some(&slot) => predicate(&self.list[slot])?,
                None => false,
            };
            if matched {
                if let Some(entry) = self.remove_by_key(&key) {
                    self.stats.record_custom_removal();
                    removed.push(entry);
                }
            }
        }
        Ok(removed)
    }

    /// Enforce both built-in policies: age pruning first, then length
    /// pruning, returning all removed entries in removal order.
    ///
    /// Age runs first so stale entries never survive on capacity grounds;
    /// the length bound then only removes what age pruning left behind.
    /// Returns immediately if the cache is empty.
    ///
    /// Pruning is O(n); call it from a periodic scheduler rather than on
    /// every mutation.
    pub fn prune(&mut self) -> Vec<Entry<V>> {
        self.prune_at(now_ms())
    }

    /// Like [`prune`](Cache::prune), with an explicit clock reading.
    /// This is useful for testing with a controlled clock.
    pub fn prune_at(&mut self, now_ms: u64) -> Vec<Entry<V>> {
        if self.list.is_empty() {
            return Vec::new();
        }
        let mut removed = self.prune_expired_at(now_ms);
        removed.extend(self.prune_to_length());
        removed
    }

    /// Get the full entry for a key — value plus metadata — without
    /// mutating anything. Returns `None` if the key is absent.
    ///
    /// # Example
    /// ```
    /// use cachetrax::Cache;
    ///
    /// let mut cache = Cache::default();
    /// cache.put("a", 1);
    /// let node = cache.get_node("a").unwrap();
    /// assert!(node.metadata().created_at() > 0);
    /// ```
    pub fn get_node(&self, key: &str) -> Option<&Entry<V>> {
        let &slot = self.index.get(key)?;
        Some(&self.list[slot])
    }

    /// Check if a key holds a live entry. Does not touch the hit/miss
    /// counters.
    pub fn contains(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    /// Number of live entries.
    pub fn len(&self) -> usize {
        self.list.len()
    }

    /// Check if the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    /// Remove all entries.
    pub fn clear(&mut self) {
        debug!(len = self.list.len(), "cache cleared");
        self.list.clear();
        self.index.clear();
    }

    /// Iterate over `(key, value)` pairs from oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.list.iter().map(|entry| (entry.key(), entry.value()))
    }

    /// Iterate over live keys, in no particular order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.index.keys().map(String::as_str)
    }

    /// The active configuration.
    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// Replace the length bound at runtime. `0` disables it.
    ///
    /// Shrinking the bound does not evict immediately; the next
    /// [`prune_to_length`](Cache::prune_to_length) or [`prune`](Cache::prune)
    /// brings the cache back within it.
    pub fn set_max_length(&mut self, length: usize) {
        self.config.max_length = if length == 0 { None } else { Some(length) };
    }

    /// Replace the age bound (milliseconds) at runtime. `0` disables it.
    pub fn set_max_age_ms(&mut self, age_ms: u64) {
        self.config.max_age_ms = if age_ms == 0 { None } else { Some(age_ms) };
    }

    /// A copy of the current statistics counters.
    pub fn stats(&self) -> CacheStats {
        self.stats
    }

    /// Remove one entry from both the index and the sequence.
    fn remove_by_key(&mut self, key: &str) -> Option<Entry<V>> {
        let slot = self.index.swap_remove(key)?;
        self.list.remove(slot)
    }

    /// Next generated key, skipping candidates that collide with live keys.
    fn generate_key(&mut self) -> String {
        loop {
            let candidate = format!("key-{}", self.next_key);
            self.next_key += 1;
            if !self.index.contains_key(&candidate) {
                return candidate;
            }
        }
    }
}

impl<V> Default for Cache<V> {
    fn default() -> Self {
        Self::new(CacheConfig::default())
    }
}
