//! # cachetrax
//!
//! An in-memory, key-addressed cache that tracks insertion/recency order
//! and supports three independent eviction strategies: a capacity bound, an
//! age bound, and caller-supplied predicates.
//!
//! ## Features
//!
//! - **Insertion-ordered**: entries live in an arena-backed doubly-linked
//!   sequence, oldest first; put, read, touch, and expire are O(1)
//! - **Capacity eviction**: inserting past `max_length` drops the oldest
//!   entry
//! - **Age pruning**: `prune_expired` drops entries older than `max_age_ms`
//! - **Custom pruning**: `prune_custom` drops entries a predicate selects
//! - **Statistics**: hits, misses, and per-policy removal counts
//! - **Zero unsafe code**: links are arena indices, not raw pointers
//!
//! ## Quick Start
//!
//! ```rust
//! use cachetrax::{Cache, CacheConfig};
//!
//! // Bound the cache to 10k entries, each living at most five minutes.
//! let config = CacheConfig::new()
//!     .max_length(10_000)
//!     .max_age_ms(300_000)
//!     .build();
//!
//! let mut cache = Cache::new(config);
//!
//! // Store and retrieve values.
//! cache.put("user:123", "Alice");
//! assert_eq!(cache.read("user:123"), Some(&"Alice"));
//!
//! // Refresh an entry: fresh age, most-recent position.
//! let _ = cache.touch("user:123");
//!
//! // Enforce both bounds in one pass (call this from a periodic job).
//! let removed = cache.prune();
//! println!("pruned {} entries", removed.len());
//!
//! // Check statistics.
//! let stats = cache.stats();
//! println!("hit rate: {:.1}%", stats.hit_rate() * 100.0);
//! ```
//!
//! ## Absent keys are not errors
//!
//! Every lookup-style operation (`read`, `touch`, `expire`, `get_node`)
//! reports an absent key as `None`. A cache miss is a normal outcome, and
//! `None` is distinguishable from any stored value — including falsy ones.
//!
//! ## Threading
//!
//! The engine is deliberately single-threaded: operations take `&mut self`
//! and complete synchronously. To share it, wrap the whole `Cache` in one
//! lock — every mutating operation updates the key index and the entry
//! sequence together, so they must be observed as a unit.

pub mod cache;
pub mod config;
pub mod entry;
pub mod stats;

pub use cache::Cache;
pub use config::CacheConfig;
pub use entry::{Entry, Metadata};
pub use stats::CacheStats;

// Internal module - the ordered sequence is an implementation detail.
pub(crate) mod list;
