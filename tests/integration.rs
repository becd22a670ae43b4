//! Integration tests for the cache library.

use cachetrax::{Cache, CacheConfig};
use proptest::prelude::*;
use std::collections::HashMap;
use std::thread;
use std::time::Duration;

#[test]
fn test_basic_workflow() {
    // Unbounded cache: both policies disabled.
    let mut cache = Cache::new(CacheConfig::new().max_length(0).max_age_ms(0).build());

    assert!(cache.is_empty());
    assert_eq!(cache.len(), 0);

    assert_eq!(cache.put("a", 1), &1);
    assert_eq!(cache.len(), 1);

    // Same key again: in-place update, no growth.
    assert_eq!(cache.put("a", 2), &2);
    assert_eq!(cache.len(), 1);

    assert_eq!(cache.read("a"), Some(&2));

    let removed = cache.expire("a").expect("entry should exist");
    assert_eq!(removed.key(), "a");
    assert_eq!(removed.into_value(), 2);

    assert_eq!(cache.read("a"), None);
    assert!(cache.is_empty());
}

#[test]
fn test_capacity_boundary() {
    let mut cache = Cache::new(CacheConfig::new().max_length(2).build());

    cache.put("first", 1);
    cache.put("second", 2);
    cache.put("third", 3);

    // Only the two most recent keys survive.
    assert_eq!(cache.len(), 2);
    assert_eq!(cache.read("first"), None);
    assert_eq!(cache.read("second"), Some(&2));
    assert_eq!(cache.read("third"), Some(&3));
}

#[test]
fn test_age_boundary_with_controlled_clock() {
    let mut cache = Cache::new(CacheConfig::new().max_age_ms(1000).build());

    cache.put_at("exact", 1, 0);
    cache.put_at("younger", 2, 1);

    // Age exactly max_age is pruned; one millisecond younger is kept.
    let removed = cache.prune_expired_at(1000);
    assert_eq!(removed.len(), 1);
    assert_eq!(removed[0].key(), "exact");
    assert!(cache.contains("younger"));
}

#[test]
fn test_age_pruning_with_wall_clock() {
    let mut cache = Cache::new(CacheConfig::new().max_age_ms(50).build());

    cache.put("expiring", "value");
    assert!(cache.prune_expired().is_empty());

    thread::sleep(Duration::from_millis(100));

    let removed = cache.prune_expired();
    assert_eq!(removed.len(), 1);
    assert_eq!(cache.read("expiring"), None);
}

#[test]
fn test_touch_protects_from_eviction() {
    let mut cache = Cache::new(CacheConfig::new().max_length(3).build());

    cache.put("a", 1);
    cache.put("b", 2);
    cache.put("c", 3);

    // Refresh "a": it becomes the newest entry.
    let _ = cache.touch("a");

    // "b" is now the oldest and is evicted first.
    cache.put("d", 4);
    assert!(cache.contains("a"));
    assert!(!cache.contains("b"));
    assert!(cache.contains("c"));
    assert!(cache.contains("d"));

    let order: Vec<_> = cache.iter().map(|(k, _)| k.to_string()).collect();
    assert_eq!(order, vec!["c", "a", "d"]);
}

#[test]
fn test_custom_prune_scenario() {
    let mut cache = Cache::default();
    cache.put("x", 1);
    cache.put("y", 2);
    cache.put("z", 3);

    let removed = cache.prune_custom(|entry| entry.value() % 2 == 1);

    let mut removed_keys: Vec<_> = removed.iter().map(|e| e.key().to_string()).collect();
    removed_keys.sort();
    assert_eq!(removed_keys, vec!["x", "z"]);

    assert_eq!(cache.len(), 1);
    assert_eq!(cache.read("y"), Some(&2));
    assert_eq!(cache.read("x"), None);
    assert_eq!(cache.read("z"), None);
}

#[test]
fn test_combined_prune_order() {
    let mut cache = Cache::new(CacheConfig::new().max_age_ms(1000).build());

    cache.put_at("stale", 1, 0);
    cache.put_at("a", 2, 5000);
    cache.put_at("b", 3, 5000);
    cache.put_at("c", 4, 5000);
    cache.set_max_length(2);

    let removed = cache.prune_at(5100);

    // Age pass first ("stale"), then length pass pops the oldest survivor.
    let keys: Vec<_> = removed.iter().map(|e| e.key().to_string()).collect();
    assert_eq!(keys, vec!["stale", "a"]);
    assert_eq!(cache.len(), 2);
}

#[test]
fn test_generated_and_explicit_keys_coexist() {
    let mut cache = Cache::default();

    cache.put("explicit", 0);
    let (k1, _) = cache.put_anon(1);
    let (k2, _) = cache.put_anon(2);

    assert_ne!(k1, k2);
    assert_eq!(cache.len(), 3);
    assert_eq!(cache.read(&k1), Some(&1));
    assert_eq!(cache.read(&k2), Some(&2));
}

#[test]
fn test_stats_over_a_session() {
    let mut cache = Cache::new(CacheConfig::new().max_length(2).build());

    cache.put("a", 1);
    cache.put("b", 2);
    cache.put("c", 3); // evicts "a"
    let _ = cache.read("b"); // hit
    let _ = cache.read("a"); // miss
    cache.prune_custom(|entry| *entry.value() == 3);

    let stats = cache.stats();
    assert_eq!(stats.inserts(), 3);
    assert_eq!(stats.evictions(), 1);
    assert_eq!(stats.hits(), 1);
    assert_eq!(stats.misses(), 1);
    assert_eq!(stats.custom_removals(), 1);
}

/// Keys in the index must be exactly the keys reachable by walking the
/// sequence, with `len` matching the walk.
fn assert_consistent(cache: &Cache<u32>) {
    let walked: Vec<String> = cache.iter().map(|(k, _)| k.to_string()).collect();
    assert_eq!(walked.len(), cache.len());

    let mut indexed: Vec<String> = cache.keys().map(|k| k.to_string()).collect();
    let mut sequenced = walked.clone();
    indexed.sort();
    sequenced.sort();
    assert_eq!(indexed, sequenced);
}

#[derive(Debug, Clone)]
enum Op {
    Put(u8, u32),
    Read(u8),
    Touch(u8),
    Expire(u8),
    PruneToLength,
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        (any::<u8>(), any::<u32>()).prop_map(|(k, v)| Op::Put(k % 16, v)),
        any::<u8>().prop_map(|k| Op::Read(k % 16)),
        any::<u8>().prop_map(|k| Op::Touch(k % 16)),
        any::<u8>().prop_map(|k| Op::Expire(k % 16)),
        Just(Op::PruneToLength),
    ]
}

proptest! {
    /// Random operation sequences keep the index and sequence consistent
    /// and agree with a plain map model on membership and values.
    #[test]
    fn prop_cache_matches_model(ops in proptest::collection::vec(op_strategy(), 1..200)) {
        let mut cache: Cache<u32> = Cache::new(CacheConfig::new().max_length(8).build());
        let mut model: HashMap<String, u32> = HashMap::new();

        for op in ops {
            match op {
                Op::Put(k, v) => {
                    let key = format!("k{k}");
                    cache.put(key.clone(), v);
                    model.insert(key, v);
                    // Mirror capacity eviction: the cache may have dropped
                    // its oldest entry, so forget keys the cache no longer has.
                    model.retain(|key, _| cache.contains(key));
                }
                Op::Read(k) => {
                    let key = format!("k{k}");
                    prop_assert_eq!(cache.read(&key), model.get(&key));
                }
                Op::Touch(k) => {
                    let key = format!("k{k}");
                    prop_assert_eq!(cache.touch(&key).is_some(), model.contains_key(&key));
                }
                Op::Expire(k) => {
                    let key = format!("k{k}");
                    let removed = cache.expire(&key);
                    prop_assert_eq!(removed.map(|e| e.into_value()), model.remove(&key));
                }
                Op::PruneToLength => {
                    for entry in cache.prune_to_length() {
                        model.remove(entry.key());
                    }
                }
            }

            prop_assert_eq!(cache.len(), model.len());
            assert_consistent(&cache);
        }

        // Every surviving model key is readable with the model's value.
        for (key, value) in &model {
            prop_assert_eq!(cache.read(key), Some(value));
        }
    }

    /// A second put under the same key never grows the cache.
    #[test]
    fn prop_keys_stay_unique(key in "[a-c]{1}", values in proptest::collection::vec(any::<u32>(), 1..20)) {
        let mut cache = Cache::default();
        for v in values {
            cache.put(key.clone(), v);
        }
        prop_assert_eq!(cache.len(), 1);
    }
}
