//! Value Cache Tests
//!
//! Interned values compare equal; identity is a fast path only.

use crate::common::*;
use std::sync::Arc;
use std::thread;

#[test]
fn test_repeated_reads_yield_equal_values() {
    let engine = engine();
    let first = engine.get_immutable(&hopper(8), &COOLDOWN).unwrap();
    let second = engine.get_immutable(&hopper(8), &COOLDOWN).unwrap();
    assert_eq!(first, second);
    assert!(engine.cache().stats().hits >= 1);
}

#[test]
fn test_distinct_data_are_distinct_entries() {
    let engine = engine();
    let low = engine.get_immutable(&hopper(2), &COOLDOWN).unwrap();
    let high = engine.get_immutable(&hopper(3), &COOLDOWN).unwrap();
    assert_ne!(low, high);
    assert_eq!(engine.cache().len(), 2);
}

#[test]
fn test_disabled_cache_still_yields_equal_values() {
    let mut config = DataConfig::default();
    config.cache.enabled = false;
    let engine = engine_with(config);

    let first = engine.get_immutable(&hopper(8), &COOLDOWN).unwrap();
    let second = engine.get_immutable(&hopper(8), &COOLDOWN).unwrap();
    assert_eq!(first, second);
    assert!(engine.cache().is_empty());
}

#[test]
fn test_collections_are_interned_only_when_enabled() {
    let engine = engine();
    engine.get_immutable(&sign(&["a"]), &SIGN_LINES);
    assert!(engine.cache().is_empty());

    engine.update_config(|config| config.cache.intern_collections = true);
    engine.get_immutable(&sign(&["a"]), &SIGN_LINES);
    assert_eq!(engine.cache().len(), 1);
}

#[test]
fn test_concurrent_reads_converge_on_one_entry() {
    let engine = Arc::new(engine());
    let handles: Vec<_> = (0..8)
        .map(|_| {
            let engine = Arc::clone(&engine);
            thread::spawn(move || {
                (0..100)
                    .map(|_| engine.get_immutable(&hopper(42), &COOLDOWN).unwrap())
                    .collect::<Vec<_>>()
            })
        })
        .collect();

    let reference = engine.get_immutable(&hopper(42), &COOLDOWN).unwrap();
    for handle in handles {
        for value in handle.join().unwrap() {
            assert_eq!(value, reference);
        }
    }
    assert_eq!(engine.cache().len(), 1);
}

#[test]
fn test_shared_cache_between_engines() {
    let cache = Arc::new(ValueCache::new());
    let registry = Arc::new(registry());
    let a = DataEngine::with_shared(Arc::clone(&registry), Arc::clone(&cache), DataConfig::default());
    let b = DataEngine::with_shared(registry, Arc::clone(&cache), DataConfig::default());

    let from_a = a.get_immutable(&hopper(11), &COOLDOWN).unwrap();
    let from_b = b.get_immutable(&hopper(11), &COOLDOWN).unwrap();
    assert_eq!(from_a, from_b);
    assert!(ImmutableValue::ptr_eq(&from_a, &from_b));
    assert_eq!(cache.len(), 1);
}

#[test]
fn test_cache_settings_do_not_leak_between_engines() {
    // Both engines use the process-wide table
    let a = DataEngine::new(registry());
    let b = DataEngine::new(registry());
    assert!(Arc::ptr_eq(a.cache(), b.cache()));

    a.update_config(|config| config.cache.enabled = false);
    assert!(!a.interner().policy().enabled);
    assert!(b.config().cache.enabled);
    assert!(b.interner().policy().enabled);

    let first = b.get_immutable(&hopper(90_017), &COOLDOWN).unwrap();
    let second = b.get_immutable(&hopper(90_017), &COOLDOWN).unwrap();
    assert!(ImmutableValue::ptr_eq(&first, &second));

    let from_a = a.get_immutable(&hopper(90_017), &COOLDOWN).unwrap();
    assert_eq!(from_a, first);
    assert!(!ImmutableValue::ptr_eq(&from_a, &first));
}
