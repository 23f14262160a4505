//! Immutable value intern table
//!
//! Most hosts share a small set of immutable values (a default color, an
//! empty pattern list, a cooldown of 8). Interning hands out one shared
//! instance per distinct `(key, default, value)` triple so that bulk reads
//! do not allocate a fresh value per host.
//!
//! # Design
//!
//! - DashMap: sharded locking, safe to intern from many threads
//! - FxHasher: content fingerprint of the triple selects a slot
//! - Slots hold every value whose fingerprint collides; lookups compare
//!   content, never identity
//! - Append-only: entries are never evicted
//! - No settings in the table: each caller interns through an [`Interner`]
//!   carrying its own [`CachePolicy`]
//!
//! Interned values are referentially identical, so `ImmutableValue::ptr_eq`
//! is a valid fast path. Logical equality remains the only guarantee: when
//! interning is disabled, or for collection values that are not interned,
//! equal values are distinct allocations.

use dashmap::DashMap;
use facet_core::{AnyValue, Bounds, DataType, ImmutableValue, Key, KeyShape, ValueError};
use once_cell::sync::Lazy;
use rustc_hash::FxHasher;
use smallvec::SmallVec;
use std::hash::{BuildHasherDefault, Hash, Hasher};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::trace;

type Slot = SmallVec<[AnyValue; 1]>;

static GLOBAL_CACHE: Lazy<Arc<ValueCache>> = Lazy::new(|| Arc::new(ValueCache::new()));

/// Counters describing cache effectiveness
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CacheStats {
    /// Distinct values held
    pub entries: usize,
    /// Lookups answered from the table
    pub hits: u64,
    /// Lookups that stored a new value
    pub misses: u64,
}

/// Which values a caller wants interned
///
/// The table itself is shared; each caller applies its own policy, so one
/// caller turning interning off never changes what another caller gets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CachePolicy {
    /// Intern at all
    pub enabled: bool,
    /// Also intern list, set and map values
    pub intern_collections: bool,
}

impl CachePolicy {
    /// Never intern
    pub const DISABLED: CachePolicy = CachePolicy {
        enabled: false,
        intern_collections: false,
    };

    /// Whether values of `shape` are interned under this policy
    pub fn interns(&self, shape: KeyShape) -> bool {
        self.enabled && (!shape.is_collection() || self.intern_collections)
    }
}

impl Default for CachePolicy {
    fn default() -> Self {
        CachePolicy {
            enabled: true,
            intern_collections: false,
        }
    }
}

/// Content-addressed table of immutable values
pub struct ValueCache {
    slots: DashMap<u64, Slot, BuildHasherDefault<FxHasher>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl ValueCache {
    /// Empty table
    pub fn new() -> Self {
        ValueCache {
            slots: DashMap::with_hasher(BuildHasherDefault::default()),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// The process-wide cache
    pub fn global() -> Arc<ValueCache> {
        Arc::clone(&GLOBAL_CACHE)
    }

    /// View of the table that interns only what `policy` allows
    pub fn interner(&self, policy: CachePolicy) -> Interner<'_> {
        Interner {
            cache: self,
            policy,
        }
    }

    // ========================================================================
    // Interning
    // ========================================================================

    /// Shared immutable value for `(key, default, value)`
    pub fn intern<T: DataType>(&self, key: &Key<T>, default: T, value: T) -> ImmutableValue<T> {
        let fingerprint = fingerprint(key, &default, &value);
        let matches = |candidate: &AnyValue| same_triple(candidate, key, &default, &value, None);
        if let Some(found) = self.lookup::<T, _>(fingerprint, &matches) {
            return found;
        }

        let mut slot = self.slots.entry(fingerprint).or_default();
        // Another thread may have stored it between the lookup and the entry lock
        if let Some(found) = slot.iter().find(|c| matches(*c)).and_then(AnyValue::downcast::<T>) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            return found;
        }
        let created = ImmutableValue::new(key.clone(), default, value);
        slot.push(created.erase());
        self.misses.fetch_add(1, Ordering::Relaxed);
        trace!(key = %key.id(), "interned value");
        created
    }

    /// Shared bounded immutable value
    ///
    /// Fails like [`ImmutableValue::bounded`] when the data lie outside
    /// `bounds`.
    pub fn intern_bounded<T: DataType>(
        &self,
        key: &Key<T>,
        default: T,
        value: T,
        bounds: Bounds<T>,
    ) -> Result<ImmutableValue<T>, ValueError> {
        let fingerprint = fingerprint(key, &default, &value);
        let matches =
            |candidate: &AnyValue| same_triple(candidate, key, &default, &value, Some(&bounds));
        if let Some(found) = self.lookup::<T, _>(fingerprint, &matches) {
            return Ok(found);
        }

        let mut slot = self.slots.entry(fingerprint).or_default();
        if let Some(found) = slot.iter().find(|c| matches(*c)).and_then(AnyValue::downcast::<T>) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            return Ok(found);
        }
        let created = ImmutableValue::bounded(key.clone(), default, value, bounds)?;
        slot.push(created.erase());
        self.misses.fetch_add(1, Ordering::Relaxed);
        Ok(created)
    }

    /// Shared instance equal to `value`
    ///
    /// Stores `value` itself when no equal instance exists yet.
    pub fn intern_value<T: DataType>(&self, value: ImmutableValue<T>) -> ImmutableValue<T> {
        let erased = self.intern_any(value.erase());
        erased.downcast::<T>().unwrap_or(value)
    }

    /// Shared instance equal to an erased value
    pub fn intern_any(&self, value: AnyValue) -> AnyValue {
        let fingerprint = {
            let mut hasher = FxHasher::default();
            value.hash(&mut hasher);
            hasher.finish()
        };
        if let Some(slot) = self.slots.get(&fingerprint) {
            if let Some(found) = slot.iter().find(|c| **c == value) {
                self.hits.fetch_add(1, Ordering::Relaxed);
                return found.clone();
            }
        }

        let mut slot = self.slots.entry(fingerprint).or_default();
        if let Some(found) = slot.iter().find(|c| **c == value) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            return found.clone();
        }
        slot.push(value.clone());
        self.misses.fetch_add(1, Ordering::Relaxed);
        value
    }

    fn lookup<T, F>(&self, fingerprint: u64, matches: &F) -> Option<ImmutableValue<T>>
    where
        T: DataType,
        F: Fn(&AnyValue) -> bool,
    {
        let slot = self.slots.get(&fingerprint)?;
        let found = slot
            .iter()
            .find(|c| matches(*c))
            .and_then(AnyValue::downcast::<T>)?;
        self.hits.fetch_add(1, Ordering::Relaxed);
        Some(found)
    }

    // ========================================================================
    // Introspection
    // ========================================================================

    /// Number of distinct values held
    pub fn len(&self) -> usize {
        self.slots.iter().map(|slot| slot.len()).sum()
    }

    /// Whether the table is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Current counters
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entries: self.len(),
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }
}

impl Default for ValueCache {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ValueCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ValueCache")
            .field("stats", &self.stats())
            .finish()
    }
}

/// A [`ValueCache`] seen through a [`CachePolicy`]
///
/// Values the policy excludes are built fresh and never stored.
#[derive(Debug, Clone, Copy)]
pub struct Interner<'a> {
    cache: &'a ValueCache,
    policy: CachePolicy,
}

impl<'a> Interner<'a> {
    /// Underlying table
    pub fn cache(&self) -> &'a ValueCache {
        self.cache
    }

    /// Policy applied by this view
    pub fn policy(&self) -> CachePolicy {
        self.policy
    }

    /// Immutable value for `(key, default, value)`
    pub fn intern<T: DataType>(&self, key: &Key<T>, default: T, value: T) -> ImmutableValue<T> {
        if self.policy.interns(key.shape()) {
            self.cache.intern(key, default, value)
        } else {
            ImmutableValue::new(key.clone(), default, value)
        }
    }

    /// Bounded immutable value
    pub fn intern_bounded<T: DataType>(
        &self,
        key: &Key<T>,
        default: T,
        value: T,
        bounds: Bounds<T>,
    ) -> Result<ImmutableValue<T>, ValueError> {
        if self.policy.interns(key.shape()) {
            self.cache.intern_bounded(key, default, value, bounds)
        } else {
            ImmutableValue::bounded(key.clone(), default, value, bounds)
        }
    }

    /// Shared instance equal to `value`, if the policy allows
    pub fn intern_value<T: DataType>(&self, value: ImmutableValue<T>) -> ImmutableValue<T> {
        if self.policy.interns(value.key().shape()) {
            self.cache.intern_value(value)
        } else {
            value
        }
    }

    /// Shared instance equal to an erased value, if the policy allows
    pub fn intern_any(&self, value: AnyValue) -> AnyValue {
        if self.policy.interns(value.key().shape()) {
            self.cache.intern_any(value)
        } else {
            value
        }
    }
}

/// Fingerprint of a triple
///
/// Feeds the hasher in the same order as the value's own `Hash` impl, so a
/// value built from the triple and later passed to `intern_any` lands in the
/// same slot.
fn fingerprint<T: DataType>(key: &Key<T>, default: &T, value: &T) -> u64 {
    let mut hasher = FxHasher::default();
    key.hash(&mut hasher);
    value.hash(&mut hasher);
    default.hash(&mut hasher);
    hasher.finish()
}

fn same_triple<T: DataType>(
    candidate: &AnyValue,
    key: &Key<T>,
    default: &T,
    value: &T,
    bounds: Option<&Bounds<T>>,
) -> bool {
    candidate.key_id() == key.id()
        && candidate.get::<T>() == Some(value)
        && candidate.default_value::<T>() == Some(default)
        && candidate.bounds::<T>() == bounds
}
