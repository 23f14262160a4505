//! Value bundles
//!
//! A [`Manipulator`] is a named group of related facet values that are read
//! from or offered to a host together, e.g. a banner's base color and its
//! pattern list. It holds at most one value per key, ordered by key id.

use crate::key::KeyId;
use crate::types::{DataType, Key};
use crate::value::{AnyValue, ImmutableValue};
use std::collections::BTreeMap;

/// Bundle of immutable values, one per key
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Manipulator {
    values: BTreeMap<KeyId, AnyValue>,
}

impl Manipulator {
    /// Empty bundle
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `value` under `key`, replacing any previous value
    pub fn set<T: DataType>(&mut self, key: &Key<T>, value: T) -> &mut Self {
        self.set_value(ImmutableValue::of(key.clone(), value))
    }

    /// Builder form of [`Manipulator::set`]
    pub fn with<T: DataType>(mut self, key: &Key<T>, value: T) -> Self {
        self.set(key, value);
        self
    }

    /// Store a prepared value, replacing any previous value for its key
    pub fn set_value(&mut self, value: impl Into<AnyValue>) -> &mut Self {
        let value = value.into();
        self.values.insert(value.key_id().clone(), value);
        self
    }

    /// Builder form of [`Manipulator::set_value`]
    pub fn with_value(mut self, value: impl Into<AnyValue>) -> Self {
        self.set_value(value);
        self
    }

    /// Current datum for `key`
    pub fn get<T: DataType>(&self, key: &Key<T>) -> Option<&T> {
        self.values.get(key.id()).and_then(AnyValue::get::<T>)
    }

    /// Typed value for `key`
    pub fn get_value<T: DataType>(&self, key: &Key<T>) -> Option<ImmutableValue<T>> {
        self.values.get(key.id()).and_then(AnyValue::downcast::<T>)
    }

    /// Erased value for a key id
    pub fn get_any(&self, id: &KeyId) -> Option<&AnyValue> {
        self.values.get(id)
    }

    /// Whether a value is present for `id`
    pub fn contains(&self, id: &KeyId) -> bool {
        self.values.contains_key(id)
    }

    /// Remove and return the value for `id`
    pub fn remove(&mut self, id: &KeyId) -> Option<AnyValue> {
        self.values.remove(id)
    }

    /// Number of values
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the bundle is empty
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Key ids in order
    pub fn keys(&self) -> impl Iterator<Item = &KeyId> {
        self.values.keys()
    }

    /// Values in key order
    pub fn values(&self) -> impl Iterator<Item = &AnyValue> {
        self.values.values()
    }

    /// Keep only values whose key ids satisfy `f`
    pub fn retain<F>(&mut self, mut f: F)
    where
        F: FnMut(&KeyId) -> bool,
    {
        self.values.retain(|id, _| f(id));
    }
}

impl FromIterator<AnyValue> for Manipulator {
    fn from_iter<I: IntoIterator<Item = AnyValue>>(iter: I) -> Self {
        let mut manipulator = Manipulator::new();
        manipulator.extend(iter);
        manipulator
    }
}

impl Extend<AnyValue> for Manipulator {
    fn extend<I: IntoIterator<Item = AnyValue>>(&mut self, iter: I) {
        for value in iter {
            self.set_value(value);
        }
    }
}

impl IntoIterator for Manipulator {
    type Item = AnyValue;
    type IntoIter = std::collections::btree_map::IntoValues<KeyId, AnyValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.into_values()
    }
}
