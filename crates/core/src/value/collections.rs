//! List, set and map helpers
//!
//! Mutable helpers edit in place; immutable helpers return a new value and
//! leave the receiver untouched.

use super::{ImmutableValue, Value};
use crate::error::ValueError;
use crate::types::DataType;
use std::collections::{BTreeMap, BTreeSet};

/// Collections that accept single-element inserts and removals
///
/// Implemented for `Vec<E>` (append / remove first occurrence) and
/// `BTreeSet<E>`. Used by element-wise offers on a host.
pub trait ElementCollection: DataType {
    /// Element type
    type Element: DataType;

    /// Insert `element`, returning whether the collection changed
    fn insert_element(&mut self, element: Self::Element) -> bool;

    /// Remove `element`, returning whether the collection changed
    fn remove_element(&mut self, element: &Self::Element) -> bool;

    /// Whether `element` is present
    fn contains_element(&self, element: &Self::Element) -> bool;
}

impl<E: DataType> ElementCollection for Vec<E> {
    type Element = E;

    fn insert_element(&mut self, element: E) -> bool {
        self.push(element);
        true
    }

    fn remove_element(&mut self, element: &E) -> bool {
        match self.iter().position(|e| e == element) {
            Some(index) => {
                self.remove(index);
                true
            }
            None => false,
        }
    }

    fn contains_element(&self, element: &E) -> bool {
        self.contains(element)
    }
}

impl<E: DataType + Ord> ElementCollection for BTreeSet<E> {
    type Element = E;

    fn insert_element(&mut self, element: E) -> bool {
        self.insert(element)
    }

    fn remove_element(&mut self, element: &E) -> bool {
        self.remove(element)
    }

    fn contains_element(&self, element: &E) -> bool {
        self.contains(element)
    }
}

// ============================================================================
// Lists
// ============================================================================

impl<E: DataType> Value<Vec<E>> {
    /// Number of elements
    pub fn len(&self) -> usize {
        self.get().len()
    }

    /// Whether the list is empty
    pub fn is_empty(&self) -> bool {
        self.get().is_empty()
    }

    /// Element at `index`
    pub fn get_index(&self, index: usize) -> Option<&E> {
        self.get().get(index)
    }

    /// Append an element
    pub fn push(&mut self, element: E) -> Result<(), ValueError> {
        self.modify(|list| list.push(element))
    }

    /// Remove and return the element at `index`
    pub fn remove_at(&mut self, index: usize) -> Result<E, ValueError> {
        let len = self.len();
        if index >= len {
            return Err(ValueError::IndexOutOfRange {
                key: self.key().id().clone(),
                index,
                len,
            });
        }
        self.modify(|list| list.remove(index))
    }
}

impl<E: DataType> ImmutableValue<Vec<E>> {
    /// Number of elements
    pub fn len(&self) -> usize {
        self.get().len()
    }

    /// Whether the list is empty
    pub fn is_empty(&self) -> bool {
        self.get().is_empty()
    }

    /// Element at `index`
    pub fn get_index(&self, index: usize) -> Option<&E> {
        self.get().get(index)
    }

    /// List with `element` appended
    pub fn with_element(&self, element: E) -> Result<Self, ValueError> {
        let mut next = self.get().clone();
        next.push(element);
        self.with(next)
    }

    /// List with the element at `index` removed
    pub fn without_index(&self, index: usize) -> Result<Self, ValueError> {
        let len = self.len();
        if index >= len {
            return Err(ValueError::IndexOutOfRange {
                key: self.key().id().clone(),
                index,
                len,
            });
        }
        let mut next = self.get().clone();
        next.remove(index);
        self.with(next)
    }
}

// ============================================================================
// Sets
// ============================================================================

impl<E: DataType + Ord> Value<BTreeSet<E>> {
    /// Number of elements
    pub fn len(&self) -> usize {
        self.get().len()
    }

    /// Whether the set is empty
    pub fn is_empty(&self) -> bool {
        self.get().is_empty()
    }

    /// Whether `element` is present
    pub fn contains(&self, element: &E) -> bool {
        self.get().contains(element)
    }

    /// Insert an element, returning whether it was new
    pub fn insert(&mut self, element: E) -> Result<bool, ValueError> {
        self.modify(|set| set.insert(element))
    }

    /// Remove an element, returning whether it was present
    pub fn remove(&mut self, element: &E) -> Result<bool, ValueError> {
        self.modify(|set| set.remove(element))
    }
}

impl<E: DataType + Ord> ImmutableValue<BTreeSet<E>> {
    /// Number of elements
    pub fn len(&self) -> usize {
        self.get().len()
    }

    /// Whether the set is empty
    pub fn is_empty(&self) -> bool {
        self.get().is_empty()
    }

    /// Whether `element` is present
    pub fn contains(&self, element: &E) -> bool {
        self.get().contains(element)
    }

    /// Set with `element` added
    pub fn with_element(&self, element: E) -> Result<Self, ValueError> {
        let mut next = self.get().clone();
        next.insert(element);
        self.with(next)
    }

    /// Set with `element` removed
    pub fn without(&self, element: &E) -> Result<Self, ValueError> {
        let mut next = self.get().clone();
        next.remove(element);
        self.with(next)
    }
}

// ============================================================================
// Maps
// ============================================================================

impl<K: DataType + Ord, V: DataType> Value<BTreeMap<K, V>> {
    /// Number of entries
    pub fn len(&self) -> usize {
        self.get().len()
    }

    /// Whether the map is empty
    pub fn is_empty(&self) -> bool {
        self.get().is_empty()
    }

    /// Value stored under `key`
    pub fn get_entry(&self, key: &K) -> Option<&V> {
        self.get().get(key)
    }

    /// Insert an entry, returning the previous value
    pub fn put(&mut self, key: K, value: V) -> Result<Option<V>, ValueError> {
        self.modify(|map| map.insert(key, value))
    }

    /// Remove an entry, returning its value
    pub fn remove_key(&mut self, key: &K) -> Result<Option<V>, ValueError> {
        self.modify(|map| map.remove(key))
    }
}

impl<K: DataType + Ord, V: DataType> ImmutableValue<BTreeMap<K, V>> {
    /// Number of entries
    pub fn len(&self) -> usize {
        self.get().len()
    }

    /// Whether the map is empty
    pub fn is_empty(&self) -> bool {
        self.get().is_empty()
    }

    /// Value stored under `key`
    pub fn get_entry(&self, key: &K) -> Option<&V> {
        self.get().get(key)
    }

    /// Map with an entry inserted or replaced
    pub fn with_entry(&self, key: K, value: V) -> Result<Self, ValueError> {
        let mut next = self.get().clone();
        next.insert(key, value);
        self.with(next)
    }

    /// Map with an entry removed
    pub fn without_key(&self, key: &K) -> Result<Self, ValueError> {
        let mut next = self.get().clone();
        next.remove(key);
        self.with(next)
    }
}
