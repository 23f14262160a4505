//! Value model
//!
//! This module defines:
//! - Bounds: Inclusive `[min, max]` range with a comparator
//! - Value: Mutable value read from (or destined for) a host
//! - ImmutableValue: Shared, read-only snapshot of a value
//! - AnyValue: Type-erased immutable value (see [`erased`])
//!
//! ## Rules
//!
//! - A value is `{ key, default, current }`, plus bounds for bounded keys
//! - A bounded value satisfies `min <= current <= max` at all times; a write
//!   outside the range is rejected before mutation, never clamped
//! - Equality and hashing are over content: key id, default, current and
//!   bounds. Two independently built values with equal content are equal
//! - Immutable values never refer back to a host and may be shared freely

mod collections;
mod erased;

pub use collections::ElementCollection;
pub use erased::AnyValue;

use crate::error::ValueError;
use crate::types::{DataType, Key, KeyShape};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// Ordering used to check bounds
pub type Comparator<T> = Arc<dyn Fn(&T, &T) -> Ordering + Send + Sync>;

/// Inclusive range for bounded values
pub struct Bounds<T> {
    min: T,
    max: T,
    comparator: Comparator<T>,
    // Set when `comparator` is `T::cmp`
    natural: bool,
}

impl<T: DataType + Ord> Bounds<T> {
    /// Range ordered by `T: Ord`
    ///
    /// Returns [`ValueError::InvertedBounds`] if `min > max`.
    pub fn new(min: T, max: T) -> Result<Self, ValueError> {
        let mut bounds = Self::with_comparator(min, max, Arc::new(|a: &T, b: &T| a.cmp(b)))?;
        bounds.natural = true;
        Ok(bounds)
    }
}

impl<T: DataType> Bounds<T> {
    /// Range ordered by a custom comparator
    ///
    /// Bounds built this way only equal bounds sharing the same
    /// comparator `Arc`.
    pub fn with_comparator(min: T, max: T, comparator: Comparator<T>) -> Result<Self, ValueError> {
        if comparator(&min, &max) == Ordering::Greater {
            return Err(ValueError::InvertedBounds {
                min: format!("{:?}", min),
                max: format!("{:?}", max),
            });
        }
        Ok(Bounds {
            min,
            max,
            comparator,
            natural: false,
        })
    }

    /// Lower bound
    pub fn min(&self) -> &T {
        &self.min
    }

    /// Upper bound
    pub fn max(&self) -> &T {
        &self.max
    }

    /// Whether both bounds order values the same way
    pub fn same_order(&self, other: &Self) -> bool {
        (self.natural && other.natural) || Arc::ptr_eq(&self.comparator, &other.comparator)
    }

    /// Whether `value` lies within `[min, max]`
    pub fn contains(&self, value: &T) -> bool {
        (self.comparator)(&self.min, value) != Ordering::Greater
            && (self.comparator)(value, &self.max) != Ordering::Greater
    }
}

impl<T: Clone> Clone for Bounds<T> {
    fn clone(&self) -> Self {
        Bounds {
            min: self.min.clone(),
            max: self.max.clone(),
            comparator: Arc::clone(&self.comparator),
            natural: self.natural,
        }
    }
}

// Natural-order bounds compare by their ends; custom comparators also by
// identity.
impl<T: DataType> PartialEq for Bounds<T> {
    fn eq(&self, other: &Self) -> bool {
        self.min == other.min && self.max == other.max && self.same_order(other)
    }
}

impl<T: DataType> Eq for Bounds<T> {}

impl<T: fmt::Debug> fmt::Debug for Bounds<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:?}, {:?}]", self.min, self.max)
    }
}

/// Storage shared by mutable and immutable values
#[derive(Clone)]
pub(crate) struct ValueData<T: DataType> {
    pub(crate) key: Key<T>,
    pub(crate) default: T,
    pub(crate) current: T,
    pub(crate) bounds: Option<Bounds<T>>,
}

impl<T: DataType> ValueData<T> {
    fn plain(key: Key<T>, default: T, current: T) -> Self {
        ValueData {
            key,
            default,
            current,
            bounds: None,
        }
    }

    fn bounded(key: Key<T>, default: T, current: T, bounds: Bounds<T>) -> Result<Self, ValueError> {
        if key.shape() != KeyShape::Bounded {
            return Err(ValueError::NotBounded {
                key: key.id().clone(),
                shape: key.shape().as_str(),
            });
        }
        let data = ValueData {
            key,
            default,
            current,
            bounds: Some(bounds),
        };
        data.check(&data.default)?;
        data.check(&data.current)?;
        Ok(data)
    }

    /// Reject `value` if it falls outside the bounds
    pub(crate) fn check(&self, value: &T) -> Result<(), ValueError> {
        match &self.bounds {
            Some(bounds) if !bounds.contains(value) => Err(ValueError::OutOfBounds {
                key: self.key.id().clone(),
                value: format!("{:?}", value),
                min: format!("{:?}", bounds.min),
                max: format!("{:?}", bounds.max),
            }),
            _ => Ok(()),
        }
    }

    fn replaced(&self, value: T) -> Result<Self, ValueError> {
        self.check(&value)?;
        Ok(ValueData {
            key: self.key.clone(),
            default: self.default.clone(),
            current: value,
            bounds: self.bounds.clone(),
        })
    }
}

impl<T: DataType> PartialEq for ValueData<T> {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
            && self.current == other.current
            && self.default == other.default
            && self.bounds == other.bounds
    }
}

impl<T: DataType> Eq for ValueData<T> {}

impl<T: DataType> Hash for ValueData<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key.hash(state);
        self.current.hash(state);
        self.default.hash(state);
    }
}

impl<T: DataType> fmt::Debug for ValueData<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct("Value");
        s.field("key", &self.key.id().as_str())
            .field("current", &self.current)
            .field("default", &self.default);
        if let Some(bounds) = &self.bounds {
            s.field("bounds", bounds);
        }
        s.finish()
    }
}

/// Mutable value
///
/// A mutable value conceptually belongs to the host it was read from and
/// should not be handed to another host; take an [`ImmutableValue`] snapshot
/// with [`Value::as_immutable`] to share it.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Value<T: DataType> {
    data: ValueData<T>,
}

impl<T: DataType> Value<T> {
    /// Unbounded value with an explicit default
    pub fn new(key: Key<T>, default: T, current: T) -> Self {
        Value {
            data: ValueData::plain(key, default, current),
        }
    }

    /// Unbounded value whose default is its current datum
    pub fn of(key: Key<T>, value: T) -> Self {
        Self::new(key, value.clone(), value)
    }

    /// Bounded value
    ///
    /// Fails if the key is not bounded or if `default` or `current` lies
    /// outside `bounds`.
    pub fn bounded(key: Key<T>, default: T, current: T, bounds: Bounds<T>) -> Result<Self, ValueError> {
        Ok(Value {
            data: ValueData::bounded(key, default, current, bounds)?,
        })
    }

    /// Key this value belongs to
    pub fn key(&self) -> &Key<T> {
        &self.data.key
    }

    /// Current datum
    pub fn get(&self) -> &T {
        &self.data.current
    }

    /// Default datum
    pub fn default_value(&self) -> &T {
        &self.data.default
    }

    /// Bounds, for bounded values
    pub fn bounds(&self) -> Option<&Bounds<T>> {
        self.data.bounds.as_ref()
    }

    /// Whether this value carries bounds
    pub fn is_bounded(&self) -> bool {
        self.data.bounds.is_some()
    }

    /// Replace the current datum in place
    ///
    /// Out-of-range data are rejected and leave the value untouched.
    pub fn set(&mut self, value: T) -> Result<(), ValueError> {
        self.data.check(&value)?;
        self.data.current = value;
        Ok(())
    }

    /// Copy of this value with `current` replaced
    pub fn with(&self, value: T) -> Result<Self, ValueError> {
        Ok(Value {
            data: self.data.replaced(value)?,
        })
    }

    /// Copy of this value with `f` applied to the current datum
    pub fn transform<F>(&self, f: F) -> Result<Self, ValueError>
    where
        F: FnOnce(&T) -> T,
    {
        self.with(f(&self.data.current))
    }

    /// Apply `f` to the current datum in place
    ///
    /// Bounded values are updated through a copy so that a rejected result
    /// never becomes visible.
    pub(crate) fn modify<R, F>(&mut self, f: F) -> Result<R, ValueError>
    where
        F: FnOnce(&mut T) -> R,
    {
        if self.data.bounds.is_none() {
            return Ok(f(&mut self.data.current));
        }
        let mut next = self.data.current.clone();
        let out = f(&mut next);
        self.data.check(&next)?;
        self.data.current = next;
        Ok(out)
    }

    /// Immutable snapshot
    pub fn as_immutable(&self) -> ImmutableValue<T> {
        ImmutableValue {
            data: Arc::new(self.data.clone()),
        }
    }

    /// Consume the value, returning the current datum
    pub fn into_inner(self) -> T {
        self.data.current
    }
}

impl<T: DataType> fmt::Debug for Value<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.data.fmt(f)
    }
}

/// Immutable value
///
/// Clones share one allocation. Equality is by content; [`ImmutableValue::ptr_eq`]
/// is only a fast path and must never be relied upon for correctness.
pub struct ImmutableValue<T: DataType> {
    pub(crate) data: Arc<ValueData<T>>,
}

impl<T: DataType> ImmutableValue<T> {
    /// Unbounded value with an explicit default
    pub fn new(key: Key<T>, default: T, current: T) -> Self {
        ImmutableValue {
            data: Arc::new(ValueData::plain(key, default, current)),
        }
    }

    /// Unbounded value whose default is its current datum
    pub fn of(key: Key<T>, value: T) -> Self {
        Self::new(key, value.clone(), value)
    }

    /// Bounded value
    pub fn bounded(key: Key<T>, default: T, current: T, bounds: Bounds<T>) -> Result<Self, ValueError> {
        Ok(ImmutableValue {
            data: Arc::new(ValueData::bounded(key, default, current, bounds)?),
        })
    }

    /// Key this value belongs to
    pub fn key(&self) -> &Key<T> {
        &self.data.key
    }

    /// Current datum
    pub fn get(&self) -> &T {
        &self.data.current
    }

    /// Default datum
    pub fn default_value(&self) -> &T {
        &self.data.default
    }

    /// Bounds, for bounded values
    pub fn bounds(&self) -> Option<&Bounds<T>> {
        self.data.bounds.as_ref()
    }

    /// Whether this value carries bounds
    pub fn is_bounded(&self) -> bool {
        self.data.bounds.is_some()
    }

    /// Value with `current` replaced
    ///
    /// Returns a clone of `self` when the datum is unchanged.
    pub fn with(&self, value: T) -> Result<Self, ValueError> {
        if value == self.data.current {
            return Ok(self.clone());
        }
        Ok(ImmutableValue {
            data: Arc::new(self.data.replaced(value)?),
        })
    }

    /// Value with `f` applied to the current datum
    pub fn transform<F>(&self, f: F) -> Result<Self, ValueError>
    where
        F: FnOnce(&T) -> T,
    {
        self.with(f(&self.data.current))
    }

    /// Mutable copy
    pub fn as_mutable(&self) -> Value<T> {
        Value {
            data: ValueData::clone(&self.data),
        }
    }

    /// Type-erased handle sharing this value's allocation
    pub fn erase(&self) -> AnyValue {
        AnyValue::from(self.clone())
    }

    /// Whether both handles share one allocation
    pub fn ptr_eq(a: &Self, b: &Self) -> bool {
        Arc::ptr_eq(&a.data, &b.data)
    }
}

impl<T: DataType> Clone for ImmutableValue<T> {
    fn clone(&self) -> Self {
        ImmutableValue {
            data: Arc::clone(&self.data),
        }
    }
}

impl<T: DataType> PartialEq for ImmutableValue<T> {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.data, &other.data) || self.data == other.data
    }
}

impl<T: DataType> Eq for ImmutableValue<T> {}

impl<T: DataType> Hash for ImmutableValue<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.data.hash(state);
    }
}

impl<T: DataType> fmt::Debug for ImmutableValue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.data.fmt(f)
    }
}

impl<T: DataType> From<Value<T>> for ImmutableValue<T> {
    fn from(value: Value<T>) -> Self {
        ImmutableValue {
            data: Arc::new(value.data),
        }
    }
}
