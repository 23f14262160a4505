//! Type-erased immutable values
//!
//! Transaction results, manipulators and the intern table hold values of
//! many different types side by side. [`AnyValue`] erases the datum type
//! while keeping content equality, hashing and a checked way back to the
//! typed [`ImmutableValue`].

use super::{Bounds, ImmutableValue, ValueData};
use crate::key::KeyId;
use crate::types::{DataType, KeyDescriptor, TypeToken};
use std::any::Any;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// Object-safe view of a `ValueData<T>`
trait ErasedValue: Send + Sync + 'static {
    fn descriptor(&self) -> &Arc<KeyDescriptor>;
    fn value_type(&self) -> TypeToken;
    fn as_any(&self) -> &dyn Any;
    fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync>;
    fn eq_erased(&self, other: &dyn ErasedValue) -> bool;
    fn hash_erased(&self, state: &mut dyn Hasher);
    fn fmt_erased(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result;
    fn is_default(&self) -> bool;
}

impl<T: DataType> ErasedValue for ValueData<T> {
    fn descriptor(&self) -> &Arc<KeyDescriptor> {
        self.key.descriptor()
    }

    fn value_type(&self) -> TypeToken {
        TypeToken::of::<T>()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
        self
    }

    fn eq_erased(&self, other: &dyn ErasedValue) -> bool {
        other
            .as_any()
            .downcast_ref::<ValueData<T>>()
            .map_or(false, |other| self == other)
    }

    fn hash_erased(&self, mut state: &mut dyn Hasher) {
        self.hash(&mut state);
    }

    fn fmt_erased(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }

    fn is_default(&self) -> bool {
        self.current == self.default
    }
}

/// Immutable value of any type
#[derive(Clone)]
pub struct AnyValue(Arc<dyn ErasedValue>);

impl AnyValue {
    /// Descriptor of the value's key
    pub fn key(&self) -> &Arc<KeyDescriptor> {
        self.0.descriptor()
    }

    /// Id of the value's key
    pub fn key_id(&self) -> &KeyId {
        self.0.descriptor().id()
    }

    /// Type of the datum
    pub fn value_type(&self) -> TypeToken {
        self.0.value_type()
    }

    /// Whether the datum is of type `T`
    pub fn is<T: DataType>(&self) -> bool {
        self.0.as_any().is::<ValueData<T>>()
    }

    /// Whether the current datum equals the default
    pub fn is_default(&self) -> bool {
        self.0.is_default()
    }

    /// Recover the typed value
    ///
    /// Shares the allocation; returns `None` if the datum is not a `T`.
    pub fn downcast<T: DataType>(&self) -> Option<ImmutableValue<T>> {
        Arc::clone(&self.0)
            .into_any()
            .downcast::<ValueData<T>>()
            .ok()
            .map(|data| ImmutableValue { data })
    }

    /// Borrow the current datum
    pub fn get<T: DataType>(&self) -> Option<&T> {
        self.data::<T>().map(|data| &data.current)
    }

    /// Borrow the default datum
    pub fn default_value<T: DataType>(&self) -> Option<&T> {
        self.data::<T>().map(|data| &data.default)
    }

    /// Borrow the bounds, if the datum is a `T` and carries bounds
    pub fn bounds<T: DataType>(&self) -> Option<&Bounds<T>> {
        self.data::<T>().and_then(|data| data.bounds.as_ref())
    }

    /// Whether both handles share one allocation
    pub fn ptr_eq(a: &Self, b: &Self) -> bool {
        Arc::ptr_eq(&a.0, &b.0)
    }

    fn data<T: DataType>(&self) -> Option<&ValueData<T>> {
        self.0.as_any().downcast_ref::<ValueData<T>>()
    }
}

impl<T: DataType> From<ImmutableValue<T>> for AnyValue {
    fn from(value: ImmutableValue<T>) -> Self {
        AnyValue(value.data)
    }
}

impl PartialEq for AnyValue {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0) || self.0.eq_erased(other.0.as_ref())
    }
}

impl Eq for AnyValue {}

impl Hash for AnyValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.hash_erased(state);
    }
}

impl fmt::Debug for AnyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt_erased(f)
    }
}
