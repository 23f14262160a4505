//! Key descriptors and type tokens
//!
//! This module defines:
//! - DataType: Bound satisfied by every type a facet can hold
//! - TypeToken: Runtime tag for a Rust type (used for type-erased lookups)
//! - KeyShape: Plain, Bounded, List, Set or Map
//! - KeyDescriptor: Immutable, type-erased description of a key
//! - Key<T>: Typed handle to a key descriptor
//!
//! Keys are equal iff their ids are equal, whatever their shape or type.

use crate::key::KeyId;
use std::any::{Any, TypeId};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;
use std::sync::Arc;

/// Types that can be stored as facet values
///
/// Values must be cloneable, comparable and hashable so that transaction
/// results and the intern table can compare them by content.
pub trait DataType: Any + Clone + Eq + Hash + fmt::Debug + Send + Sync {}

impl<T> DataType for T where T: Any + Clone + Eq + Hash + fmt::Debug + Send + Sync {}

/// Runtime tag identifying a Rust type
#[derive(Clone, Copy)]
pub struct TypeToken {
    id: TypeId,
    name: &'static str,
}

impl TypeToken {
    /// Token for `T`
    pub fn of<T: Any>() -> Self {
        TypeToken {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    /// Underlying `TypeId`
    pub fn id(&self) -> TypeId {
        self.id
    }

    /// Type name, for diagnostics only
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Whether this token names `T`
    pub fn is<T: Any>(&self) -> bool {
        self.id == TypeId::of::<T>()
    }
}

impl PartialEq for TypeToken {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeToken {}

impl Hash for TypeToken {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for TypeToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeToken({})", self.name)
    }
}

impl fmt::Display for TypeToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// Shape of the value a key holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyShape {
    /// A single datum
    Plain,
    /// A single datum constrained to `[min, max]`
    Bounded,
    /// An ordered sequence
    List,
    /// An ordered set
    Set,
    /// An ordered map
    Map,
}

impl KeyShape {
    /// Whether values of this shape are collections
    pub fn is_collection(&self) -> bool {
        matches!(self, KeyShape::List | KeyShape::Set | KeyShape::Map)
    }

    /// Lowercase name
    pub fn as_str(&self) -> &'static str {
        match self {
            KeyShape::Plain => "plain",
            KeyShape::Bounded => "bounded",
            KeyShape::List => "list",
            KeyShape::Set => "set",
            KeyShape::Map => "map",
        }
    }
}

impl fmt::Display for KeyShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Type-erased key description
///
/// `value_type` is the type of a whole value (`Vec<E>` for a list key),
/// `element_type` the type of one element (`E`). For plain and bounded keys
/// both are the same; for map keys the element is the `(K, V)` pair.
pub struct KeyDescriptor {
    id: KeyId,
    shape: KeyShape,
    value_type: TypeToken,
    element_type: TypeToken,
}

impl KeyDescriptor {
    /// Key identifier
    pub fn id(&self) -> &KeyId {
        &self.id
    }

    /// Value shape
    pub fn shape(&self) -> KeyShape {
        self.shape
    }

    /// Type of a whole value
    pub fn value_type(&self) -> TypeToken {
        self.value_type
    }

    /// Type of one element
    pub fn element_type(&self) -> TypeToken {
        self.element_type
    }
}

impl PartialEq for KeyDescriptor {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for KeyDescriptor {}

impl Hash for KeyDescriptor {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for KeyDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyDescriptor")
            .field("id", &self.id.as_str())
            .field("shape", &self.shape)
            .field("value_type", &self.value_type.name())
            .finish()
    }
}

/// Typed handle to a key
///
/// `T` is the type of a whole value: `i32` for a plain or bounded integer
/// key, `Vec<E>` for a list key, `BTreeSet<E>` for a set key and
/// `BTreeMap<K, V>` for a map key.
pub struct Key<T> {
    descriptor: Arc<KeyDescriptor>,
    _marker: PhantomData<fn() -> T>,
}

impl<T: DataType> Key<T> {
    fn with_shape(id: KeyId, shape: KeyShape, element_type: TypeToken) -> Self {
        Key {
            descriptor: Arc::new(KeyDescriptor {
                id,
                shape,
                value_type: TypeToken::of::<T>(),
                element_type,
            }),
            _marker: PhantomData,
        }
    }

    /// Key holding a single unconstrained datum
    pub fn plain(id: KeyId) -> Self {
        Self::with_shape(id, KeyShape::Plain, TypeToken::of::<T>())
    }

    /// Recover a typed handle from a descriptor
    ///
    /// Returns `None` if the descriptor's value type is not `T`.
    pub fn from_descriptor(descriptor: Arc<KeyDescriptor>) -> Option<Self> {
        if descriptor.value_type.is::<T>() {
            Some(Key {
                descriptor,
                _marker: PhantomData,
            })
        } else {
            None
        }
    }

    /// Key identifier
    pub fn id(&self) -> &KeyId {
        &self.descriptor.id
    }

    /// Value shape
    pub fn shape(&self) -> KeyShape {
        self.descriptor.shape
    }

    /// Type-erased descriptor
    pub fn descriptor(&self) -> &Arc<KeyDescriptor> {
        &self.descriptor
    }
}

impl<T: DataType + Ord> Key<T> {
    /// Key holding a datum constrained to a range
    pub fn bounded(id: KeyId) -> Self {
        Self::with_shape(id, KeyShape::Bounded, TypeToken::of::<T>())
    }
}

impl<E: DataType> Key<Vec<E>> {
    /// Key holding an ordered sequence of `E`
    pub fn list(id: KeyId) -> Self {
        Self::with_shape(id, KeyShape::List, TypeToken::of::<E>())
    }
}

impl<E: DataType + Ord> Key<BTreeSet<E>> {
    /// Key holding a set of `E`
    pub fn set(id: KeyId) -> Self {
        Self::with_shape(id, KeyShape::Set, TypeToken::of::<E>())
    }
}

impl<K: DataType + Ord, V: DataType> Key<BTreeMap<K, V>> {
    /// Key holding a map from `K` to `V`
    pub fn map(id: KeyId) -> Self {
        Self::with_shape(id, KeyShape::Map, TypeToken::of::<(K, V)>())
    }
}

impl<T> Clone for Key<T> {
    fn clone(&self) -> Self {
        Key {
            descriptor: Arc::clone(&self.descriptor),
            _marker: PhantomData,
        }
    }
}

impl<T> PartialEq for Key<T> {
    fn eq(&self, other: &Self) -> bool {
        self.descriptor.id == other.descriptor.id
    }
}

impl<T> Eq for Key<T> {}

impl<T> Hash for Key<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.descriptor.id.hash(state);
    }
}

impl<T> fmt::Debug for Key<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Key<{}>({}, {})",
            self.descriptor.value_type.name(),
            self.descriptor.id,
            self.descriptor.shape
        )
    }
}

impl<T> fmt::Display for Key<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.descriptor.id, f)
    }
}
