//! Key registry
//!
//! A process-wide catalog of every key known to the system, built once at
//! startup and read-only afterwards.
//!
//! ## Usage
//!
//! ```rust,ignore
//! let mut builder = KeyRegistry::builder();
//! builder.register(&keys::COOLDOWN)?;
//! builder.register(&keys::DYE_COLOR)?;
//! let registry = builder.build().install_global()?;
//!
//! let cooldown: Option<Key<i32>> = registry.typed(&KeyId::from_static("minecraft:cooldown"));
//! ```

use crate::error::RegistryError;
use crate::key::KeyId;
use crate::types::{DataType, Key, KeyDescriptor};
use once_cell::sync::OnceCell;
use rustc_hash::FxHashMap;
use std::sync::Arc;
use tracing::{debug, info};

static GLOBAL_KEYS: OnceCell<KeyRegistry> = OnceCell::new();

/// Mutable key registry used during startup
#[derive(Default)]
pub struct KeyRegistryBuilder {
    keys: Vec<Arc<KeyDescriptor>>,
    index: FxHashMap<KeyId, usize>,
}

impl KeyRegistryBuilder {
    /// Create an empty builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a typed key
    ///
    /// Fails with [`RegistryError::DuplicateKey`] if the id is taken.
    pub fn register<T: DataType>(&mut self, key: &Key<T>) -> Result<&mut Self, RegistryError> {
        self.register_descriptor(Arc::clone(key.descriptor()))
    }

    /// Register a type-erased key
    pub fn register_descriptor(&mut self, descriptor: Arc<KeyDescriptor>) -> Result<&mut Self, RegistryError> {
        if self.index.contains_key(descriptor.id()) {
            return Err(RegistryError::DuplicateKey(descriptor.id().clone()));
        }
        debug!(key = %descriptor.id(), shape = %descriptor.shape(), "registered key");
        self.index.insert(descriptor.id().clone(), self.keys.len());
        self.keys.push(descriptor);
        Ok(self)
    }

    /// Freeze the registry
    pub fn build(self) -> KeyRegistry {
        debug!(keys = self.keys.len(), "key registry frozen");
        KeyRegistry {
            keys: self.keys,
            index: self.index,
        }
    }
}

/// Frozen key registry
pub struct KeyRegistry {
    keys: Vec<Arc<KeyDescriptor>>,
    index: FxHashMap<KeyId, usize>,
}

impl KeyRegistry {
    /// Start building a registry
    pub fn builder() -> KeyRegistryBuilder {
        KeyRegistryBuilder::new()
    }

    /// Descriptor for `id`
    pub fn get(&self, id: &KeyId) -> Option<&Arc<KeyDescriptor>> {
        self.index.get(id).map(|&i| &self.keys[i])
    }

    /// Typed key for `id`
    ///
    /// Returns `None` if the id is unknown or its value type is not `T`.
    pub fn typed<T: DataType>(&self, id: &KeyId) -> Option<Key<T>> {
        self.get(id).cloned().and_then(Key::from_descriptor)
    }

    /// Whether `id` is registered
    pub fn contains(&self, id: &KeyId) -> bool {
        self.index.contains_key(id)
    }

    /// Descriptors in registration order
    pub fn iter(&self) -> impl Iterator<Item = &Arc<KeyDescriptor>> {
        self.keys.iter()
    }

    /// Number of keys
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Whether the registry is empty
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Install as the process-wide registry
    ///
    /// Fails if a registry was already installed.
    pub fn install_global(self) -> Result<&'static KeyRegistry, RegistryError> {
        let count = self.len();
        GLOBAL_KEYS
            .set(self)
            .map_err(|_| RegistryError::AlreadyInstalled("key"))?;
        info!(keys = count, "installed global key registry");
        GLOBAL_KEYS.get().ok_or(RegistryError::AlreadyInstalled("key"))
    }

    /// The process-wide registry, if installed
    pub fn global() -> Option<&'static KeyRegistry> {
        GLOBAL_KEYS.get()
    }
}

impl std::fmt::Debug for KeyRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyRegistry")
            .field("key_count", &self.keys.len())
            .finish()
    }
}
