//! Provider registration
//!
//! Providers are registered once at startup through a builder chain:
//!
//! ```ignore
//! let mut builder = ProviderRegistry::builder();
//! builder
//!     .register::<Sign>()
//!     .create(&keys::SIGN_LINES)
//!     .get(|sign| Some(sign.lines.clone()))
//!     .set(|sign, lines| { sign.lines = lines; true })
//!     .build();
//! let registry = builder.build()?;
//! ```
//!
//! ## Rules
//!
//! - Registration order is dispatch order: register narrower providers
//!   (tighter `supports` predicates) before broader ones for the same key
//! - Mistakes (missing getter, bad bounds, unknown key, type mismatch) are
//!   collected and reported by [`RegistryBuilder::build`]
//! - [`RegistryBuilder::build`] consumes the builder; the frozen registry
//!   accepts no further registrations

use super::{ErasedProvider, Provider, ProviderError};
use crate::config::DataConfig;
use crate::registry::ProviderRegistry;
use facet_core::{
    Bounds, Comparator, DataType, ImmutableValue, Key, KeyDescriptor, KeyId, KeyRegistry,
    KeyShape, RegistryError, Value, ValueError,
};
use rustc_hash::FxHashMap;
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::{debug, warn};

/// Collects providers before the registry is frozen
pub struct RegistryBuilder {
    providers: Vec<Arc<dyn ErasedProvider>>,
    errors: Vec<RegistryError>,
    strict_value_types: bool,
}

impl RegistryBuilder {
    /// Empty builder with strict value type checking
    pub fn new() -> Self {
        RegistryBuilder {
            providers: Vec::new(),
            errors: Vec::new(),
            strict_value_types: true,
        }
    }

    /// Builder honoring the `[dispatch]` settings of `config`
    pub fn with_config(config: &DataConfig) -> Self {
        let mut builder = Self::new();
        builder.strict_value_types = config.dispatch.strict_value_types;
        builder
    }

    /// Reject (`true`) or tolerate (`false`) providers whose value type
    /// disagrees with the key registry or with other providers of the key
    pub fn strict_value_types(&mut self, strict: bool) -> &mut Self {
        self.strict_value_types = strict;
        self
    }

    /// Start registering providers for host type `H`
    pub fn register<H: 'static>(&mut self) -> HostRegistrator<'_, H> {
        HostRegistrator {
            builder: self,
            _host: PhantomData,
        }
    }

    /// Number of providers registered so far
    pub fn len(&self) -> usize {
        self.providers.len()
    }

    /// Whether no provider has been registered
    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    fn push(&mut self, provider: Arc<dyn ErasedProvider>) {
        debug!(
            key = %provider.key().id(),
            host = provider.host_type().name(),
            "registered provider"
        );
        self.providers.push(provider);
    }

    /// Freeze the registry
    ///
    /// Keys are checked against the global [`KeyRegistry`] when one is
    /// installed.
    ///
    /// # Errors
    ///
    /// Returns the first registration mistake.
    pub fn build(self) -> Result<ProviderRegistry, RegistryError> {
        let keys = KeyRegistry::global();
        self.finish(keys)
    }

    /// Freeze the registry, checking every provider's key against `keys`
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::UnknownKey`] for keys missing from `keys`,
    /// [`RegistryError::KeyTypeMismatch`] for type disagreements when value
    /// types are strict, or the first other registration mistake.
    pub fn build_with_keys(self, keys: &KeyRegistry) -> Result<ProviderRegistry, RegistryError> {
        self.finish(Some(keys))
    }

    fn finish(mut self, keys: Option<&KeyRegistry>) -> Result<ProviderRegistry, RegistryError> {
        if !self.errors.is_empty() {
            return Err(self.errors.swap_remove(0));
        }

        let mut table: FxHashMap<KeyId, Vec<Arc<dyn ErasedProvider>>> = FxHashMap::default();
        let mut order: Vec<Arc<KeyDescriptor>> = Vec::new();
        for provider in self.providers {
            let id = provider.key().id().clone();
            if let Some(keys) = keys {
                let declared = keys
                    .get(&id)
                    .ok_or_else(|| RegistryError::UnknownKey(id.clone()))?;
                check_type(self.strict_value_types, declared, provider.as_ref())?;
            }
            match table.get_mut(&id) {
                Some(list) => {
                    check_type(self.strict_value_types, list[0].key(), provider.as_ref())?;
                    list.push(provider);
                }
                None => {
                    order.push(Arc::clone(provider.key()));
                    table.insert(id, vec![provider]);
                }
            }
        }

        debug!(
            keys = order.len(),
            providers = table.values().map(Vec::len).sum::<usize>(),
            "froze provider registry"
        );
        Ok(ProviderRegistry::from_parts(table, order))
    }
}

impl Default for RegistryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn check_type(
    strict: bool,
    declared: &KeyDescriptor,
    provider: &dyn ErasedProvider,
) -> Result<(), RegistryError> {
    if declared.value_type() == provider.value_type() {
        return Ok(());
    }
    let err = RegistryError::KeyTypeMismatch {
        key: declared.id().clone(),
        host: provider.host_type().name(),
        expected: declared.value_type().name(),
        found: provider.value_type().name(),
    };
    if strict {
        return Err(err);
    }
    warn!(error = %err, "keeping provider with mismatched value type");
    Ok(())
}

/// Registration scope for one host type
pub struct HostRegistrator<'b, H: 'static> {
    builder: &'b mut RegistryBuilder,
    _host: PhantomData<fn(&H)>,
}

impl<'b, H: 'static> HostRegistrator<'b, H> {
    /// Start a provider binding `key` to `H`
    pub fn create<T: DataType>(&mut self, key: &Key<T>) -> ProviderBuilder<'_, T, H> {
        ProviderBuilder {
            builder: &mut *self.builder,
            key: key.clone(),
            getter: None,
            setter: None,
            remover: None,
            reset_value: None,
            predicate: None,
            bounds: None,
            default: None,
            constructor: None,
        }
    }
}

/// Builder for one provider
///
/// Nothing is registered until [`ProviderBuilder::build`] is called.
#[must_use = "a provider is only registered by calling build()"]
pub struct ProviderBuilder<'b, T: DataType, H: 'static> {
    builder: &'b mut RegistryBuilder,
    key: Key<T>,
    getter: Option<super::Getter<T, H>>,
    setter: Option<super::Setter<T, H>>,
    remover: Option<super::Remover<H>>,
    reset_value: Option<T>,
    predicate: Option<super::Predicate<H>>,
    bounds: Option<Result<Bounds<T>, ValueError>>,
    default: Option<T>,
    constructor: Option<super::Constructor<T>>,
}

impl<'b, T: DataType, H: 'static> ProviderBuilder<'b, T, H> {
    /// Read the facet; `None` means the host holds no value
    pub fn get<F>(mut self, getter: F) -> Self
    where
        F: Fn(&H) -> Option<T> + Send + Sync + 'static,
    {
        self.getter = Some(Box::new(getter));
        self
    }

    /// Write the facet; return `false` to reject the value
    pub fn set<F>(mut self, setter: F) -> Self
    where
        F: Fn(&mut H, T) -> bool + Send + Sync + 'static,
    {
        self.setter = Some(Box::new(move |host, value| Ok(setter(host, value))));
        self
    }

    /// Write the facet where the write may fail partway
    pub fn try_set<F>(mut self, setter: F) -> Self
    where
        F: Fn(&mut H, T) -> Result<bool, ProviderError> + Send + Sync + 'static,
    {
        self.setter = Some(Box::new(setter));
        self
    }

    /// Remove the facet; return `false` if the host refuses
    pub fn delete<F>(mut self, remover: F) -> Self
    where
        F: Fn(&mut H) -> bool + Send + Sync + 'static,
    {
        self.remover = Some(Box::new(move |host| Ok(remover(host))));
        self
    }

    /// Remove the facet where the removal may fail partway
    pub fn try_delete<F>(mut self, remover: F) -> Self
    where
        F: Fn(&mut H) -> Result<bool, ProviderError> + Send + Sync + 'static,
    {
        self.remover = Some(Box::new(remover));
        self
    }

    /// Removal writes `value` through the setter instead of deleting
    pub fn reset_on_delete(mut self, value: T) -> Self {
        self.reset_value = Some(value);
        self
    }

    /// Restrict the provider to hosts satisfying `predicate`
    pub fn supports<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&H) -> bool + Send + Sync + 'static,
    {
        self.predicate = Some(Box::new(predicate));
        self
    }

    /// Bounds under a custom ordering
    pub fn bounds_with(mut self, min: T, max: T, comparator: Comparator<T>) -> Self {
        self.bounds = Some(Bounds::with_comparator(min, max, comparator));
        self
    }

    /// Default datum attached to constructed values
    pub fn default_value(mut self, value: T) -> Self {
        self.default = Some(value);
        self
    }

    /// Override value construction
    pub fn construct_value<F>(mut self, constructor: F) -> Self
    where
        F: Fn(&Key<T>, T) -> Value<T> + Send + Sync + 'static,
    {
        self.constructor = Some(Box::new(constructor));
        self
    }

    /// Register the provider
    ///
    /// Mistakes are recorded and reported when the registry is built.
    pub fn build(self) {
        let host = std::any::type_name::<H>();
        let invalid = |source: ValueError| RegistryError::InvalidProvider {
            key: self.key.id().clone(),
            host,
            source,
        };

        let bounds = match self.bounds {
            None if self.key.shape() == KeyShape::Bounded => {
                self.builder.errors.push(RegistryError::MissingBounds {
                    key: self.key.id().clone(),
                    host,
                });
                return;
            }
            None => None,
            Some(Err(err)) => {
                self.builder.errors.push(invalid(err));
                return;
            }
            Some(Ok(bounds)) => {
                // Validates the key shape and every datum the provider
                // itself would write
                let checked = self
                    .default
                    .iter()
                    .chain(self.reset_value.iter())
                    .try_for_each(|datum| {
                        ImmutableValue::bounded(
                            self.key.clone(),
                            datum.clone(),
                            datum.clone(),
                            bounds.clone(),
                        )
                        .map(drop)
                    })
                    .and_then(|()| {
                        if self.key.shape() == KeyShape::Bounded {
                            Ok(())
                        } else {
                            Err(ValueError::NotBounded {
                                key: self.key.id().clone(),
                                shape: self.key.shape().as_str(),
                            })
                        }
                    });
                if let Err(err) = checked {
                    self.builder.errors.push(invalid(err));
                    return;
                }
                Some(bounds)
            }
        };

        let Some(getter) = self.getter else {
            self.builder.errors.push(RegistryError::MissingGetter {
                key: self.key.id().clone(),
                host,
            });
            return;
        };

        let provider = Provider {
            key: self.key,
            getter,
            setter: self.setter,
            remover: self.remover,
            reset_value: self.reset_value,
            predicate: self.predicate,
            bounds,
            default: self.default,
            constructor: self.constructor,
        };
        self.builder.push(Arc::new(provider));
    }
}

impl<'b, T: DataType + Ord, H: 'static> ProviderBuilder<'b, T, H> {
    /// Inclusive bounds under `T`'s natural ordering
    ///
    /// Writes outside `[min, max]` are rejected before the setter runs.
    pub fn bounds(mut self, min: T, max: T) -> Self {
        self.bounds = Some(Bounds::new(min, max));
        self
    }
}
