//! Frozen provider registry and dispatch
//!
//! ## Dispatch
//!
//! For a `(key, host)` pair the registry scans the key's providers in
//! registration order and selects the first one bound to the host's type
//! whose `supports` predicate accepts the host. There is no specificity
//! ranking: narrower providers must be registered first.
//!
//! Dispatch never fails. It yields either the provider or an
//! [`Unsupported`] reason; "supported but no value" is the provider's
//! getter returning `None`.

use crate::provider::builder::RegistryBuilder;
use crate::provider::{ErasedProvider, Provider};
use facet_core::{DataType, Key, KeyDescriptor, KeyId, RegistryError};
use once_cell::sync::OnceCell;
use rustc_hash::FxHashMap;
use std::any::Any;
use std::fmt;
use std::sync::Arc;
use tracing::{info, trace};

static GLOBAL_PROVIDERS: OnceCell<Arc<ProviderRegistry>> = OnceCell::new();

/// Why a key does not apply to a host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Unsupported {
    /// No provider binds the key to the host's type
    NoProvider,
    /// Providers bind the key to the host's type, but every one of them
    /// declined this particular host
    HostRejected,
}

/// Outcome of resolving a provider
pub enum Dispatch<'r, P: ?Sized> {
    /// The selected provider
    Found(&'r P),
    /// The key does not apply to the host
    Unsupported(Unsupported),
}

impl<'r, P: ?Sized> Dispatch<'r, P> {
    /// The provider, if one was found
    pub fn found(self) -> Option<&'r P> {
        match self {
            Dispatch::Found(provider) => Some(provider),
            Dispatch::Unsupported(_) => None,
        }
    }

    /// Whether a provider was found
    pub fn is_found(&self) -> bool {
        matches!(self, Dispatch::Found(_))
    }

    /// The reason no provider applies
    pub fn unsupported(&self) -> Option<Unsupported> {
        match self {
            Dispatch::Found(_) => None,
            Dispatch::Unsupported(reason) => Some(*reason),
        }
    }
}

impl<P: ?Sized> fmt::Debug for Dispatch<'_, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dispatch::Found(_) => f.write_str("Found"),
            Dispatch::Unsupported(reason) => write!(f, "Unsupported({:?})", reason),
        }
    }
}

/// Read-only table of providers, keyed by key id
///
/// Built once by [`RegistryBuilder`]; lookups need no locking and the
/// registry can be shared across threads behind an `Arc`.
pub struct ProviderRegistry {
    providers: FxHashMap<KeyId, Vec<Arc<dyn ErasedProvider>>>,
    keys: Vec<Arc<KeyDescriptor>>,
}

impl ProviderRegistry {
    /// Start registering providers
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    pub(crate) fn from_parts(
        providers: FxHashMap<KeyId, Vec<Arc<dyn ErasedProvider>>>,
        keys: Vec<Arc<KeyDescriptor>>,
    ) -> Self {
        ProviderRegistry { providers, keys }
    }

    /// Typed provider for `key` on `host`
    pub fn provider<T: DataType, H: 'static>(
        &self,
        key: &Key<T>,
        host: &H,
    ) -> Dispatch<'_, Provider<T, H>> {
        let Some(list) = self.providers.get(key.id()) else {
            trace!(key = %key.id(), "no providers for key");
            return Dispatch::Unsupported(Unsupported::NoProvider);
        };
        let mut bound = false;
        for (index, provider) in list.iter().enumerate() {
            let Some(typed) = provider.as_any().downcast_ref::<Provider<T, H>>() else {
                continue;
            };
            bound = true;
            if typed.supports(host) {
                trace!(key = %key.id(), index, "dispatched");
                return Dispatch::Found(typed);
            }
        }
        let reason = if bound {
            Unsupported::HostRejected
        } else {
            Unsupported::NoProvider
        };
        trace!(key = %key.id(), ?reason, "unsupported");
        Dispatch::Unsupported(reason)
    }

    /// Erased provider for the key `id` on `host`
    pub fn resolve(&self, id: &KeyId, host: &dyn Any) -> Dispatch<'_, dyn ErasedProvider> {
        let Some(list) = self.providers.get(id) else {
            trace!(key = %id, "no providers for key");
            return Dispatch::Unsupported(Unsupported::NoProvider);
        };
        let mut bound = false;
        for (index, provider) in list.iter().enumerate() {
            if !provider.binds(host) {
                continue;
            }
            bound = true;
            if provider.supports_host(host) {
                trace!(key = %id, index, "dispatched");
                return Dispatch::Found(provider.as_ref());
            }
        }
        let reason = if bound {
            Unsupported::HostRejected
        } else {
            Unsupported::NoProvider
        };
        trace!(key = %id, ?reason, "unsupported");
        Dispatch::Unsupported(reason)
    }

    /// All providers registered for `id`, in dispatch order
    pub fn providers(&self, id: &KeyId) -> &[Arc<dyn ErasedProvider>] {
        self.providers.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Keys with at least one provider, in first-registration order
    pub fn keys(&self) -> impl Iterator<Item = &Arc<KeyDescriptor>> {
        self.keys.iter()
    }

    /// Whether any provider serves `id`
    pub fn contains(&self, id: &KeyId) -> bool {
        self.providers.contains_key(id)
    }

    /// Number of keys with providers
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Whether no provider is registered
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Total number of providers
    pub fn provider_count(&self) -> usize {
        self.providers.values().map(Vec::len).sum()
    }

    /// Install as the process-wide registry
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::AlreadyInstalled`] if a registry was
    /// installed before; registration after startup is not possible.
    pub fn install_global(self) -> Result<Arc<ProviderRegistry>, RegistryError> {
        let registry = Arc::new(self);
        GLOBAL_PROVIDERS
            .set(Arc::clone(&registry))
            .map_err(|_| RegistryError::AlreadyInstalled("provider"))?;
        info!(
            keys = registry.len(),
            providers = registry.provider_count(),
            "installed global provider registry"
        );
        Ok(registry)
    }

    /// The process-wide registry, if installed
    pub fn global() -> Option<Arc<ProviderRegistry>> {
        GLOBAL_PROVIDERS.get().cloned()
    }
}

impl fmt::Debug for ProviderRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderRegistry")
            .field("keys", &self.len())
            .field("providers", &self.provider_count())
            .finish()
    }
}
