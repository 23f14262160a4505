//! Data engine
//!
//! [`DataEngine`] is the single entry point callers use to read and write
//! facets on hosts. It pairs a frozen [`ProviderRegistry`] with an immutable
//! value cache and the runtime settings from `facet.toml`.
//!
//! ## Outcomes
//!
//! Reads distinguish three cases through [`Lookup`]: the key does not apply
//! to the host, it applies but the host holds no value, or a value is
//! present. Writes always return a [`DataTransactionResult`]; an unsupported
//! key yields `fail_no_data`, never an error.
//!
//! ## Concurrency
//!
//! The engine is `Send + Sync`. Host access is not synchronized: callers must
//! not write the same host from several threads at once.

mod bulk;
mod undo;

use crate::config::{ConfigError, DataConfig};
use crate::provider::{ErasedProvider, Provider, WriteContext};
use crate::registry::{Dispatch, ProviderRegistry, Unsupported};
use facet_core::{AnyValue, DataType, ElementCollection, ImmutableValue, Key, KeyId, Value};
use facet_intern::{Interner, ValueCache};
use facet_transaction::{DataTransactionResult, TransactionStatus};
use parking_lot::RwLock;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, warn};

/// Result of reading a key from a host
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup<T> {
    /// The key does not apply to the host
    Unsupported(Unsupported),
    /// The key applies but the host holds no value
    Absent,
    /// The host's current value
    Present(T),
}

impl<T> Lookup<T> {
    /// The value, if present
    pub fn into_option(self) -> Option<T> {
        match self {
            Lookup::Present(value) => Some(value),
            _ => None,
        }
    }

    /// Whether a value is present
    pub fn is_present(&self) -> bool {
        matches!(self, Lookup::Present(_))
    }

    /// Whether the key applies to the host
    pub fn is_supported(&self) -> bool {
        !matches!(self, Lookup::Unsupported(_))
    }
}

/// Reads and writes facets on hosts
pub struct DataEngine {
    registry: Arc<ProviderRegistry>,
    cache: Arc<ValueCache>,
    config: RwLock<DataConfig>,
}

impl DataEngine {
    /// Engine over `registry` with default settings and the process-wide
    /// value cache
    pub fn new(registry: ProviderRegistry) -> Self {
        Self::with_shared(Arc::new(registry), ValueCache::global(), DataConfig::default())
    }

    /// Engine with its own value cache
    pub fn with_config(registry: ProviderRegistry, config: DataConfig) -> Self {
        Self::with_shared(Arc::new(registry), Arc::new(ValueCache::new()), config)
    }

    /// Engine sharing a registry and a cache with other engines
    ///
    /// The cache table is shared; whether this engine interns is decided by
    /// its own `[cache]` settings.
    pub fn with_shared(
        registry: Arc<ProviderRegistry>,
        cache: Arc<ValueCache>,
        config: DataConfig,
    ) -> Self {
        debug!(keys = registry.len(), "created data engine");
        DataEngine {
            registry,
            cache,
            config: RwLock::new(config),
        }
    }

    /// Engine configured from `facet.toml` in `dir`
    ///
    /// The file is created with defaults when missing.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written, read or parsed.
    pub fn open(registry: ProviderRegistry, dir: &Path) -> Result<Self, ConfigError> {
        let config = DataConfig::load_or_create(dir)?;
        Ok(Self::with_config(registry, config))
    }

    /// Provider registry
    pub fn registry(&self) -> &Arc<ProviderRegistry> {
        &self.registry
    }

    /// Immutable value table, possibly shared with other engines
    pub fn cache(&self) -> &Arc<ValueCache> {
        &self.cache
    }

    /// Snapshot of the current settings
    pub fn config(&self) -> DataConfig {
        self.config.read().clone()
    }

    /// Change settings at runtime
    ///
    /// Cache and transaction settings take effect immediately and only for
    /// this engine. Dispatch settings only apply when a registry is built.
    pub fn update_config<F>(&self, f: F)
    where
        F: FnOnce(&mut DataConfig),
    {
        let mut config = self.config.write();
        f(&mut config);
        debug!(config = ?*config, "updated engine config");
    }

    /// The value table as seen through this engine's cache settings
    pub fn interner(&self) -> Interner<'_> {
        self.cache.interner(self.config.read().cache.policy())
    }

    fn context(&self) -> WriteContext<'_> {
        let config = self.config.read();
        WriteContext::new(
            self.cache.interner(config.cache.policy()),
            config.transaction.skip_unchanged,
        )
    }

    // ========================================================================
    // Dispatch
    // ========================================================================

    /// Provider for `key` on `host`
    pub fn dispatch<T: DataType, H: 'static>(
        &self,
        host: &H,
        key: &Key<T>,
    ) -> Dispatch<'_, Provider<T, H>> {
        self.registry.provider(key, host)
    }

    /// Whether `key` applies to `host`
    pub fn supports<T: DataType, H: 'static>(&self, host: &H, key: &Key<T>) -> bool {
        self.dispatch(host, key).is_found()
    }

    /// Whether the key `id` applies to `host`
    pub fn supports_key<H: 'static>(&self, host: &H, id: &KeyId) -> bool {
        self.registry.resolve(id, host).is_found()
    }

    // ========================================================================
    // Reads
    // ========================================================================

    /// Current datum for `key`
    pub fn get<T: DataType, H: 'static>(&self, host: &H, key: &Key<T>) -> Option<T> {
        self.dispatch(host, key).found()?.get(host)
    }

    /// Current datum, distinguishing unsupported from absent
    pub fn lookup<T: DataType, H: 'static>(&self, host: &H, key: &Key<T>) -> Lookup<T> {
        match self.dispatch(host, key) {
            Dispatch::Found(provider) => match provider.get(host) {
                Some(data) => Lookup::Present(data),
                None => Lookup::Absent,
            },
            Dispatch::Unsupported(reason) => Lookup::Unsupported(reason),
        }
    }

    /// Current value as a mutable [`Value`]
    pub fn get_value<T: DataType, H: 'static>(&self, host: &H, key: &Key<T>) -> Option<Value<T>> {
        let provider = self.dispatch(host, key).found()?;
        provider.get(host).map(|data| provider.value_of(data))
    }

    /// Current value as an interned [`ImmutableValue`]
    pub fn get_immutable<T: DataType, H: 'static>(
        &self,
        host: &H,
        key: &Key<T>,
    ) -> Option<ImmutableValue<T>> {
        let provider = self.dispatch(host, key).found()?;
        provider
            .get(host)
            .map(|data| provider.record(data, &self.interner()))
    }

    /// Current value for the key `id`, type-erased
    pub fn get_any<H: 'static>(&self, host: &H, id: &KeyId) -> Option<AnyValue> {
        self.registry.resolve(id, host).found()?.get_any(host, &self.interner())
    }

    // ========================================================================
    // Writes
    // ========================================================================

    /// Write `value` under `key`
    pub fn offer<T: DataType, H: 'static>(
        &self,
        host: &mut H,
        key: &Key<T>,
        value: T,
    ) -> DataTransactionResult {
        match self.registry.provider(key, &*host) {
            Dispatch::Found(provider) => provider.offer(host, value, &self.context()),
            Dispatch::Unsupported(_) => DataTransactionResult::fail_no_data(),
        }
    }

    /// Write the current datum of `value` under its key
    pub fn offer_value<T: DataType, H: 'static>(
        &self,
        host: &mut H,
        value: &ImmutableValue<T>,
    ) -> DataTransactionResult {
        self.offer(host, value.key(), value.get().clone())
    }

    /// Write a type-erased value under its key
    pub fn offer_any<H: 'static>(&self, host: &mut H, value: &AnyValue) -> DataTransactionResult {
        self.offer_erased(host, value, &self.context())
    }

    pub(crate) fn offer_erased<H: 'static>(
        &self,
        host: &mut H,
        value: &AnyValue,
        ctx: &WriteContext<'_>,
    ) -> DataTransactionResult {
        match self.registry.resolve(value.key_id(), &*host) {
            Dispatch::Found(provider) => provider.offer_any(host, value, ctx),
            Dispatch::Unsupported(_) => DataTransactionResult::fail_no_data(),
        }
    }

    /// Add one element to a list or set value
    ///
    /// A host without a value starts from an empty collection. Adding an
    /// element a set already holds changes nothing.
    pub fn offer_single<C, H>(
        &self,
        host: &mut H,
        key: &Key<C>,
        element: C::Element,
    ) -> DataTransactionResult
    where
        C: ElementCollection + Default,
        H: 'static,
    {
        let provider = match self.registry.provider(key, &*host) {
            Dispatch::Found(provider) => provider,
            Dispatch::Unsupported(_) => return DataTransactionResult::fail_no_data(),
        };
        let mut collection = provider.get(host).unwrap_or_default();
        if !collection.insert_element(element) {
            return DataTransactionResult::success_no_data();
        }
        provider.offer(host, collection, &self.context())
    }

    /// Remove one element from a list or set value
    pub fn remove_single<C, H>(
        &self,
        host: &mut H,
        key: &Key<C>,
        element: &C::Element,
    ) -> DataTransactionResult
    where
        C: ElementCollection,
        H: 'static,
    {
        let provider = match self.registry.provider(key, &*host) {
            Dispatch::Found(provider) => provider,
            Dispatch::Unsupported(_) => return DataTransactionResult::fail_no_data(),
        };
        let Some(mut collection) = provider.get(host) else {
            return DataTransactionResult::success_no_data();
        };
        if !collection.remove_element(element) {
            return DataTransactionResult::success_no_data();
        }
        provider.offer(host, collection, &self.context())
    }

    /// Replace the current datum with `f(current)`
    ///
    /// Fails with no data when the key does not apply or the host holds no
    /// value to transform.
    pub fn transform<T, H, F>(&self, host: &mut H, key: &Key<T>, f: F) -> DataTransactionResult
    where
        T: DataType,
        H: 'static,
        F: FnOnce(&T) -> T,
    {
        let provider = match self.registry.provider(key, &*host) {
            Dispatch::Found(provider) => provider,
            Dispatch::Unsupported(_) => return DataTransactionResult::fail_no_data(),
        };
        match provider.get(host) {
            Some(current) => provider.offer(host, f(&current), &self.context()),
            None => DataTransactionResult::fail_no_data(),
        }
    }

    /// Remove `key` from `host`
    pub fn remove<T: DataType, H: 'static>(&self, host: &mut H, key: &Key<T>) -> DataTransactionResult {
        match self.registry.provider(key, &*host) {
            Dispatch::Found(provider) => provider.remove(host, &self.context()),
            Dispatch::Unsupported(_) => DataTransactionResult::fail_no_data(),
        }
    }

    /// Remove the key `id` from `host`
    pub fn remove_key<H: 'static>(&self, host: &mut H, id: &KeyId) -> DataTransactionResult {
        self.remove_erased(host, id, &self.context())
    }

    pub(crate) fn remove_erased<H: 'static>(
        &self,
        host: &mut H,
        id: &KeyId,
        ctx: &WriteContext<'_>,
    ) -> DataTransactionResult {
        match self.registry.resolve(id, &*host) {
            Dispatch::Found(provider) => provider.remove_any(host, ctx),
            Dispatch::Unsupported(_) => DataTransactionResult::fail_no_data(),
        }
    }

    /// Log results that may have left a host inconsistent
    pub(crate) fn observe(&self, result: DataTransactionResult) -> DataTransactionResult {
        if result.status() == TransactionStatus::Error {
            warn!(
                rejected = result.rejected().len(),
                "transaction ended in error; host state may be inconsistent"
            );
        }
        result
    }
}

impl std::fmt::Debug for DataEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DataEngine")
            .field("registry", &self.registry)
            .field("cache", &self.cache)
            .field("config", &*self.config.read())
            .finish()
    }
}

/// Resolved erased provider, used by bulk operations
pub(crate) fn resolve<'r, H: 'static>(
    registry: &'r ProviderRegistry,
    id: &KeyId,
    host: &H,
) -> Option<&'r dyn ErasedProvider> {
    registry.resolve(id, host).found()
}
