//! Providers
//!
//! A provider binds one key to one host type. It carries the closures that
//! read and write the facet on a host, an optional predicate narrowing the
//! hosts it applies to, and the rules for building values (default, bounds,
//! custom constructor).
//!
//! ## Rules
//!
//! - `set` returning `false` is a domain rejection, not an error
//! - Bounded providers reject out-of-range data before the setter runs
//! - A setter or remover returning `Err` may have left the host partially
//!   written; the resulting transaction has `Error` status
//! - Providers are built once through [`RegistryBuilder`] and never mutated
//!
//! [`RegistryBuilder`]: builder::RegistryBuilder

pub mod builder;

use facet_core::{
    AnyValue, Bounds, DataType, ImmutableValue, Key, KeyDescriptor, TypeToken, Value, ValueError,
};
use facet_intern::Interner;
use facet_transaction::DataTransactionResult;
use std::any::Any;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, warn};

/// Failure reported by a host while writing or removing a facet
///
/// Returning this from a setter or remover marks the write as possibly
/// incomplete. Use `Ok(false)` for ordinary rejections.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProviderError {
    /// Some of the host's fields were written before the failure
    #[error("partial write: {0}")]
    PartialWrite(String),

    /// The host's backing storage failed
    #[error("storage failure: {0}")]
    Storage(String),
}

pub(crate) type Getter<T, H> = Box<dyn Fn(&H) -> Option<T> + Send + Sync>;
pub(crate) type Setter<T, H> = Box<dyn Fn(&mut H, T) -> Result<bool, ProviderError> + Send + Sync>;
pub(crate) type Remover<H> = Box<dyn Fn(&mut H) -> Result<bool, ProviderError> + Send + Sync>;
pub(crate) type Predicate<H> = Box<dyn Fn(&H) -> bool + Send + Sync>;
pub(crate) type Constructor<T> = Box<dyn Fn(&Key<T>, T) -> Value<T> + Send + Sync>;

/// Settings a write runs with
#[derive(Debug, Clone, Copy)]
pub struct WriteContext<'a> {
    /// Intern view for values attached to results
    pub interner: Interner<'a>,
    /// Report `success_no_data` without calling the setter when the host
    /// already holds the offered value
    pub skip_unchanged: bool,
}

impl<'a> WriteContext<'a> {
    /// Context with the given intern view and change detection
    pub fn new(interner: Interner<'a>, skip_unchanged: bool) -> Self {
        WriteContext {
            interner,
            skip_unchanged,
        }
    }
}

/// Binding of a `Key<T>` to host type `H`
pub struct Provider<T: DataType, H: 'static> {
    pub(crate) key: Key<T>,
    pub(crate) getter: Getter<T, H>,
    pub(crate) setter: Option<Setter<T, H>>,
    pub(crate) remover: Option<Remover<H>>,
    pub(crate) reset_value: Option<T>,
    pub(crate) predicate: Option<Predicate<H>>,
    pub(crate) bounds: Option<Bounds<T>>,
    pub(crate) default: Option<T>,
    pub(crate) constructor: Option<Constructor<T>>,
}

impl<T: DataType, H: 'static> Provider<T, H> {
    /// Key this provider serves
    pub fn key(&self) -> &Key<T> {
        &self.key
    }

    /// Declared bounds
    pub fn bounds(&self) -> Option<&Bounds<T>> {
        self.bounds.as_ref()
    }

    /// Declared default datum
    pub fn default_value(&self) -> Option<&T> {
        self.default.as_ref()
    }

    /// Whether a setter is bound
    pub fn is_writable(&self) -> bool {
        self.setter.is_some()
    }

    /// Whether this provider applies to `host`
    pub fn supports(&self, host: &H) -> bool {
        self.predicate.as_ref().map_or(true, |predicate| predicate(host))
    }

    /// Current datum on `host`, if any
    ///
    /// Does not consult the predicate; dispatch has already done so.
    pub fn get(&self, host: &H) -> Option<T> {
        (self.getter)(host)
    }

    /// Write `data` to `host`
    ///
    /// Returns `Ok(false)` when the data lie outside the bounds, when no
    /// setter is bound, or when the host refuses the value.
    pub fn set(&self, host: &mut H, data: T) -> Result<bool, ProviderError> {
        if let Some(bounds) = &self.bounds {
            if !bounds.contains(&data) {
                return Ok(false);
            }
        }
        match &self.setter {
            Some(setter) => setter(host, data),
            None => Ok(false),
        }
    }

    fn default_for(&self, data: &T) -> T {
        self.default.clone().unwrap_or_else(|| data.clone())
    }

    /// Mutable value for `data`
    ///
    /// Fails when the provider is bounded and `data` lies outside the bounds.
    pub fn construct_value(&self, data: T) -> Result<Value<T>, ValueError> {
        if let Some(constructor) = &self.constructor {
            return Ok(constructor(&self.key, data));
        }
        let default = self.default_for(&data);
        match &self.bounds {
            Some(bounds) => Value::bounded(self.key.clone(), default, data, bounds.clone()),
            None => Ok(Value::new(self.key.clone(), default, data)),
        }
    }

    /// Interned immutable value for `data`
    pub fn construct_immutable(
        &self,
        data: T,
        interner: &Interner<'_>,
    ) -> Result<ImmutableValue<T>, ValueError> {
        if let Some(constructor) = &self.constructor {
            return Ok(interner.intern_value(constructor(&self.key, data).as_immutable()));
        }
        let default = self.default_for(&data);
        match &self.bounds {
            Some(bounds) => interner.intern_bounded(&self.key, default, data, bounds.clone()),
            None => Ok(interner.intern(&self.key, default, data)),
        }
    }

    /// Mutable value for data read from a host
    ///
    /// A host may hold data its provider would not accept. Such data are
    /// returned without bounds rather than hidden.
    pub(crate) fn value_of(&self, data: T) -> Value<T> {
        match self.construct_value(data.clone()) {
            Ok(value) => value,
            Err(err) => {
                warn!(key = %self.key.id(), error = %err, "host holds an invalid value");
                Value::new(self.key.clone(), self.default_for(&data), data)
            }
        }
    }

    /// Immutable value for recording in a transaction result
    pub(crate) fn record(&self, data: T, interner: &Interner<'_>) -> ImmutableValue<T> {
        match self.construct_immutable(data.clone(), interner) {
            Ok(value) => value,
            Err(_) => ImmutableValue::new(self.key.clone(), self.default_for(&data), data),
        }
    }

    /// Offer `data` to `host`
    pub fn offer(&self, host: &mut H, data: T, ctx: &WriteContext<'_>) -> DataTransactionResult {
        if !self.supports(host) {
            return DataTransactionResult::fail_no_data();
        }
        let new = match self.construct_immutable(data.clone(), &ctx.interner) {
            Ok(value) => value,
            Err(err) => {
                debug!(key = %self.key.id(), error = %err, "rejected offer");
                return DataTransactionResult::fail_result(self.record(data, &ctx.interner));
            }
        };
        let old = self.get(host).map(|old| self.record(old, &ctx.interner));
        if ctx.skip_unchanged && old.as_ref() == Some(&new) {
            return DataTransactionResult::success_no_data();
        }

        match self.set(host, data) {
            Ok(true) => match old {
                Some(old) => DataTransactionResult::success_replace(old, new),
                None => DataTransactionResult::success_result(new),
            },
            Ok(false) => DataTransactionResult::fail_result(new),
            Err(err) => {
                warn!(key = %self.key.id(), error = %err, "write left host inconsistent");
                DataTransactionResult::error_result(new)
            }
        }
    }

    /// Remove the facet from `host`
    ///
    /// With a reset value, removal writes that value instead. Without a
    /// remover or reset value the facet cannot be removed and the result is
    /// `fail_no_data`.
    pub fn remove(&self, host: &mut H, ctx: &WriteContext<'_>) -> DataTransactionResult {
        if !self.supports(host) {
            return DataTransactionResult::fail_no_data();
        }
        if let Some(reset) = &self.reset_value {
            return self.reset(host, reset.clone(), ctx);
        }
        let Some(remover) = &self.remover else {
            return DataTransactionResult::fail_no_data();
        };
        let Some(old) = self.get(host).map(|old| self.record(old, &ctx.interner)) else {
            return DataTransactionResult::success_no_data();
        };

        match remover(host) {
            Ok(true) => DataTransactionResult::success_remove(old),
            Ok(false) => DataTransactionResult::fail_no_data(),
            Err(err) => {
                warn!(key = %self.key.id(), error = %err, "removal left host inconsistent");
                DataTransactionResult::error_result(old)
            }
        }
    }

    fn reset(&self, host: &mut H, reset: T, ctx: &WriteContext<'_>) -> DataTransactionResult {
        let Some(old) = self.get(host).map(|old| self.record(old, &ctx.interner)) else {
            return DataTransactionResult::success_no_data();
        };
        let new = self.record(reset.clone(), &ctx.interner);
        if old == new {
            return DataTransactionResult::success_no_data();
        }

        match self.set(host, reset) {
            Ok(true) => DataTransactionResult::success_replace(old, new),
            Ok(false) => DataTransactionResult::fail_no_data(),
            Err(err) => {
                warn!(key = %self.key.id(), error = %err, "reset left host inconsistent");
                DataTransactionResult::error_result(new)
            }
        }
    }
}

impl<T: DataType, H: 'static> fmt::Debug for Provider<T, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Provider")
            .field("key", &self.key)
            .field("host", &std::any::type_name::<H>())
            .field("writable", &self.setter.is_some())
            .field("bounds", &self.bounds)
            .finish()
    }
}

// ============================================================================
// Type erasure
// ============================================================================

/// Object-safe view of a [`Provider`]
///
/// Lets the registry hold providers of every key and host type in one table
/// and serve bulk operations that only know a key id.
pub trait ErasedProvider: Send + Sync + 'static {
    /// Descriptor of the served key
    fn key(&self) -> &Arc<KeyDescriptor>;

    /// Host type the provider is bound to
    fn host_type(&self) -> TypeToken;

    /// Datum type
    fn value_type(&self) -> TypeToken;

    /// Concrete provider, for typed recovery
    fn as_any(&self) -> &dyn Any;

    /// Whether `host` is of the bound host type
    fn binds(&self, host: &dyn Any) -> bool;

    /// Whether the provider applies to `host`
    fn supports_host(&self, host: &dyn Any) -> bool;

    /// Current value on `host`
    fn get_any(&self, host: &dyn Any, interner: &Interner<'_>) -> Option<AnyValue>;

    /// Offer an erased value to `host`
    ///
    /// A value whose datum is not of the provider's type is rejected.
    fn offer_any(
        &self,
        host: &mut dyn Any,
        value: &AnyValue,
        ctx: &WriteContext<'_>,
    ) -> DataTransactionResult;

    /// Remove the facet from `host`
    fn remove_any(&self, host: &mut dyn Any, ctx: &WriteContext<'_>) -> DataTransactionResult;
}

impl<T: DataType, H: 'static> ErasedProvider for Provider<T, H> {
    fn key(&self) -> &Arc<KeyDescriptor> {
        self.key.descriptor()
    }

    fn host_type(&self) -> TypeToken {
        TypeToken::of::<H>()
    }

    fn value_type(&self) -> TypeToken {
        TypeToken::of::<T>()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn binds(&self, host: &dyn Any) -> bool {
        host.is::<H>()
    }

    fn supports_host(&self, host: &dyn Any) -> bool {
        host.downcast_ref::<H>()
            .map_or(false, |host| self.supports(host))
    }

    fn get_any(&self, host: &dyn Any, interner: &Interner<'_>) -> Option<AnyValue> {
        let host = host.downcast_ref::<H>()?;
        self.get(host).map(|data| self.record(data, interner).erase())
    }

    fn offer_any(
        &self,
        host: &mut dyn Any,
        value: &AnyValue,
        ctx: &WriteContext<'_>,
    ) -> DataTransactionResult {
        let Some(host) = host.downcast_mut::<H>() else {
            return DataTransactionResult::fail_no_data();
        };
        match value.get::<T>() {
            Some(data) => self.offer(host, data.clone(), ctx),
            None => DataTransactionResult::fail_result(value.clone()),
        }
    }

    fn remove_any(&self, host: &mut dyn Any, ctx: &WriteContext<'_>) -> DataTransactionResult {
        match host.downcast_mut::<H>() {
            Some(host) => self.remove(host, ctx),
            None => DataTransactionResult::fail_no_data(),
        }
    }
}
