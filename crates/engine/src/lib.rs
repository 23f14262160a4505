//! Provider dispatch and the data engine
//!
//! This crate binds keys to host types and executes reads and writes:
//! - Provider: Getter, setter and construction rules for one key on one host type
//! - RegistryBuilder: Startup-time registration of providers
//! - ProviderRegistry: Frozen dispatch table (first registered applicable provider wins)
//! - DataEngine: get / offer / remove / undo and bulk operations on hosts
//! - DataConfig: Settings loaded from `facet.toml`

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod engine;
pub mod provider;
pub mod registry;

pub use config::{
    CacheConfig, ConfigError, DataConfig, DispatchConfig, TransactionConfig, CONFIG_FILE_NAME,
};
pub use engine::{DataEngine, Lookup};
pub use provider::builder::{HostRegistrator, ProviderBuilder, RegistryBuilder};
pub use provider::{ErasedProvider, Provider, ProviderError, WriteContext};
pub use registry::{Dispatch, ProviderRegistry, Unsupported};
