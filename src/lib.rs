//! Facet data - typed facets for heterogeneous host objects
//!
//! Independently developed modules register keys and bind them to host
//! types; callers then read and write any facet on any host through one
//! [`DataEngine`].
//!
//! # Quick Start
//!
//! ```ignore
//! use facet_data::prelude::*;
//!
//! let cooldown: Key<i32> = Key::bounded(KeyId::from_static("demo:cooldown"));
//!
//! let mut builder = ProviderRegistry::builder();
//! builder
//!     .register::<Hopper>()
//!     .create(&cooldown)
//!     .get(|hopper| hopper.cooldown)
//!     .set(|hopper, value| { hopper.cooldown = Some(value); true })
//!     .bounds(1, i32::MAX)
//!     .default_value(8)
//!     .build();
//! let engine = DataEngine::new(builder.build()?);
//!
//! let result = engine.offer(&mut hopper, &cooldown, 0);
//! assert_eq!(result.status(), TransactionStatus::Failure);
//! ```
//!
//! # Architecture
//!
//! - `facet-core`: keys, the value model, bundles and merge functions
//! - `facet-transaction`: transaction results and undo planning
//! - `facet-intern`: the immutable value intern table
//! - `facet-engine`: providers, dispatch and the engine

pub use facet_core::*;
pub use facet_engine::{
    CacheConfig, ConfigError, DataConfig, DataEngine, Dispatch, DispatchConfig, ErasedProvider,
    HostRegistrator, Lookup, Provider, ProviderBuilder, ProviderError, ProviderRegistry,
    RegistryBuilder, TransactionConfig, Unsupported, WriteContext, CONFIG_FILE_NAME,
};
pub use facet_intern::{CachePolicy, CacheStats, Interner, ValueCache};
pub use facet_transaction::{
    DataTransactionResult, DataTransactionResultBuilder, TransactionStatus, UndoPlan,
};

/// Commonly used items
pub mod prelude {
    pub use facet_core::{
        AnyValue, Bounds, ImmutableValue, Key, KeyId, KeyRegistry, Manipulator, MergeFunction,
        MergeStrategy, Value,
    };
    pub use facet_engine::{DataConfig, DataEngine, Dispatch, Lookup, ProviderRegistry, Unsupported};
    pub use facet_transaction::{DataTransactionResult, TransactionStatus};
}
