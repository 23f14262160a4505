//! Interning of immutable facet values
//!
//! Immutable values with the same key, default and current data are
//! interchangeable. [`ValueCache`] hands out one shared instance per distinct
//! triple. Callers must rely on logical equality only; sharing is an
//! optimization the cache may skip.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod cache;

pub use cache::{CachePolicy, CacheStats, Interner, ValueCache};
