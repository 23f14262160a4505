//! Core types for facet data
//!
//! This crate defines the foundational types used throughout the system:
//! - KeyId: Namespaced key identifier
//! - Key: Typed key handle with a shape (plain, bounded, list, set, map)
//! - KeyRegistry: Process-wide catalog of keys
//! - Value / ImmutableValue / AnyValue: The value model
//! - Manipulator: Bundle of values offered or read together
//! - MergeFunction: Reconciles an offered bundle with existing values
//! - Error: Error type hierarchy

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod key;
pub mod manipulator;
pub mod merge;
pub mod registry;
pub mod types;
pub mod value;

pub use error::{Error, RegistryError, Result, ValueError};
pub use key::{KeyError, KeyId};
pub use manipulator::Manipulator;
pub use merge::{MergeFunction, MergeStrategy};
pub use registry::{KeyRegistry, KeyRegistryBuilder};
pub use types::{DataType, Key, KeyDescriptor, KeyShape, TypeToken};
pub use value::{AnyValue, Bounds, Comparator, ElementCollection, ImmutableValue, Value};
