//! Error types for facet data
//!
//! Domain outcomes (a key that does not apply to a host, a host with no
//! value, a host that rejects a write) are never errors: they are reported
//! through `Option` and transaction results. The types here cover value
//! validation and programmer errors raised while building registries.
//! We use `thiserror` for automatic `Display` and `Error` trait implementations.

use crate::key::{KeyError, KeyId};
use thiserror::Error;

/// Result type alias for facet operations
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum Error {
    /// Malformed key identifier
    #[error(transparent)]
    Key(#[from] KeyError),

    /// Value failed validation
    #[error(transparent)]
    Value(#[from] ValueError),

    /// Registry construction failed
    #[error(transparent)]
    Registry(#[from] RegistryError),
}

/// Value validation errors
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValueError {
    /// A bounded value was given a datum outside `[min, max]`
    #[error("Value {value} for key {key} is outside bounds [{min}, {max}]")]
    OutOfBounds {
        /// Key of the rejected value
        key: KeyId,
        /// Rejected datum (debug rendering)
        value: String,
        /// Lower bound (debug rendering)
        min: String,
        /// Upper bound (debug rendering)
        max: String,
    },

    /// Bounds were declared with `min > max`
    #[error("Inverted bounds: minimum {min} is greater than maximum {max}")]
    InvertedBounds {
        /// Lower bound (debug rendering)
        min: String,
        /// Upper bound (debug rendering)
        max: String,
    },

    /// Bounds were attached to a key that is not bounded
    #[error("Key {key} has shape {shape} and cannot carry bounds")]
    NotBounded {
        /// Key id
        key: KeyId,
        /// Actual shape of the key
        shape: &'static str,
    },

    /// A type-erased value did not have the expected type
    #[error("Type mismatch for key {key}: expected {expected}, found {found}")]
    TypeMismatch {
        /// Key id
        key: KeyId,
        /// Expected type name
        expected: &'static str,
        /// Actual type name
        found: &'static str,
    },

    /// List index past the end
    #[error("Index {index} out of range for list {key} of length {len}")]
    IndexOutOfRange {
        /// Key id
        key: KeyId,
        /// Requested index
        index: usize,
        /// List length
        len: usize,
    },
}

/// Registry construction errors
///
/// These are programmer errors: they are raised while the registries are
/// built at startup and should abort initialization.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RegistryError {
    /// Two keys were registered under the same id
    #[error("Duplicate key registration: {0}")]
    DuplicateKey(KeyId),

    /// A provider was bound to a key the key registry does not know
    #[error("Unknown key: {0}")]
    UnknownKey(KeyId),

    /// A provider's value type disagrees with its key
    #[error("Provider for key {key} on host {host} has value type {found}, key declares {expected}")]
    KeyTypeMismatch {
        /// Key id
        key: KeyId,
        /// Host type name
        host: &'static str,
        /// Type declared by the key
        expected: &'static str,
        /// Type the provider handles
        found: &'static str,
    },

    /// A provider was built without a getter
    #[error("Provider for key {key} on host {host} has no getter")]
    MissingGetter {
        /// Key id
        key: KeyId,
        /// Host type name
        host: &'static str,
    },

    /// A provider for a bounded key declared no bounds
    #[error("Provider for bounded key {key} on host {host} declares no bounds")]
    MissingBounds {
        /// Key id
        key: KeyId,
        /// Host type name
        host: &'static str,
    },

    /// A provider declared invalid bounds
    #[error("Provider for key {key} on host {host}: {source}")]
    InvalidProvider {
        /// Key id
        key: KeyId,
        /// Host type name
        host: &'static str,
        /// Underlying validation failure
        source: ValueError,
    },

    /// A process-wide registry was installed twice
    #[error("{0} registry is already installed")]
    AlreadyInstalled(&'static str),
}
