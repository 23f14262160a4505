//! Engine configuration via `facet.toml`
//!
//! A default `facet.toml` is written next to the application's data on first
//! use. Edit the file to change settings; [`DataEngine::update_config`]
//! applies changes to a running engine.
//!
//! [`DataEngine::update_config`]: crate::DataEngine::update_config

use facet_intern::CachePolicy;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Config file name placed in the application's data directory.
pub const CONFIG_FILE_NAME: &str = "facet.toml";

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read or written
    #[error("Failed to access config file '{path}': {source}")]
    Io {
        /// File path
        path: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// The file is not valid TOML for [`DataConfig`]
    #[error("Failed to parse config file '{path}': {source}")]
    Parse {
        /// File path
        path: PathBuf,
        /// Underlying parse error
        source: toml::de::Error,
    },

    /// The config could not be serialized
    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Immutable value cache settings (`[cache]`)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CacheConfig {
    /// Intern immutable values built by providers.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Also intern list, set and map values.
    #[serde(default)]
    pub intern_collections: bool,
}

impl CacheConfig {
    /// Interning policy these settings describe
    pub fn policy(&self) -> CachePolicy {
        CachePolicy {
            enabled: self.enabled,
            intern_collections: self.intern_collections,
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            intern_collections: false,
        }
    }
}

/// Provider registration settings (`[dispatch]`)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DispatchConfig {
    /// Reject providers whose value type disagrees with the key registry.
    /// When false, such providers are kept and a warning is logged.
    #[serde(default = "default_true")]
    pub strict_value_types: bool,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            strict_value_types: true,
        }
    }
}

/// Write settings (`[transaction]`)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TransactionConfig {
    /// Writing the value a host already holds reports `success_no_data`
    /// without calling the setter.
    #[serde(default = "default_true")]
    pub skip_unchanged: bool,
}

impl Default for TransactionConfig {
    fn default() -> Self {
        Self {
            skip_unchanged: true,
        }
    }
}

fn default_true() -> bool {
    true
}

/// Engine configuration loaded from `facet.toml`.
///
/// # Example
///
/// ```toml
/// [cache]
/// enabled = true
/// intern_collections = false
///
/// [dispatch]
/// strict_value_types = true
///
/// [transaction]
/// skip_unchanged = true
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct DataConfig {
    /// `[cache]` section
    #[serde(default)]
    pub cache: CacheConfig,
    /// `[dispatch]` section
    #[serde(default)]
    pub dispatch: DispatchConfig,
    /// `[transaction]` section
    #[serde(default)]
    pub transaction: TransactionConfig,
}

impl DataConfig {
    /// Returns the default config file content with comments.
    pub fn default_toml() -> &'static str {
        r#"# Facet data configuration

[cache]
# Intern immutable values so that hosts sharing a value share one instance
# (default: true)
enabled = true
# Also intern list, set and map values (default: false)
intern_collections = false

[dispatch]
# Reject providers whose value type disagrees with the key registry
# (default: true). When false, such providers are kept with a warning and
# typed lookups for the key's declared type pass over them.
strict_value_types = true

[transaction]
# Writing the value a host already holds is reported as success with no data
# and the setter is not called (default: true)
skip_unchanged = true
"#
    }

    /// Read and parse config from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Write the default config file if it does not already exist.
    ///
    /// Returns `Ok(())` whether the file was created or already existed.
    pub fn write_default_if_missing(path: &Path) -> Result<(), ConfigError> {
        if !path.exists() {
            std::fs::write(path, Self::default_toml()).map_err(|source| ConfigError::Io {
                path: path.to_path_buf(),
                source,
            })?;
        }
        Ok(())
    }

    /// Load `facet.toml` from `dir`, creating it with defaults if missing.
    pub fn load_or_create(dir: &Path) -> Result<Self, ConfigError> {
        let path = dir.join(CONFIG_FILE_NAME);
        Self::write_default_if_missing(&path)?;
        Self::from_file(&path)
    }

    /// Serialize this config to TOML and write it to the given path.
    pub fn write_to_file(&self, path: &Path) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}
