//! Key identifiers
//!
//! Every facet key is named by a namespaced identifier of the form
//! `namespace:path`, e.g. `minecraft:cooldown` or `banner:patterns`.
//!
//! ## Rules
//!
//! - The identifier must not be empty
//! - Exactly one `:` separates namespace and path
//! - Namespace characters: `a-z`, `0-9`, `_`, `-`, `.`
//! - Path characters: the namespace set plus `/`
//! - Total length must not exceed [`MAX_KEY_ID_LEN`] bytes

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use thiserror::Error;

/// Maximum length of a key identifier in bytes
pub const MAX_KEY_ID_LEN: usize = 256;

/// Separator between namespace and path
pub const NAMESPACE_SEPARATOR: char = ':';

/// Namespaced identifier of a facet key
///
/// Cloning is cheap: the text is shared behind an `Arc`.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct KeyId {
    full: Arc<str>,
    split: usize,
}

impl KeyId {
    /// Parse and validate an identifier
    ///
    /// # Examples
    ///
    /// ```
    /// use facet_core::key::KeyId;
    ///
    /// let id = KeyId::parse("minecraft:cooldown").unwrap();
    /// assert_eq!(id.namespace(), "minecraft");
    /// assert_eq!(id.path(), "cooldown");
    ///
    /// assert!(KeyId::parse("cooldown").is_err()); // no namespace
    /// assert!(KeyId::parse("Minecraft:Cooldown").is_err()); // uppercase
    /// ```
    pub fn parse(text: &str) -> Result<Self, KeyError> {
        let split = validate_key_id(text)?;
        Ok(KeyId {
            full: Arc::from(text),
            split,
        })
    }

    /// Build an identifier from its two halves
    pub fn new(namespace: &str, path: &str) -> Result<Self, KeyError> {
        Self::parse(&format!("{namespace}{NAMESPACE_SEPARATOR}{path}"))
    }

    /// Build an identifier from a literal
    ///
    /// # Panics
    ///
    /// Panics if `text` is not a valid identifier. Intended for keys declared
    /// as constants at startup, where a malformed literal is a programming error.
    pub fn from_static(text: &'static str) -> Self {
        match Self::parse(text) {
            Ok(id) => id,
            Err(e) => panic!("invalid key id {text:?}: {e}"),
        }
    }

    /// The namespace half (before `:`)
    pub fn namespace(&self) -> &str {
        &self.full[..self.split]
    }

    /// The path half (after `:`)
    pub fn path(&self) -> &str {
        &self.full[self.split + 1..]
    }

    /// The full identifier text
    pub fn as_str(&self) -> &str {
        &self.full
    }
}

impl fmt::Display for KeyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.full)
    }
}

impl fmt::Debug for KeyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "KeyId({})", self.full)
    }
}

impl FromStr for KeyId {
    type Err = KeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        KeyId::parse(s)
    }
}

impl TryFrom<&str> for KeyId {
    type Error = KeyError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        KeyId::parse(value)
    }
}

/// Validate an identifier, returning the byte offset of the separator
fn validate_key_id(text: &str) -> Result<usize, KeyError> {
    if text.is_empty() {
        return Err(KeyError::Empty);
    }

    if text.len() > MAX_KEY_ID_LEN {
        return Err(KeyError::TooLong {
            actual: text.len(),
            max: MAX_KEY_ID_LEN,
        });
    }

    let split = text
        .find(NAMESPACE_SEPARATOR)
        .ok_or(KeyError::MissingSeparator)?;
    let (namespace, path) = (&text[..split], &text[split + 1..]);

    if namespace.is_empty() {
        return Err(KeyError::EmptyNamespace);
    }
    if path.is_empty() {
        return Err(KeyError::EmptyPath);
    }

    for (position, ch) in namespace.char_indices() {
        if !is_namespace_char(ch) {
            return Err(KeyError::InvalidCharacter { ch, position });
        }
    }
    for (offset, ch) in path.char_indices() {
        if !(is_namespace_char(ch) || ch == '/') {
            return Err(KeyError::InvalidCharacter {
                ch,
                position: split + 1 + offset,
            });
        }
    }

    Ok(split)
}

fn is_namespace_char(ch: char) -> bool {
    matches!(ch, 'a'..='z' | '0'..='9' | '_' | '-' | '.')
}

/// Key identifier validation errors
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum KeyError {
    /// Identifier is empty
    #[error("Key id cannot be empty")]
    Empty,

    /// Identifier has no `namespace:` prefix
    #[error("Key id must have the form 'namespace:path'")]
    MissingSeparator,

    /// Namespace half is empty
    #[error("Key id namespace cannot be empty")]
    EmptyNamespace,

    /// Path half is empty
    #[error("Key id path cannot be empty")]
    EmptyPath,

    /// Character outside the allowed set
    #[error("Invalid character {ch:?} at position {position} in key id")]
    InvalidCharacter {
        /// Offending character
        ch: char,
        /// Byte offset of the character
        position: usize,
    },

    /// Identifier exceeds maximum length
    #[error("Key id too long: {actual} bytes exceeds maximum {max}")]
    TooLong {
        /// Actual length in bytes
        actual: usize,
        /// Maximum allowed length
        max: usize,
    },
}
