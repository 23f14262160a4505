//! Merge functions
//!
//! When a whole [`Manipulator`] is offered to a host, a merge function first
//! reconciles it with the values the host already holds for the same keys.
//! The result is the bundle that is actually written. Merge functions are
//! pure: they see only the two bundles, never the host.

use crate::manipulator::Manipulator;
use crate::value::AnyValue;

/// Strategy for reconciling an incoming bundle with existing values
///
/// Closures of the form `Fn(Option<&Manipulator>, Manipulator) -> Manipulator`
/// implement this trait.
pub trait MergeFunction: Send + Sync {
    /// Produce the bundle to write
    ///
    /// `original` is `None` when the host holds none of the offered keys.
    fn merge(&self, original: Option<&Manipulator>, replacement: Manipulator) -> Manipulator;
}

impl<F> MergeFunction for F
where
    F: Fn(Option<&Manipulator>, Manipulator) -> Manipulator + Send + Sync,
{
    fn merge(&self, original: Option<&Manipulator>, replacement: Manipulator) -> Manipulator {
        self(original, replacement)
    }
}

/// Standard merge strategies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MergeStrategy {
    /// Write the replacement verbatim
    #[default]
    Replace,
    /// Keep the original untouched; the replacement is a no-op
    IgnoreAll,
    /// Union of both bundles, replacement wins on overlapping keys
    MergeFavorNew,
    /// Union of both bundles, original wins on overlapping keys
    MergeFavorOriginal,
}

impl MergeStrategy {
    /// Reconcile a single key
    ///
    /// Returns the value to keep, or `None` if neither side has one.
    pub fn merge_value(&self, original: Option<&AnyValue>, replacement: Option<&AnyValue>) -> Option<AnyValue> {
        match self {
            MergeStrategy::Replace => replacement.cloned(),
            MergeStrategy::IgnoreAll => original.cloned(),
            MergeStrategy::MergeFavorNew => replacement.or(original).cloned(),
            MergeStrategy::MergeFavorOriginal => original.or(replacement).cloned(),
        }
    }
}

impl MergeFunction for MergeStrategy {
    fn merge(&self, original: Option<&Manipulator>, replacement: Manipulator) -> Manipulator {
        match (self, original) {
            (MergeStrategy::Replace, _) => replacement,
            (MergeStrategy::IgnoreAll, original) => original.cloned().unwrap_or_default(),
            (MergeStrategy::MergeFavorNew | MergeStrategy::MergeFavorOriginal, None) => replacement,
            (MergeStrategy::MergeFavorNew, Some(original)) => {
                let mut merged = original.clone();
                merged.extend(replacement);
                merged
            }
            (MergeStrategy::MergeFavorOriginal, Some(original)) => {
                let mut merged = replacement;
                merged.extend(original.values().cloned());
                merged
            }
        }
    }
}
