//! Transaction results
//!
//! Every mutating operation on a host (offer, remove, undo, bulk offers)
//! returns a [`DataTransactionResult`] describing its effect:
//!
//! - `successful`: values now held by the host
//! - `replaced`: values the host held before the operation
//! - `rejected`: values the host refused
//!
//! plus a terminal [`TransactionStatus`]. Results are created fresh per
//! operation and never mutated once returned; composition with
//! [`DataTransactionResult::absorb`] produces a new result.
//!
//! ## Invariants
//!
//! - Each of the three lists holds at most one value per key
//! - `Error` status is reserved for writes that may have left the host
//!   inconsistent; ordinary validation failures are `Failure`

use crate::builder::DataTransactionResultBuilder;
use facet_core::{AnyValue, DataType, ImmutableValue, Key, KeyId};
use smallvec::SmallVec;
use std::fmt;

/// Inline storage for the value lists; most results hold one or two values
pub(crate) type ValueList = SmallVec<[AnyValue; 2]>;

/// Terminal status of a transaction
///
/// Variants are ordered by severity: `Success < Failure < Error`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TransactionStatus {
    /// The operation completed (possibly with no observable change)
    Success,
    /// The host rejected the operation; host state is unchanged
    Failure,
    /// The operation failed part way; host state may be inconsistent
    Error,
}

impl TransactionStatus {
    /// The more severe of two statuses
    pub fn combine(self, other: TransactionStatus) -> TransactionStatus {
        self.max(other)
    }

    /// Whether this is `Success`
    pub fn is_success(&self) -> bool {
        matches!(self, TransactionStatus::Success)
    }
}

impl fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TransactionStatus::Success => "SUCCESS",
            TransactionStatus::Failure => "FAILURE",
            TransactionStatus::Error => "ERROR",
        };
        f.write_str(name)
    }
}

/// Outcome of a mutating operation
#[derive(Clone)]
pub struct DataTransactionResult {
    pub(crate) status: TransactionStatus,
    pub(crate) successful: ValueList,
    pub(crate) replaced: ValueList,
    pub(crate) rejected: ValueList,
}

impl DataTransactionResult {
    pub(crate) fn empty(status: TransactionStatus) -> Self {
        DataTransactionResult {
            status,
            successful: ValueList::new(),
            replaced: ValueList::new(),
            rejected: ValueList::new(),
        }
    }

    /// Start building a result
    pub fn builder() -> DataTransactionResultBuilder {
        DataTransactionResultBuilder::new()
    }

    // ========================================================================
    // Constructors
    // ========================================================================

    /// Success with no observable change
    ///
    /// Used when a value is set to what it already was, or when a key with
    /// no value is removed.
    pub fn success_no_data() -> Self {
        Self::empty(TransactionStatus::Success)
    }

    /// Success that added `value` where the host held nothing before
    pub fn success_result(value: impl Into<AnyValue>) -> Self {
        let mut result = Self::empty(TransactionStatus::Success);
        result.successful.push(value.into());
        result
    }

    /// Success that replaced `old` with `new`
    pub fn success_replace(old: impl Into<AnyValue>, new: impl Into<AnyValue>) -> Self {
        let mut result = Self::empty(TransactionStatus::Success);
        result.successful.push(new.into());
        result.replaced.push(old.into());
        result
    }

    /// Success that removed `old`
    pub fn success_remove(old: impl Into<AnyValue>) -> Self {
        let mut result = Self::empty(TransactionStatus::Success);
        result.replaced.push(old.into());
        result
    }

    /// Failure rejecting `rejected`
    pub fn fail<I>(rejected: I) -> Self
    where
        I: IntoIterator<Item = AnyValue>,
    {
        let mut result = Self::empty(TransactionStatus::Failure);
        for value in rejected {
            upsert(&mut result.rejected, value);
        }
        result
    }

    /// Failure rejecting a single value
    pub fn fail_result(value: impl Into<AnyValue>) -> Self {
        Self::fail(std::iter::once(value.into()))
    }

    /// Failure with nothing to report
    ///
    /// Used when the key does not apply to the host at all.
    pub fn fail_no_data() -> Self {
        Self::empty(TransactionStatus::Failure)
    }

    /// Error with nothing to report
    pub fn error() -> Self {
        Self::empty(TransactionStatus::Error)
    }

    /// Error while writing `value`
    pub fn error_result(value: impl Into<AnyValue>) -> Self {
        let mut result = Self::empty(TransactionStatus::Error);
        result.rejected.push(value.into());
        result
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Terminal status
    pub fn status(&self) -> TransactionStatus {
        self.status
    }

    /// Values now held by the host
    pub fn successful(&self) -> &[AnyValue] {
        &self.successful
    }

    /// Values the host held before
    pub fn replaced(&self) -> &[AnyValue] {
        &self.replaced
    }

    /// Values the host refused
    pub fn rejected(&self) -> &[AnyValue] {
        &self.rejected
    }

    /// Whether the status is `Success`
    pub fn is_successful(&self) -> bool {
        self.status.is_success()
    }

    /// Whether this is a success that changed nothing
    pub fn is_no_data(&self) -> bool {
        self.status.is_success() && self.is_empty()
    }

    /// Whether all three lists are empty
    pub fn is_empty(&self) -> bool {
        self.successful.is_empty() && self.replaced.is_empty() && self.rejected.is_empty()
    }

    /// Successful value for `key`
    pub fn successful_value<T: DataType>(&self, key: &Key<T>) -> Option<ImmutableValue<T>> {
        find(&self.successful, key.id()).and_then(AnyValue::downcast::<T>)
    }

    /// Replaced value for `key`
    pub fn replaced_value<T: DataType>(&self, key: &Key<T>) -> Option<ImmutableValue<T>> {
        find(&self.replaced, key.id()).and_then(AnyValue::downcast::<T>)
    }

    /// Rejected value for `key`
    pub fn rejected_value<T: DataType>(&self, key: &Key<T>) -> Option<ImmutableValue<T>> {
        find(&self.rejected, key.id()).and_then(AnyValue::downcast::<T>)
    }

    // ========================================================================
    // Composition
    // ========================================================================

    /// Fold `other` into this result
    ///
    /// Unions each list and keeps the more severe status
    /// (`Error > Failure > Success`). Callers are expected not to absorb two
    /// writes of the same key; if they do, the later value wins so that each
    /// list still holds one value per key.
    pub fn absorb(mut self, other: DataTransactionResult) -> DataTransactionResult {
        self.status = self.status.combine(other.status);
        for value in other.successful {
            upsert(&mut self.successful, value);
        }
        for value in other.replaced {
            upsert(&mut self.replaced, value);
        }
        for value in other.rejected {
            upsert(&mut self.rejected, value);
        }
        self
    }

    /// Fold a sequence of results, starting from `success_no_data`
    pub fn absorb_all<I>(results: I) -> DataTransactionResult
    where
        I: IntoIterator<Item = DataTransactionResult>,
    {
        results
            .into_iter()
            .fold(Self::success_no_data(), DataTransactionResult::absorb)
    }
}

/// Insert `value`, replacing any value with the same key
pub(crate) fn upsert(list: &mut ValueList, value: AnyValue) {
    match list.iter_mut().find(|v| v.key_id() == value.key_id()) {
        Some(slot) => *slot = value,
        None => list.push(value),
    }
}

fn find<'a>(list: &'a [AnyValue], id: &KeyId) -> Option<&'a AnyValue> {
    list.iter().find(|v| v.key_id() == id)
}

fn same_members(a: &[AnyValue], b: &[AnyValue]) -> bool {
    a.len() == b.len() && a.iter().all(|v| b.contains(v))
}

// Lists are sets: equality ignores order.
impl PartialEq for DataTransactionResult {
    fn eq(&self, other: &Self) -> bool {
        self.status == other.status
            && same_members(&self.successful, &other.successful)
            && same_members(&self.replaced, &other.replaced)
            && same_members(&self.rejected, &other.rejected)
    }
}

impl Eq for DataTransactionResult {}

impl fmt::Debug for DataTransactionResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DataTransactionResult")
            .field("status", &self.status)
            .field("successful", &self.successful.as_slice())
            .field("replaced", &self.replaced.as_slice())
            .field("rejected", &self.rejected.as_slice())
            .finish()
    }
}
