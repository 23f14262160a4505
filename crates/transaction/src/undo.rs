//! Undo planning
//!
//! The inverse of a successful transaction is derived from its own record:
//!
//! - every `replaced` value is written back
//! - every key that appears in `successful` but not in `replaced` was newly
//!   added by the transaction and is removed again
//!
//! Keys present in both lists are restored by the write-back alone; removing
//! them as well would discard the restored value.
//!
//! Only `Success` results can be undone. The plan for any other result is
//! empty, and applying an empty plan yields `success_no_data`.

use crate::result::DataTransactionResult;
use facet_core::{AnyValue, KeyDescriptor};
use std::sync::Arc;

/// Inverse of a transaction, ready to be applied to the same host
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UndoPlan {
    restore: Vec<AnyValue>,
    remove: Vec<Arc<KeyDescriptor>>,
}

impl UndoPlan {
    /// Values to write back
    pub fn restore(&self) -> &[AnyValue] {
        &self.restore
    }

    /// Keys to remove
    pub fn remove(&self) -> &[Arc<KeyDescriptor>] {
        &self.remove
    }

    /// Whether applying the plan would do nothing
    pub fn is_empty(&self) -> bool {
        self.restore.is_empty() && self.remove.is_empty()
    }
}

impl DataTransactionResult {
    /// Derive the inverse of this transaction
    pub fn undo_plan(&self) -> UndoPlan {
        if !self.is_successful() {
            return UndoPlan::default();
        }
        let restore: Vec<AnyValue> = self.replaced.to_vec();
        let remove = self
            .successful
            .iter()
            .filter(|value| !restore.iter().any(|old| old.key_id() == value.key_id()))
            .map(|value| Arc::clone(value.key()))
            .collect();
        UndoPlan { restore, remove }
    }
}
