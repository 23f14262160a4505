//! Incremental construction of transaction results
//!
//! Bulk operations that write several keys collect their per-key outcomes
//! here before producing one [`DataTransactionResult`].

use crate::result::{upsert, DataTransactionResult, TransactionStatus, ValueList};
use facet_core::AnyValue;

/// Builder for [`DataTransactionResult`]
///
/// The status defaults to `Success` unless set explicitly or raised by an
/// absorbed result.
#[derive(Debug, Default)]
pub struct DataTransactionResultBuilder {
    status: Option<TransactionStatus>,
    successful: ValueList,
    replaced: ValueList,
    rejected: ValueList,
}

impl DataTransactionResultBuilder {
    /// Create an empty builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a value now held by the host
    pub fn success(mut self, value: impl Into<AnyValue>) -> Self {
        upsert(&mut self.successful, value.into());
        self
    }

    /// Record a value the host held before
    pub fn replace(mut self, value: impl Into<AnyValue>) -> Self {
        upsert(&mut self.replaced, value.into());
        self
    }

    /// Record a value the host refused
    pub fn reject(mut self, value: impl Into<AnyValue>) -> Self {
        upsert(&mut self.rejected, value.into());
        self
    }

    /// Record several successful values
    pub fn success_all<I: IntoIterator<Item = AnyValue>>(mut self, values: I) -> Self {
        for value in values {
            upsert(&mut self.successful, value);
        }
        self
    }

    /// Record several replaced values
    pub fn replace_all<I: IntoIterator<Item = AnyValue>>(mut self, values: I) -> Self {
        for value in values {
            upsert(&mut self.replaced, value);
        }
        self
    }

    /// Record several rejected values
    pub fn reject_all<I: IntoIterator<Item = AnyValue>>(mut self, values: I) -> Self {
        for value in values {
            upsert(&mut self.rejected, value);
        }
        self
    }

    /// Set the status explicitly
    pub fn status(mut self, status: TransactionStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Fold in another result's values, raising the status if it is worse
    pub fn absorb_result(mut self, result: DataTransactionResult) -> Self {
        let current = self.status.unwrap_or(TransactionStatus::Success);
        self.status = Some(current.combine(result.status));
        self.success_all(result.successful)
            .replace_all(result.replaced)
            .reject_all(result.rejected)
    }

    /// Finish the result
    pub fn build(self) -> DataTransactionResult {
        DataTransactionResult {
            status: self.status.unwrap_or(TransactionStatus::Success),
            successful: self.successful,
            replaced: self.replaced,
            rejected: self.rejected,
        }
    }
}
