//! Bulk operations over bundles of values
//!
//! Offering a [`Manipulator`] runs in two steps: the merge function
//! reconciles the bundle with what the host already holds for the same keys,
//! then every value of the merged bundle is written exactly once and the
//! per-key results are folded into one [`DataTransactionResult`].

use super::{resolve, DataEngine};
use facet_core::{AnyValue, KeyId, Manipulator, MergeFunction};
use facet_transaction::DataTransactionResult;

impl DataEngine {
    /// Write every value, folding the per-key results
    ///
    /// An empty input yields `success_no_data`.
    pub fn offer_all<H, I>(&self, host: &mut H, values: I) -> DataTransactionResult
    where
        H: 'static,
        I: IntoIterator<Item = AnyValue>,
    {
        let ctx = self.context();
        let result = values
            .into_iter()
            .fold(DataTransactionResult::builder(), |builder, value| {
                builder.absorb_result(self.offer_erased(host, &value, &ctx))
            })
            .build();
        self.observe(result)
    }

    /// Merge `manipulator` with the host's current values, then write it
    pub fn offer_manipulator<H: 'static>(
        &self,
        host: &mut H,
        manipulator: Manipulator,
        merge: &dyn MergeFunction,
    ) -> DataTransactionResult {
        let original = self.existing(&*host, manipulator.keys());
        let merged = merge.merge(original.as_ref(), manipulator);
        self.offer_all(host, merged)
    }

    /// Copy every value `source` holds onto `target`
    ///
    /// Values whose keys do not apply to `target` are reported as failures
    /// in the folded result.
    pub fn copy_from<S: 'static, H: 'static>(
        &self,
        source: &S,
        target: &mut H,
        merge: &dyn MergeFunction,
    ) -> DataTransactionResult {
        let bundle = self.manipulator(source);
        self.offer_manipulator(target, bundle, merge)
    }

    /// Keys that apply to `host` and have a value
    pub fn keys<H: 'static>(&self, host: &H) -> Vec<KeyId> {
        self.values(host)
            .into_iter()
            .map(|value| value.key_id().clone())
            .collect()
    }

    /// Every value `host` holds, in key registration order
    pub fn values<H: 'static>(&self, host: &H) -> Vec<AnyValue> {
        let interner = self.interner();
        self.registry
            .keys()
            .filter_map(|key| resolve(&self.registry, key.id(), host))
            .filter_map(|provider| provider.get_any(host, &interner))
            .collect()
    }

    /// Snapshot of every value `host` holds
    pub fn manipulator<H: 'static>(&self, host: &H) -> Manipulator {
        self.values(host).into_iter().collect()
    }

    /// The host's values for `ids`, or `None` if it holds none of them
    fn existing<'a, H, I>(&self, host: &H, ids: I) -> Option<Manipulator>
    where
        H: 'static,
        I: IntoIterator<Item = &'a KeyId>,
    {
        let interner = self.interner();
        let existing: Manipulator = ids
            .into_iter()
            .filter_map(|id| resolve(&self.registry, id, host)?.get_any(host, &interner))
            .collect();
        (!existing.is_empty()).then_some(existing)
    }
}
