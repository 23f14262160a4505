//! Undo
//!
//! A successful result is inverted by writing back its replaced values and
//! removing the keys it newly added. The inverse runs through the regular
//! write path and returns its own result.

use super::DataEngine;
use facet_transaction::{DataTransactionResult, UndoPlan};

impl DataEngine {
    /// Revert the effect of `result` on `host`
    ///
    /// Results that are not `Success`, or that changed nothing, yield
    /// `success_no_data` without touching the host.
    pub fn undo<H: 'static>(&self, host: &mut H, result: &DataTransactionResult) -> DataTransactionResult {
        self.apply_undo(host, &result.undo_plan())
    }

    /// Apply a previously derived [`UndoPlan`]
    pub fn apply_undo<H: 'static>(&self, host: &mut H, plan: &UndoPlan) -> DataTransactionResult {
        if plan.is_empty() {
            return DataTransactionResult::success_no_data();
        }
        let ctx = self.context();
        let mut builder = DataTransactionResult::builder();
        for value in plan.restore() {
            builder = builder.absorb_result(self.offer_erased(host, value, &ctx));
        }
        for key in plan.remove() {
            builder = builder.absorb_result(self.remove_erased(host, key.id(), &ctx));
        }
        self.observe(builder.build())
    }
}
