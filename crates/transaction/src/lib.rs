//! Transaction algebra for facet data
//!
//! This crate describes the effect of every mutating operation:
//! - DataTransactionResult: Successful, replaced and rejected values plus a status
//! - TransactionStatus: Success, Failure or Error, ordered by severity
//! - DataTransactionResultBuilder: Incremental construction for bulk operations
//! - UndoPlan: The inverse of a successful transaction

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod builder;
pub mod result;
pub mod undo;

pub use builder::DataTransactionResultBuilder;
pub use result::{DataTransactionResult, TransactionStatus};
pub use undo::UndoPlan;
