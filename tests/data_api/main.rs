//! Data API integration tests
//!
//! End-to-end scenarios over the worked-example hosts: dispatch, offers,
//! removal, undo, bundles with merge strategies, interning, and config.

#[path = "../common/mod.rs"]
mod common;

mod bulk;
mod cache;
mod config;
mod cooldown;
mod offer;
mod undo;
