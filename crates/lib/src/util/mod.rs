//! Shared utilities.
//!
//! Test helpers for building manifests in memory and on disk.

pub mod testutil;
