//! composer-sync-lib: Core types and logic for composer-sync
//!
//! This crate provides everything needed to reconcile one Composer project's
//! `composer.json` into another:
//! - `Manifest`: a loaded `composer.json` document with typed views
//! - `merge`: the package, repository and patch reconciliation passes
//! - `subpackage`: folding an installed dependency's manifest into the source
//! - `sync`: the pipeline that loads, merges and persists the target

pub mod consts;
pub mod manifest;
pub mod merge;
pub mod subpackage;
pub mod sync;
#[cfg(test)]
mod util;
pub mod version;
