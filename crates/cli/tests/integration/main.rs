//! CLI integration tests for composer-sync.

mod patches_tests;
mod subpackage_tests;
mod sync_tests;
