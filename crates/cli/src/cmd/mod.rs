mod sync_packages;

pub use sync_packages::{SyncArgs, cmd_sync_packages};
