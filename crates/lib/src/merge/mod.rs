//! Reconciliation passes that fold a source manifest into a target.
//!
//! Each pass is a pure function over typed sections: it mutates the target
//! section in place and returns the changes it made. A pass changed the target
//! exactly when its change list is non-empty.

mod packages;
mod patches;
mod repositories;

pub use packages::merge_packages;
pub use patches::merge_patches;
pub use repositories::merge_repositories;

use serde::Serialize;

use crate::manifest::Repository;

/// A single modification made to the target manifest.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Change {
  /// A package missing from the target was added.
  PackageAdded { package: String, version: String },

  /// A package's constraint was raised to the source's.
  PackageUpdated { package: String, from: String, to: String },

  /// A repository descriptor missing from the target was appended.
  RepositoryAdded { repository: Repository },

  /// A patch not yet referenced by the target was added.
  PatchAdded {
    package: String,
    description: String,
    location: String,
    /// Location previously stored under the same description, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    replaced: Option<String>,
  },
}
