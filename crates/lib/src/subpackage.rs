//! Loading an installed dependency's own manifest.
//!
//! A subpackage is a package the source project requires and has installed
//! under its `vendor/` directory. Its `require` and `repositories` can be
//! folded into the source before merging, one level deep.

use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;
use tracing::info;

use crate::consts::{MANIFEST_FILENAME, VENDOR_DIR};
use crate::manifest::Manifest;

/// Reasons a subpackage could not be expanded. None of them stop a run.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum SubpackageError {
  /// The name is not in the source project's `require`.
  #[error("Subpackage {name} not found in the source project.")]
  NotDeclared { name: String },

  /// The subpackage's `composer.json` is not where it should be installed.
  #[error("composer.json for subpackage {name} not found.")]
  ManifestMissing { name: String, path: PathBuf },
}

/// Path of an installed package's manifest below `source_root`.
///
/// `vendor/package` maps to `<source_root>/vendor/vendor/package/composer.json`
/// using the platform's path separator.
pub fn manifest_path(source_root: &Path, name: &str) -> PathBuf {
  let mut path = source_root.join(VENDOR_DIR);
  for segment in name.split('/').filter(|s| !s.is_empty()) {
    path.push(segment);
  }
  path.join(MANIFEST_FILENAME)
}

/// Load the manifest of subpackage `name` declared by `source`.
///
/// A manifest that exists but can't be parsed yields an empty manifest.
pub fn expand(name: &str, source: &Manifest, source_root: &Path) -> Result<Manifest, SubpackageError> {
  if !source.requirements().contains(name) {
    return Err(SubpackageError::NotDeclared { name: name.to_string() });
  }

  let path = manifest_path(source_root, name);
  if !path.is_file() {
    return Err(SubpackageError::ManifestMissing {
      name: name.to_string(),
      path,
    });
  }

  info!(subpackage = name, path = %path.display(), "loading subpackage manifest");
  Ok(Manifest::load_or_empty(&path))
}
