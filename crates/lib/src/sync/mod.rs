//! Manifest synchronization pipeline.
//!
//! This module provides the core logic for the `sync-packages` command: load
//! the source and target manifests, optionally fold a subpackage into the
//! source, run the package, repository and patch passes, and write the target
//! once if any pass changed it.

use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::consts::MANIFEST_FILENAME;
use crate::manifest::{Manifest, ManifestError, PatchSection, PatchSet};
use crate::merge::{Change, merge_packages, merge_patches, merge_repositories};
use crate::subpackage::{self, SubpackageError};

/// Options for a sync run.
#[derive(Debug, Clone)]
pub struct SyncOptions {
  /// Root of the source project.
  pub source_dir: PathBuf,
  /// Root of the target project, whose manifest is updated.
  pub target_dir: PathBuf,
  /// Installed source dependency whose manifest is folded into the source.
  pub include_subpackage: Option<String>,
  /// Whether to run the `extra.patches` pass.
  pub merge_patches: bool,
  /// If true, report changes without writing the target.
  pub dry_run: bool,
}

impl SyncOptions {
  /// Options with every pass enabled and no subpackage.
  pub fn new(source_dir: impl Into<PathBuf>, target_dir: impl Into<PathBuf>) -> Self {
    Self {
      source_dir: source_dir.into(),
      target_dir: target_dir.into(),
      include_subpackage: None,
      merge_patches: true,
      dry_run: false,
    }
  }
}

/// Outcome of the subpackage expansion step.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SubpackageStatus {
  /// The subpackage's requirements and repositories were folded into the source.
  Loaded { name: String },
  /// Expansion was skipped; the run continued with the unmodified source.
  Skipped { error: SubpackageError },
}

/// What a sync run did.
#[derive(Debug, Clone, Serialize)]
pub struct SyncReport {
  /// Target manifest path.
  pub target_path: PathBuf,
  /// Subpackage expansion outcome, if one was requested.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub subpackage: Option<SubpackageStatus>,
  /// Changes made by the package pass.
  pub packages: Vec<Change>,
  /// Changes made by the repository pass.
  pub repositories: Vec<Change>,
  /// Changes made by the patch pass.
  pub patches: Vec<Change>,
  /// Whether the patch pass ran.
  pub patches_merged: bool,
  /// Whether the target manifest was written.
  pub written: bool,
  /// Whether this was a dry run.
  pub dry_run: bool,
}

impl SyncReport {
  /// Whether any pass changed the target.
  pub fn changed(&self) -> bool {
    !self.packages.is_empty() || !self.repositories.is_empty() || !self.patches.is_empty()
  }

  /// All changes, in the order the passes ran.
  pub fn changes(&self) -> impl Iterator<Item = &Change> {
    self.packages.iter().chain(&self.repositories).chain(&self.patches)
  }
}

/// Errors that abort a sync run. Nothing is written when one occurs.
#[derive(Debug, Error)]
pub enum SyncError {
  /// The source manifest is missing or unreadable.
  #[error("invalid source project: {0}")]
  Source(#[source] ManifestError),

  /// The target manifest is missing or unreadable.
  #[error("invalid target project: {0}")]
  Target(#[source] ManifestError),

  /// The merged target could not be written.
  #[error("failed to write target manifest: {0}")]
  Persist(#[source] ManifestError),
}

impl SyncError {
  /// Whether the run failed because a required `composer.json` doesn't exist.
  pub fn is_missing_manifest(&self) -> bool {
    matches!(
      self,
      SyncError::Source(ManifestError::NotFound { .. }) | SyncError::Target(ManifestError::NotFound { .. })
    )
  }
}

/// Synchronize the target project's manifest with the source project's.
///
/// # Errors
///
/// Returns an error if:
/// - Either `composer.json` is missing, unreadable or not a JSON object
/// - The merged target manifest cannot be written
pub fn sync(options: &SyncOptions) -> Result<SyncReport, SyncError> {
  let source_path = options.source_dir.join(MANIFEST_FILENAME);
  let target_path = options.target_dir.join(MANIFEST_FILENAME);

  info!(
    source = %source_path.display(),
    target = %target_path.display(),
    "loading manifests"
  );

  let mut source = Manifest::load(&source_path).map_err(SyncError::Source)?;
  let mut target = Manifest::load(&target_path).map_err(SyncError::Target)?;

  let subpackage = options
    .include_subpackage
    .as_deref()
    .map(|name| expand_subpackage(name, &mut source, &options.source_dir));

  let mut requirements = target.requirements();
  let packages = merge_packages(&source.requirements(), &mut requirements);
  if !packages.is_empty() {
    target.set_requirements(&requirements);
  }

  let mut repository_list = target.repositories();
  let repositories = merge_repositories(&source.repositories(), &mut repository_list);
  if !repositories.is_empty() {
    target.set_repositories(&repository_list);
  }

  let patches = if options.merge_patches {
    sync_patches(&source, &mut target)
  } else {
    debug!("patch pass disabled");
    Vec::new()
  };

  let mut report = SyncReport {
    target_path,
    subpackage,
    packages,
    repositories,
    patches,
    patches_merged: options.merge_patches,
    written: false,
    dry_run: options.dry_run,
  };

  info!(
    packages = report.packages.len(),
    repositories = report.repositories.len(),
    patches = report.patches.len(),
    "merge complete"
  );

  if !report.changed() {
    info!("target already up to date");
  } else if options.dry_run {
    info!(path = %report.target_path.display(), "dry run, target not written");
  } else {
    target.save(&report.target_path).map_err(SyncError::Persist)?;
    report.written = true;
    info!(path = %report.target_path.display(), "target manifest written");
  }

  Ok(report)
}

fn expand_subpackage(name: &str, source: &mut Manifest, source_dir: &Path) -> SubpackageStatus {
  match subpackage::expand(name, source, source_dir) {
    Ok(sub) => {
      source.fold_in(&sub);
      SubpackageStatus::Loaded { name: name.to_string() }
    }
    Err(error) => {
      info!(subpackage = name, error = %error, "skipping subpackage expansion");
      SubpackageStatus::Skipped { error }
    }
  }
}

fn sync_patches(source: &Manifest, target: &mut Manifest) -> Vec<Change> {
  let incoming = match source.patches() {
    PatchSection::Present(set) => set,
    PatchSection::Absent | PatchSection::Malformed => {
      debug!("no usable patches in source");
      return Vec::new();
    }
  };

  let mut existing = match target.patches() {
    PatchSection::Present(set) => set,
    PatchSection::Absent => PatchSet::new(),
    PatchSection::Malformed => {
      warn!("target extra.patches is malformed, skipping patch merge");
      return Vec::new();
    }
  };

  let changes = merge_patches(&incoming, &mut existing);
  if !changes.is_empty() {
    target.set_patches(&existing);
  }
  changes
}
