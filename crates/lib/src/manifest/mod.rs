//! Composer manifest documents.
//!
//! A [`Manifest`] is the parsed `composer.json` object with document key order
//! preserved. Reconciled sections are read and written through the typed views
//! in [`types`]; every other key is carried through untouched.
//!
//! # Encoding
//!
//! Manifests are written the way Composer writes them: 4-space indentation,
//! unescaped `/`, and a trailing newline.

mod types;

pub use types::*;

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{debug, warn};

const REQUIRE_KEY: &str = "require";
const REPOSITORIES_KEY: &str = "repositories";
const EXTRA_KEY: &str = "extra";
const PATCHES_KEY: &str = "patches";

/// Errors that can occur when loading or saving a manifest.
#[derive(Debug, Error)]
pub enum ManifestError {
  /// The manifest file does not exist.
  #[error("composer.json not found: {}", path.display())]
  NotFound { path: PathBuf },

  /// Failed to read the manifest file.
  #[error("failed to read {}: {source}", path.display())]
  Read {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  /// Failed to parse the manifest JSON.
  #[error("failed to parse {}: {source}", path.display())]
  Parse {
    path: PathBuf,
    #[source]
    source: serde_json::Error,
  },

  /// The manifest parsed, but its top level is not an object.
  #[error("{} does not contain a JSON object", path.display())]
  NotAnObject { path: PathBuf },

  /// Failed to serialize the manifest.
  #[error("failed to serialize manifest: {0}")]
  Serialize(#[source] serde_json::Error),

  /// Failed to write the manifest file.
  #[error("failed to write {}: {source}", path.display())]
  Write {
    path: PathBuf,
    #[source]
    source: io::Error,
  },
}

/// A loaded `composer.json` document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Manifest {
  document: Map<String, Value>,
}

impl Manifest {
  /// Create an empty manifest.
  pub fn new() -> Self {
    Self::default()
  }

  pub fn from_document(document: Map<String, Value>) -> Self {
    Self { document }
  }

  pub fn document(&self) -> &Map<String, Value> {
    &self.document
  }

  /// Load a manifest from the given path.
  ///
  /// A missing file is reported as [`ManifestError::NotFound`] so callers can
  /// tell it apart from an unreadable or malformed one.
  pub fn load(path: &Path) -> Result<Self, ManifestError> {
    debug!(path = %path.display(), "loading manifest");

    let content = match fs::read_to_string(path) {
      Ok(content) => content,
      Err(e) if e.kind() == io::ErrorKind::NotFound => {
        return Err(ManifestError::NotFound {
          path: path.to_path_buf(),
        });
      }
      Err(e) => {
        return Err(ManifestError::Read {
          path: path.to_path_buf(),
          source: e,
        });
      }
    };

    let value: Value = serde_json::from_str(&content).map_err(|e| ManifestError::Parse {
      path: path.to_path_buf(),
      source: e,
    })?;

    match value {
      Value::Object(document) => Ok(Self { document }),
      _ => Err(ManifestError::NotAnObject {
        path: path.to_path_buf(),
      }),
    }
  }

  /// Load a manifest, falling back to an empty one on any failure.
  ///
  /// Only for supplementary manifests whose absence must not stop a run.
  pub fn load_or_empty(path: &Path) -> Self {
    match Self::load(path) {
      Ok(manifest) => manifest,
      Err(e) => {
        warn!(path = %path.display(), error = %e, "failed to load manifest, using an empty one");
        Self::new()
      }
    }
  }

  /// The `require` section.
  pub fn requirements(&self) -> Requirements {
    Requirements::from_value(self.document.get(REQUIRE_KEY))
  }

  /// Replace the `require` section with `requirements`, in their order.
  ///
  /// Existing entries the typed view could not model (non-string constraints)
  /// are kept. They go into name order when `requirements` is sorted and
  /// after the replaced entries otherwise.
  pub fn set_requirements(&mut self, requirements: &Requirements) {
    let sorted = requirements.is_sorted();
    let mut entries: Vec<(String, Value)> = requirements
      .iter()
      .map(|r| (r.package.clone(), Value::String(r.constraint.clone())))
      .collect();

    if let Some(Value::Object(old)) = self.document.get(REQUIRE_KEY) {
      for (package, value) in old {
        if entries.iter().any(|(p, _)| p == package) {
          continue;
        }
        let at = if sorted {
          entries.partition_point(|(p, _)| p < package)
        } else {
          entries.len()
        };
        entries.insert(at, (package.clone(), value.clone()));
      }
    }

    let require: Map<String, Value> = entries.into_iter().collect();
    self.document.insert(REQUIRE_KEY.to_string(), Value::Object(require));
  }

  /// The `repositories` section, in document order.
  pub fn repositories(&self) -> Vec<Repository> {
    Repository::list_from_value(self.document.get(REPOSITORIES_KEY))
  }

  /// Write `repositories` back into the document.
  ///
  /// `repositories` must start with the descriptors currently in the
  /// document. When the document uses the name-keyed object form, existing
  /// keys are kept and the remaining descriptors are added under the next free
  /// numeric keys. Otherwise the section becomes a list.
  pub fn set_repositories(&mut self, repositories: &[Repository]) {
    if let Some(Value::Object(existing)) = self.document.get_mut(REPOSITORIES_KEY) {
      let known = existing.len();
      let mut next = 0usize;
      for repo in repositories.iter().skip(known) {
        while existing.contains_key(&next.to_string()) {
          next += 1;
        }
        existing.insert(next.to_string(), repo.as_value().clone());
      }
      return;
    }

    if matches!(self.document.get(REPOSITORIES_KEY), Some(v) if !v.is_array()) {
      warn!("replacing malformed repositories section");
    }

    let list = repositories.iter().map(|r| r.as_value().clone()).collect();
    self.document.insert(REPOSITORIES_KEY.to_string(), Value::Array(list));
  }

  /// The `extra.patches` section.
  pub fn patches(&self) -> PatchSection {
    let Some(extra) = self.document.get(EXTRA_KEY) else {
      return PatchSection::Absent;
    };
    let Some(extra) = extra.as_object() else {
      return PatchSection::Malformed;
    };
    match extra.get(PATCHES_KEY) {
      None => PatchSection::Absent,
      Some(value) => PatchSet::from_value(value).map_or(PatchSection::Malformed, PatchSection::Present),
    }
  }

  /// Write `patches` to `extra.patches`, creating `extra` when missing.
  ///
  /// A non-object `extra` is left alone; callers check [`Manifest::patches`]
  /// for [`PatchSection::Malformed`] first.
  pub fn set_patches(&mut self, patches: &PatchSet) {
    let extra = self
      .document
      .entry(EXTRA_KEY.to_string())
      .or_insert_with(|| Value::Object(Map::new()));

    match extra.as_object_mut() {
      Some(extra) => {
        extra.insert(PATCHES_KEY.to_string(), patches.to_value());
      }
      None => warn!("extra is not an object, patches not written"),
    }
  }

  /// Fold another manifest's `require` and `repositories` into this one.
  ///
  /// Requirements from `other` win on a name collision; repositories are
  /// concatenated without de-duplication.
  pub fn fold_in(&mut self, other: &Manifest) {
    if other.document.contains_key(REQUIRE_KEY) {
      let mut requirements = self.requirements();
      requirements.extend_override(&other.requirements());
      self.set_requirements(&requirements);
    }

    if other.document.contains_key(REPOSITORIES_KEY) {
      let mut repositories = self.repositories();
      repositories.extend(other.repositories());
      self.set_repositories(&repositories);
    }
  }

  /// Serialize the manifest in Composer's layout.
  pub fn to_json_string(&self) -> Result<String, ManifestError> {
    let mut buf = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    self.document.serialize(&mut serializer).map_err(ManifestError::Serialize)?;
    buf.push(b'\n');

    // serde_json only ever emits UTF-8
    Ok(String::from_utf8_lossy(&buf).into_owned())
  }

  /// Save the manifest to the given path.
  ///
  /// The document is serialized in full before anything touches the
  /// destination, then written to a temporary file next to it and renamed into
  /// place. An existing file keeps its permissions, and a symlinked manifest is
  /// replaced at the link's target.
  pub fn save(&self, path: &Path) -> Result<(), ManifestError> {
    let content = self.to_json_string()?;
    let write_err = |source: io::Error| ManifestError::Write {
      path: path.to_path_buf(),
      source,
    };

    let (dest, permissions) = match fs::canonicalize(path) {
      Ok(resolved) => {
        let permissions = fs::metadata(&resolved).map_err(write_err)?.permissions();
        (resolved, Some(permissions))
      }
      Err(e) if e.kind() == io::ErrorKind::NotFound => (path.to_path_buf(), None),
      Err(e) => return Err(write_err(e)),
    };

    let dir = match dest.parent() {
      Some(p) if !p.as_os_str().is_empty() => p,
      _ => Path::new("."),
    };

    let mut file = tempfile::NamedTempFile::new_in(dir).map_err(write_err)?;
    file.write_all(content.as_bytes()).map_err(write_err)?;
    if let Some(permissions) = permissions {
      file.as_file().set_permissions(permissions).map_err(write_err)?;
    }
    file.persist(&dest).map_err(|e| write_err(e.error))?;

    debug!(path = %path.display(), bytes = content.len(), "manifest saved");
    Ok(())
  }
}
