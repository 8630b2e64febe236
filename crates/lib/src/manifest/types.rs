//! Typed views over the parts of `composer.json` that get reconciled.
//!
//! The views are extracted from, and written back into, the loosely-typed
//! manifest document. Anything they don't model stays in the document untouched.

use std::collections::HashMap;
use std::fmt;

use serde::Serialize;
use serde_json::{Map, Value};

/// A single `require` entry: package name to version constraint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Requirement {
  /// Package name, e.g. `vendor/package`.
  pub package: String,
  /// Version constraint, e.g. `^1.2.0`.
  pub constraint: String,
}

/// The `require` section, in document order.
///
/// Package names are unique; inserting an existing name replaces its
/// constraint in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Requirements {
  entries: Vec<Requirement>,
}

impl Requirements {
  pub fn new() -> Self {
    Self::default()
  }

  /// Extract requirements from a `require` value.
  ///
  /// Entries whose constraint isn't a string are not modelled and are skipped.
  pub fn from_value(value: Option<&Value>) -> Self {
    let Some(Value::Object(map)) = value else {
      return Self::new();
    };

    map
      .iter()
      .filter_map(|(package, constraint)| constraint.as_str().map(|c| (package.as_str(), c)))
      .collect()
  }

  pub fn get(&self, package: &str) -> Option<&str> {
    self.position(package).map(|i| self.entries[i].constraint.as_str())
  }

  pub fn contains(&self, package: &str) -> bool {
    self.position(package).is_some()
  }

  /// Insert or replace a requirement, returning the previous constraint.
  pub fn insert(&mut self, package: impl Into<String>, constraint: impl Into<String>) -> Option<String> {
    let package = package.into();
    let constraint = constraint.into();
    match self.position(&package) {
      Some(i) => Some(std::mem::replace(&mut self.entries[i].constraint, constraint)),
      None => {
        self.entries.push(Requirement { package, constraint });
        None
      }
    }
  }

  /// Union with `other`, where `other` wins on a name collision.
  pub fn extend_override(&mut self, other: &Requirements) {
    for req in other.iter() {
      self.insert(req.package.clone(), req.constraint.clone());
    }
  }

  /// Sort entries by package name.
  pub fn sort(&mut self) {
    self.entries.sort_by(|a, b| a.package.cmp(&b.package));
  }

  /// Whether entries are in package-name order.
  pub fn is_sorted(&self) -> bool {
    self.entries.windows(2).all(|w| w[0].package <= w[1].package)
  }

  pub fn iter(&self) -> impl Iterator<Item = &Requirement> {
    self.entries.iter()
  }

  pub fn len(&self) -> usize {
    self.entries.len()
  }

  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }

  pub fn packages(&self) -> Vec<&str> {
    self.entries.iter().map(|r| r.package.as_str()).collect()
  }

  fn position(&self, package: &str) -> Option<usize> {
    self.entries.iter().position(|r| r.package == package)
  }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Requirements {
  fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
    let mut requirements = Requirements::new();
    for (package, constraint) in iter {
      requirements.insert(package, constraint);
    }
    requirements
  }
}

/// A repository descriptor.
///
/// Descriptors are opaque: two descriptors are the same repository only if
/// their whole values are equal (object key order does not matter).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Repository(Value);

impl Repository {
  pub fn new(value: Value) -> Self {
    Self(value)
  }

  pub fn as_value(&self) -> &Value {
    &self.0
  }

  pub fn into_value(self) -> Value {
    self.0
  }

  /// The descriptor's `type` field, if any.
  pub fn kind(&self) -> Option<&str> {
    self.0.get("type").and_then(Value::as_str)
  }

  /// The descriptor's `url` field, if any.
  pub fn url(&self) -> Option<&str> {
    self.0.get("url").and_then(Value::as_str)
  }

  /// Extract descriptors from a `repositories` value.
  ///
  /// Both the list form and the name-keyed object form are accepted.
  pub fn list_from_value(value: Option<&Value>) -> Vec<Repository> {
    match value {
      Some(Value::Array(items)) => items.iter().cloned().map(Repository).collect(),
      Some(Value::Object(map)) => map.values().cloned().map(Repository).collect(),
      _ => Vec::new(),
    }
  }
}

impl fmt::Display for Repository {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.0)
  }
}

/// A named patch for one package.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Patch {
  /// Human readable description, unique per package.
  pub description: String,
  /// Path or URL of the patch file.
  pub location: String,
}

/// All patches declared for one package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackagePatches {
  pub package: String,
  pub patches: Vec<Patch>,
}

/// The `extra.patches` section: package name to description to patch location.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PatchSet {
  packages: Vec<PackagePatches>,
}

impl PatchSet {
  pub fn new() -> Self {
    Self::default()
  }

  /// Extract a patch set from an `extra.patches` value.
  ///
  /// Returns `None` unless the value is an object of objects of strings.
  pub fn from_value(value: &Value) -> Option<Self> {
    let mut set = PatchSet::new();
    for (package, patches) in value.as_object()? {
      let mut entry = PackagePatches {
        package: package.clone(),
        patches: Vec::new(),
      };
      for (description, location) in patches.as_object()? {
        entry.patches.push(Patch {
          description: description.clone(),
          location: location.as_str()?.to_string(),
        });
      }
      set.packages.push(entry);
    }
    Some(set)
  }

  pub fn to_value(&self) -> Value {
    let mut packages = Map::new();
    for entry in &self.packages {
      let patches: Map<String, Value> = entry
        .patches
        .iter()
        .map(|p| (p.description.clone(), Value::String(p.location.clone())))
        .collect();
      packages.insert(entry.package.clone(), Value::Object(patches));
    }
    Value::Object(packages)
  }

  /// Iterate `(package, patch)` pairs in document order.
  pub fn iter(&self) -> impl Iterator<Item = (&str, &Patch)> {
    self
      .packages
      .iter()
      .flat_map(|entry| entry.patches.iter().map(move |p| (entry.package.as_str(), p)))
  }

  /// Map every patch location to the package that owns it.
  pub fn locations(&self) -> HashMap<String, String> {
    self
      .iter()
      .map(|(package, patch)| (patch.location.clone(), package.to_string()))
      .collect()
  }

  /// Set `description` to `location` for `package`, returning the location it replaced.
  pub fn insert(&mut self, package: &str, description: &str, location: &str) -> Option<String> {
    let index = match self.packages.iter().position(|e| e.package == package) {
      Some(i) => i,
      None => {
        self.packages.push(PackagePatches {
          package: package.to_string(),
          patches: Vec::new(),
        });
        self.packages.len() - 1
      }
    };

    let patches = &mut self.packages[index].patches;
    match patches.iter_mut().find(|p| p.description == description) {
      Some(existing) => Some(std::mem::replace(&mut existing.location, location.to_string())),
      None => {
        patches.push(Patch {
          description: description.to_string(),
          location: location.to_string(),
        });
        None
      }
    }
  }

  pub fn is_empty(&self) -> bool {
    self.packages.iter().all(|e| e.patches.is_empty())
  }
}

/// State of a manifest's `extra.patches` section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatchSection {
  /// No `extra.patches` key.
  Absent,
  /// Present, but not an object of objects of strings.
  Malformed,
  Present(PatchSet),
}
