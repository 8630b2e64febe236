//! Test utilities for composer-sync-lib.

use std::fs;
use std::path::Path;

use serde_json::Value;

use crate::consts::MANIFEST_FILENAME;
use crate::manifest::Manifest;

/// Build an in-memory manifest from a JSON object literal.
pub fn manifest_from(value: Value) -> Manifest {
  match value {
    Value::Object(document) => Manifest::from_document(document),
    other => panic!("manifest must be a JSON object, got {}", other),
  }
}

/// Write `value` as `composer.json` inside `dir`, creating the directory.
pub fn write_manifest(dir: &Path, value: &Value) {
  fs::create_dir_all(dir).unwrap();
  let content = serde_json::to_string_pretty(value).unwrap();
  fs::write(dir.join(MANIFEST_FILENAME), content).unwrap();
}

/// Read `composer.json` inside `dir` as raw text.
pub fn read_manifest_text(dir: &Path) -> String {
  fs::read_to_string(dir.join(MANIFEST_FILENAME)).unwrap()
}
