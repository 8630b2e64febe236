//! Package and repository sync integration tests.

use predicates::prelude::*;
use serde_json::json;

use super::common::{TestEnv, keys};

#[test]
fn sync_adds_and_updates_packages() {
  let env = TestEnv::from_fixtures("source_basic.json", "target_basic.json");

  env
    .sync_cmd()
    .assert()
    .success()
    .stdout(predicate::str::contains("Updating package: a/a from version 1.0.0 to 1.2.0"))
    .stdout(predicate::str::contains("Adding package: b/b, version: 2.0.0"))
    .stdout(predicate::str::contains("Composer update may be required to apply changes."));

  let target = env.target_json();
  assert_eq!(target["require"], json!({"a/a": "1.2.0", "b/b": "2.0.0"}));
  assert_eq!(keys(&target["require"]), vec!["a/a", "b/b"]);
}

#[test]
fn sync_appends_repository() {
  let env = TestEnv::from_fixtures("source_basic.json", "target_basic.json");

  env
    .sync_cmd()
    .assert()
    .success()
    .stdout(predicate::str::contains("Adding repository:"));

  assert_eq!(
    env.target_json()["repositories"],
    json!([{"type": "vcs", "url": "https://github.com/acme/private-lib.git"}])
  );
}

#[test]
fn sync_keeps_unrelated_keys_in_place() {
  let env = TestEnv::from_fixtures("source_basic.json", "target_basic.json");

  env.sync_cmd().assert().success();

  assert_eq!(
    keys(&env.target_json()),
    vec!["name", "type", "require", "config", "repositories"]
  );
}

#[test]
fn sync_writes_composer_layout() {
  let env = TestEnv::from_fixtures("source_basic.json", "target_basic.json");

  env.sync_cmd().assert().success();

  let text = env.target_text();
  assert!(text.starts_with("{\n    \"name\": \"acme/target\",\n"));
  assert!(text.contains("https://github.com/acme/private-lib.git"));
  assert!(!text.contains("\\/"));
  assert!(text.ends_with("}\n"));
}

#[test]
fn sync_is_idempotent() {
  let env = TestEnv::from_fixtures("source_basic.json", "target_basic.json");

  env.sync_cmd().assert().success();
  let after_first = env.target_text();

  env
    .sync_cmd()
    .assert()
    .success()
    .stdout(predicate::str::contains("No updates or repository changes necessary."));

  assert_eq!(env.target_text(), after_first);
}

#[test]
fn identical_manifests_are_not_rewritten() {
  let env = TestEnv::empty();
  let manifest = "{\"require\":{\"a/a\":\"^1.0\"}}";
  env.write_file("source/composer.json", manifest);
  env.write_file("target/composer.json", manifest);

  env
    .sync_cmd()
    .assert()
    .success()
    .stdout(predicate::str::contains("No updates or repository changes necessary."));

  // compact input would have been reformatted by a write
  assert_eq!(env.target_text(), manifest);
}

#[test]
fn newer_target_versions_are_kept() {
  let env = TestEnv::empty();
  env.write_file("source/composer.json", r#"{"require": {"a/a": "^1.9"}}"#);
  env.write_file("target/composer.json", r#"{"require": {"a/a": "^1.10"}}"#);

  env.sync_cmd().assert().success();

  assert_eq!(env.target_json()["require"]["a/a"], "^1.10");
}

#[test]
fn dry_run_reports_without_writing() {
  let env = TestEnv::from_fixtures("source_basic.json", "target_basic.json");
  let before = env.target_text();

  env
    .sync_cmd()
    .arg("--dry-run")
    .assert()
    .success()
    .stdout(predicate::str::contains("Would add package: b/b, version: 2.0.0"))
    .stderr(predicate::str::contains("Dry run"));

  assert_eq!(env.target_text(), before);
}

#[test]
fn explicit_target_directory() {
  let env = TestEnv::from_fixtures("source_basic.json", "target_basic.json");

  env
    .composer_sync_cmd()
    .current_dir(env.temp.path())
    .arg("sync-packages")
    .arg("source")
    .arg("--target")
    .arg("target")
    .assert()
    .success();

  assert_eq!(env.target_json()["require"]["b/b"], "2.0.0");
}

#[test]
fn json_report() {
  let env = TestEnv::from_fixtures("source_basic.json", "target_basic.json");

  let output = env.sync_cmd().arg("--format").arg("json").output().unwrap();
  assert!(output.status.success());

  let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
  assert_eq!(report["written"], true);
  assert_eq!(report["packages"].as_array().unwrap().len(), 2);
  assert_eq!(report["repositories"][0]["kind"], "repository_added");
}

#[test]
fn missing_source_manifest_fails() {
  let env = TestEnv::from_fixtures("source_basic.json", "target_basic.json");
  std::fs::remove_file(env.source_dir().join("composer.json")).unwrap();
  let before = env.target_text();

  env
    .sync_cmd()
    .assert()
    .failure()
    .stderr(predicate::str::contains(
      "Invalid source or target path, or composer.json not found.",
    ));

  assert_eq!(env.target_text(), before);
}

#[test]
fn missing_target_manifest_fails() {
  let env = TestEnv::empty();
  env.write_file("source/composer.json", &super::common::fixture_content("source_basic.json"));

  env
    .sync_cmd()
    .assert()
    .failure()
    .stderr(predicate::str::contains("composer.json not found"));

  assert!(!super::common::exists(&env, "target/composer.json"));
}

#[test]
fn unparseable_target_fails() {
  let env = TestEnv::empty();
  env.write_file("source/composer.json", &super::common::fixture_content("source_basic.json"));
  env.write_file("target/composer.json", "{ broken");

  env
    .sync_cmd()
    .assert()
    .failure()
    .stderr(predicate::str::contains("failed to parse"));

  assert_eq!(env.target_text(), "{ broken");
}
