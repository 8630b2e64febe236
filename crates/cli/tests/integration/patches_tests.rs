//! Patch merge integration tests.

use predicates::prelude::*;
use serde_json::json;

use super::common::TestEnv;

#[test]
fn new_patches_are_added_known_locations_skipped() {
  let env = TestEnv::from_fixtures("source_patches.json", "target_patches.json");

  env
    .sync_cmd()
    .assert()
    .success()
    .stdout(predicate::str::contains("Adding patch: drupal/core \"Fix menu links\""))
    .stdout(predicate::str::contains("fix-thing").not());

  let patches = &env.target_json()["extra"]["patches"];
  assert_eq!(
    patches,
    &json!({
      "other/pkg": {"Same patch, other name": "patches/fix.patch"},
      "drupal/core": {
        "Fix menu links": "patches/core-menu-links.patch",
        "Backport cache fix": "https://www.drupal.org/files/issues/cache-fix.patch"
      }
    })
  );
}

#[test]
fn other_extra_keys_are_preserved() {
  let env = TestEnv::from_fixtures("source_patches.json", "target_patches.json");

  env.sync_cmd().assert().success();

  assert_eq!(
    env.target_json()["extra"]["installer-paths"],
    json!({"web/core": ["type:drupal-core"]})
  );
}

#[test]
fn no_patches_flag_skips_pass() {
  let env = TestEnv::from_fixtures("source_patches.json", "target_patches.json");
  let before = env.target_text();

  env
    .sync_cmd()
    .arg("--no-patches")
    .assert()
    .success()
    .stdout(predicate::str::contains("No updates or repository changes necessary."));

  assert_eq!(env.target_text(), before);
}

#[test]
fn patches_merge_is_idempotent() {
  let env = TestEnv::from_fixtures("source_patches.json", "target_patches.json");

  env.sync_cmd().assert().success();
  let after_first = env.target_text();
  env.sync_cmd().assert().success();

  assert_eq!(env.target_text(), after_first);
}
