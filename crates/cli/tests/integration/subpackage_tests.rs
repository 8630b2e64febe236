//! Subpackage expansion integration tests.

use predicates::prelude::*;

use super::common::{TestEnv, fixture_content};

fn env_with_toolkit() -> TestEnv {
  let env = TestEnv::empty();
  env.write_file("source/composer.json", &fixture_content("source_subpackage.json"));
  env.write_file("target/composer.json", r#"{"require": {"a/a": "^1.0"}}"#);
  env.write_file("source/vendor/acme/toolkit/composer.json", &fixture_content("toolkit.json"));
  env
}

#[test]
fn subpackage_requirements_and_repositories_are_merged() {
  let env = env_with_toolkit();

  env
    .sync_cmd()
    .arg("--include-subpackage")
    .arg("acme/toolkit")
    .assert()
    .success()
    .stdout(predicate::str::contains("Loading dependencies from subpackage: acme/toolkit"))
    .stdout(predicate::str::contains("Adding package: symfony/console, version: ^6.4"))
    .stdout(predicate::str::contains("Updating package: a/a from version ^1.0 to ^1.4"));

  let target = env.target_json();
  assert_eq!(target["require"]["acme/toolkit"], "^3.0");
  assert_eq!(target["require"]["symfony/console"], "^6.4");
  assert_eq!(target["repositories"][0]["url"], "https://packages.acme.example");
}

#[test]
fn without_flag_subpackage_is_ignored() {
  let env = env_with_toolkit();

  env.sync_cmd().assert().success();

  let target = env.target_json();
  assert!(target["require"].get("symfony/console").is_none());
  assert!(target.get("repositories").is_none());
}

#[test]
fn undeclared_subpackage_is_reported_but_run_succeeds() {
  let env = env_with_toolkit();

  env
    .sync_cmd()
    .arg("--include-subpackage")
    .arg("nobody/nothing")
    .assert()
    .success()
    .stderr(predicate::str::contains(
      "Subpackage nobody/nothing not found in the source project.",
    ))
    .stdout(predicate::str::contains("Adding package: acme/toolkit, version: ^3.0"));

  assert!(env.target_json()["require"].get("symfony/console").is_none());
}

#[test]
fn uninstalled_subpackage_is_reported_but_run_succeeds() {
  let env = TestEnv::empty();
  env.write_file("source/composer.json", &fixture_content("source_subpackage.json"));
  env.write_file("target/composer.json", "{}");

  env
    .sync_cmd()
    .arg("--include-subpackage")
    .arg("acme/toolkit")
    .assert()
    .success()
    .stderr(predicate::str::contains("composer.json for subpackage acme/toolkit not found."));
}
