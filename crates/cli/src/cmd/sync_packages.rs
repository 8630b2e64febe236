//! Implementation of the `composer-sync sync-packages` command.
//!
//! This command merges missing or outdated requirements, repositories and
//! patches from a source Composer project into the target project's
//! `composer.json`.

use std::path::PathBuf;
use std::time::Instant;

use anyhow::Result;
use tracing::debug;

use composer_sync_lib::sync::{SubpackageStatus, SyncOptions, SyncReport, sync};

use crate::output::{
  OutputFormat, format_duration, print_change, print_error, print_info, print_json, print_stat, print_success,
  print_warning,
};

/// Arguments of the sync-packages command.
#[derive(Debug)]
pub struct SyncArgs {
  pub source: PathBuf,
  pub target: PathBuf,
  pub include_subpackage: Option<String>,
  pub no_patches: bool,
  pub dry_run: bool,
  pub format: OutputFormat,
}

/// Execute the sync-packages command.
///
/// Loads `<source>/composer.json` and `<target>/composer.json`, folds in the
/// requested subpackage, merges requirements, repositories and patches, and
/// writes the target if anything changed (unless `dry_run`).
///
/// # Errors
///
/// Returns an error if either manifest is missing or unreadable, or the target
/// cannot be written. A subpackage that can't be expanded is reported but is
/// not an error.
pub fn cmd_sync_packages(args: SyncArgs) -> Result<()> {
  let start = Instant::now();

  let options = SyncOptions {
    source_dir: args.source,
    target_dir: args.target,
    include_subpackage: args.include_subpackage,
    merge_patches: !args.no_patches,
    dry_run: args.dry_run,
  };
  debug!(?options, format = ?args.format, "running sync-packages");

  let report = match sync(&options) {
    Ok(report) => report,
    Err(e) => {
      if e.is_missing_manifest() {
        print_error("Invalid source or target path, or composer.json not found.");
      }
      return Err(e.into());
    }
  };

  if args.format.is_json() {
    return print_json(&report);
  }

  print_report(&report);
  if report.written {
    print_stat("Duration", &format_duration(start.elapsed()));
  }
  debug!(elapsed = ?start.elapsed(), changed = report.changed(), "sync-packages finished");

  Ok(())
}

fn print_report(report: &SyncReport) {
  if report.dry_run {
    print_warning("Dry run - no changes written");
  }

  match &report.subpackage {
    Some(SubpackageStatus::Loaded { name }) => {
      print_info(&format!("Loading dependencies from subpackage: {}", name));
    }
    Some(SubpackageStatus::Skipped { error }) => print_error(&error.to_string()),
    None => {}
  }

  for change in report.changes() {
    print_change(change, report.dry_run);
  }

  if !report.changed() {
    print_success("No updates or repository changes necessary.");
    return;
  }

  println!();
  if report.written {
    print_success(&format!("Updated {}", report.target_path.display()));
  }
  print_info("Composer update may be required to apply changes.");
  print_info("Review the changes to composer.json before running composer update.");
}
