//! CLI output formatting utilities.
//!
//! Provides consistent formatting for terminal output including colored status
//! messages, one-line descriptions of manifest changes, and Unicode symbols.

use std::time::Duration;

use anyhow::Context;
use clap::ValueEnum;
use composer_sync_lib::merge::Change;
use owo_colors::{OwoColorize, Stream};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
  #[default]
  Text,
  Json,
}

impl OutputFormat {
  pub fn is_json(self) -> bool {
    matches!(self, OutputFormat::Json)
  }
}

pub mod symbols {
  pub const SUCCESS: &str = "✓";
  pub const ERROR: &str = "✗";
  pub const WARNING: &str = "⚠";
  pub const INFO: &str = "•";
  pub const ADD: &str = "+";
  pub const MODIFY: &str = "~";
}

pub fn format_duration(duration: Duration) -> String {
  let secs = duration.as_secs();
  let millis = duration.subsec_millis();

  if secs >= 60 {
    let mins = secs / 60;
    let remaining_secs = secs % 60;
    format!("{}m {}s", mins, remaining_secs)
  } else if secs > 0 {
    format!("{}.{:02}s", secs, millis / 10)
  } else {
    format!("{}ms", millis)
  }
}

/// Symbol shown in front of a change line.
pub fn change_symbol(change: &Change) -> &'static str {
  match change {
    Change::PackageUpdated { .. } => symbols::MODIFY,
    Change::PatchAdded { replaced: Some(_), .. } => symbols::MODIFY,
    _ => symbols::ADD,
  }
}

/// Describe a change the way it is reported to the user.
pub fn describe_change(change: &Change, dry_run: bool) -> String {
  let (add, update) = if dry_run {
    ("Would add", "Would update")
  } else {
    ("Adding", "Updating")
  };

  match change {
    Change::PackageAdded { package, version } => {
      format!("{} package: {}, version: {}", add, package, version)
    }
    Change::PackageUpdated { package, from, to } => {
      format!("{} package: {} from version {} to {}", update, package, from, to)
    }
    Change::RepositoryAdded { repository } => format!("{} repository: {}", add, repository),
    Change::PatchAdded {
      package,
      description,
      location,
      replaced,
    } => match replaced {
      Some(old) => format!(
        "{} patch: {} \"{}\" -> {} (replaces {})",
        add, package, description, location, old
      ),
      None => format!("{} patch: {} \"{}\" -> {}", add, package, description, location),
    },
  }
}

pub fn print_change(change: &Change, dry_run: bool) {
  let symbol = change_symbol(change);
  let symbol = if symbol == symbols::MODIFY {
    symbol.if_supports_color(Stream::Stdout, |s| s.yellow()).to_string()
  } else {
    symbol.if_supports_color(Stream::Stdout, |s| s.green()).to_string()
  };
  println!("  {} {}", symbol, describe_change(change, dry_run));
}

pub fn print_success(message: &str) {
  println!(
    "{} {}",
    symbols::SUCCESS.if_supports_color(Stream::Stdout, |s| s.green()),
    message
  );
}

pub fn print_error(message: &str) {
  eprintln!(
    "{} {}",
    symbols::ERROR.if_supports_color(Stream::Stderr, |s| s.red()),
    message.if_supports_color(Stream::Stderr, |s| s.red())
  );
}

pub fn print_warning(message: &str) {
  eprintln!(
    "{} {}",
    symbols::WARNING.if_supports_color(Stream::Stderr, |s| s.yellow()),
    message.if_supports_color(Stream::Stderr, |s| s.yellow())
  );
}

pub fn print_info(message: &str) {
  println!(
    "{} {}",
    symbols::INFO.if_supports_color(Stream::Stdout, |s| s.blue()),
    message
  );
}

pub fn print_stat(label: &str, value: &str) {
  println!(
    "  {}: {}",
    label.if_supports_color(Stream::Stdout, |s| s.dimmed()),
    value
  );
}

pub fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
  let json = serde_json::to_string_pretty(value).context("Failed to serialize to JSON")?;
  println!("{}", json);
  Ok(())
}
