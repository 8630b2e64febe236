use std::path::PathBuf;
use std::process::ExitCode;

use clap::{ArgAction, Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use composer_sync_lib::consts::LOG_ENV;

mod cmd;
mod output;

use cmd::SyncArgs;
use output::{OutputFormat, print_error};

/// composer-sync - Keep Composer projects' dependencies in step
#[derive(Parser)]
#[command(name = "composer-sync")]
#[command(author, version, about, long_about = None)]
struct Cli {
  /// Increase log verbosity (-v for info, -vv for debug)
  #[arg(short, long, action = ArgAction::Count, global = true)]
  verbose: u8,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Sync packages and repositories from a source Composer project to the target project
  SyncPackages {
    /// Path to the source Composer project
    source: PathBuf,

    /// Include dependencies from the specified subpackage
    #[arg(long, value_name = "VENDOR/PACKAGE")]
    include_subpackage: Option<String>,

    /// Path to the target Composer project
    #[arg(long, value_name = "DIR", default_value = ".")]
    target: PathBuf,

    /// Don't merge extra.patches
    #[arg(long)]
    no_patches: bool,

    /// Show what would change without writing composer.json
    #[arg(long)]
    dry_run: bool,

    /// Report format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
  },
}

fn main() -> ExitCode {
  let cli = Cli::parse();
  init_logging(cli.verbose);

  let result = match cli.command {
    Commands::SyncPackages {
      source,
      include_subpackage,
      target,
      no_patches,
      dry_run,
      format,
    } => cmd::cmd_sync_packages(SyncArgs {
      source,
      target,
      include_subpackage,
      no_patches,
      dry_run,
      format,
    }),
  };

  match result {
    Ok(()) => ExitCode::SUCCESS,
    Err(e) => {
      debug!(error = ?e, "command failed");
      print_error(&e.to_string());
      ExitCode::FAILURE
    }
  }
}

/// Log to stderr, filtered by `COMPOSER_SYNC_LOG` or the verbosity flag.
fn init_logging(verbose: u8) {
  let default = match verbose {
    0 => "warn",
    1 => "info",
    _ => "debug",
  };
  let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default));

  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .without_time()
    .init();
}
