//! Command line interface for depositing datasets on Zenodo.
//!
//! This crate drives the `depositor` library from the shell:
//! - Previewing the Zenodo metadata derived from an ISO 19139 record
//! - Uploading a folder of files into a new or partially uploaded deposit
//! - Attaching the derived metadata and optionally publishing
//!
//! # Usage
//!
//! ```bash
//! # Show the metadata Zenodo would receive
//! depositor extract record.xml
//!
//! # Upload a folder with metadata to the sandbox
//! export ZENODO_TOKEN=...
//! depositor upload --folder data/ --iso-file record.xml --sandbox
//!
//! # Continue an interrupted upload and publish
//! depositor upload --folder data/ --resume-file /tmp/resume_upload_1234.json --publish
//! ```
//!
//! Use `-v` (repeatable) for more logging, or set `RUST_LOG` directly.

#![warn(missing_docs, clippy::missing_docs_in_private_items)]

use std::path::{Path, PathBuf};

use clap::{builder::ArgAction, Parser};
use console::style;
use depositor::{
  metadata::MissingContactPolicy,
  prelude::*,
  zenodo::{collect_upload_files, ResumeState, ZenodoClient},
  Config, Server,
};
use tracing::{debug, trace};
use tracing_subscriber::EnvFilter;

pub mod commands;
pub mod error;

use crate::{commands::*, error::*};

/// Prefix for information messages
static INFO_PREFIX: &str = "ℹ ";
/// Prefix for success messages
static SUCCESS_PREFIX: &str = "✓ ";
/// Prefix for warning messages
static WARNING_PREFIX: &str = "⚠️ ";
/// Prefix for error messages
static ERROR_PREFIX: &str = "✗ ";
/// Branch character for tree structure
static TREE_BRANCH: &str = "├";
/// Leaf character for tree structure (end of branch)
static TREE_LEAF: &str = "└";

/// Command line interface configuration and argument parsing
#[derive(Parser)]
#[command(author, version, about = "Upload datasets and their ISO 19139 metadata to Zenodo")]
pub struct Cli {
  /// Verbose mode (-v, -vv, -vvv) for different levels of logging detail
  #[arg(
        short,
        long,
        action = ArgAction::Count,
        global = true,
        help = "Increase logging verbosity"
    )]
  verbose: u8,

  /// Path to the configuration file. If not specified, uses the default platform-specific
  /// configuration directory.
  #[arg(long, short, global = true)]
  config: Option<PathBuf>,

  /// The subcommand to execute
  #[command(subcommand)]
  command: Commands,

  /// Skip all prompts and accept defaults (mostly for testing)
  #[arg(long, hide = true, global = true)]
  accept_defaults: bool,
}

impl Cli {
  /// Loads the configuration from `--config` or the default location.
  fn load_config(&self) -> Result<Config> {
    let path = self.config.clone().unwrap_or_else(Config::default_path);
    trace!("Using config at: {}", path.display());
    Ok(Config::load(path)?)
  }
}

/// Configures the logging system based on the verbosity level
///
/// # Arguments
///
/// * `verbosity` - Number of times the verbose flag was used (0-4)
///
/// The verbosity levels are:
/// - 0: error (default)
/// - 1: warn
/// - 2: info
/// - 3: debug
/// - 4+: trace
///
/// Logs go to stderr so `extract` output can be piped.
fn setup_logging(verbosity: u8) {
  let filter = match verbosity {
    0 => "error",
    1 => "warn",
    2 => "info",
    3 => "debug",
    _ => "trace",
  };

  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .with_file(true)
    .with_line_number(true)
    .with_target(true)
    .init();
}

/// Entry point for the depositor CLI application
///
/// # Errors
///
/// Returns [`CliError`] for unreadable records, configuration problems,
/// rejected API calls and failed prompts.
#[tokio::main]
async fn main() -> Result<()> {
  let cli = Cli::parse();
  setup_logging(cli.verbose);

  let result = match &cli.command {
    Commands::Extract { iso_file, strict_contacts } => extract(&cli, iso_file, *strict_contacts),
    Commands::Upload(options) => upload(&cli, options).await,
  };

  if let Err(e) = &result {
    eprintln!("{} {}", style(ERROR_PREFIX).red(), e);
  }
  result
}
