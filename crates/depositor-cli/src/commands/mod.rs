use clap::{Args, Subcommand};

use super::*;

pub mod extract;
pub mod upload;

pub use extract::extract;
pub use upload::upload;

/// Available commands for the CLI
#[derive(Subcommand, Clone)]
pub enum Commands {
  /// Print the Zenodo metadata derived from an ISO 19139 record
  Extract {
    /// Path to the ISO 19139 XML record
    iso_file: PathBuf,

    /// Fail instead of warning when the support or metadata contact is missing
    #[arg(long)]
    strict_contacts: bool,
  },

  /// Upload every file in a folder to a Zenodo deposit
  Upload(UploadOptions),
}

/// Options for [`Commands::Upload`]
#[derive(Args, Clone, Debug)]
pub struct UploadOptions {
  /// Folder whose files (including sub-folders) are uploaded
  #[arg(long)]
  pub folder: PathBuf,

  /// ISO 19139 record to derive the deposit metadata from
  #[arg(long)]
  pub iso_file: Option<PathBuf>,

  /// Resume file written by an earlier, interrupted upload
  #[arg(long)]
  pub resume_file: Option<PathBuf>,

  /// Publish the deposit once everything is uploaded
  #[arg(long)]
  pub publish: bool,

  /// Deposit into sandbox.zenodo.org instead of the configured server
  #[arg(long)]
  pub sandbox: bool,
}
