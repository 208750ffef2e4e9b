//! Error types for the depositor CLI.

use depositor::error::DepositorError;
use thiserror::Error;

/// Error type alias used for the CLI.
pub type Result<T> = core::result::Result<T, CliError>;

/// Errors that can occur while running a CLI command.
#[derive(Error, Debug)]
pub enum CliError {
  /// Metadata extraction, configuration or a Zenodo call failed.
  #[error(transparent)]
  Depositor(#[from] DepositorError),

  /// An interactive prompt could not be shown or read.
  #[error(transparent)]
  Dialoguer(#[from] dialoguer::Error),

  /// The metadata could not be rendered as JSON.
  #[error(transparent)]
  Json(#[from] serde_json::Error),
}
