//! Error types for the depositor library.
//!
//! Every fallible operation in the crate returns [`DepositorError`]. Absent
//! optional metadata is never an error; it simply leaves a field out of the
//! assembled record. Errors are reserved for unreadable input, failed HTTP
//! exchanges and contacts that were required but missing.
//!
//! # Examples
//!
//! ```no_run
//! use depositor::{error::DepositorError, metadata::extract_metadata};
//!
//! match extract_metadata("record.xml") {
//!   Err(DepositorError::Xml(e)) => println!("Malformed record: {}", e),
//!   Err(DepositorError::Io(e)) => println!("Could not read record: {}", e),
//!   Err(e) => println!("Other error: {}", e),
//!   Ok(metadata) => println!("Title: {:?}", metadata.title),
//! }
//! ```

use std::path::PathBuf;

use thiserror::Error;

/// Error type alias used for the [`depositor`](crate) crate.
pub type Result<T> = core::result::Result<T, DepositorError>;

/// Errors that can occur while remapping metadata or talking to Zenodo.
#[derive(Error, Debug)]
pub enum DepositorError {
  /// The ISO record is not well-formed XML.
  #[error(transparent)]
  Xml(#[from] roxmltree::Error),

  /// The document parsed but contained no root element.
  #[error("XML document has no root element")]
  EmptyDocument,

  /// A network request failed.
  ///
  /// This can occur when:
  /// - The network is unavailable
  /// - The server is unreachable
  /// - The request times out
  /// - TLS/SSL errors occur
  #[error(transparent)]
  Network(#[from] reqwest::Error),

  /// Zenodo answered with a status the workflow does not accept.
  ///
  /// The body is kept verbatim, Zenodo puts its validation messages there.
  #[error("Zenodo API error ({status}): {body}")]
  Api {
    /// HTTP status code of the response
    status: u16,
    /// Raw response body
    body:   String,
  },

  /// A successful response was missing a field the workflow needs.
  #[error("Unexpected response from Zenodo: {0}")]
  UnexpectedResponse(String),

  /// A file system operation failed.
  #[error(transparent)]
  Io(#[from] std::io::Error),

  /// JSON (de)serialization failed, typically for the resume file.
  #[error(transparent)]
  Json(#[from] serde_json::Error),

  /// The configuration file is not valid TOML for [`Config`](crate::Config).
  #[error(transparent)]
  TomlDe(#[from] toml::de::Error),

  /// The upload folder walk produced an unusable glob pattern.
  #[error(transparent)]
  Pattern(#[from] glob::PatternError),

  /// A path matched during the upload folder walk could not be read.
  #[error(transparent)]
  Glob(#[from] glob::GlobError),

  /// A contact required by the assembler was not present in the record.
  ///
  /// Only raised under [`MissingContactPolicy::Fail`](crate::metadata::MissingContactPolicy).
  #[error("No contact with role \"{0}\" found in the ISO record")]
  MissingContact(String),

  /// No API token was found in the environment or the configuration.
  #[error("No Zenodo API token found, set ZENODO_TOKEN or add `token` to the config")]
  MissingToken,

  /// Zenodo buckets are flat, so two files with the same name would collide.
  #[error("File names in the upload folder are not unique: {0:?}")]
  DuplicateFileNames(Vec<String>),

  /// A path given to the workflow does not point at what was expected.
  #[error("Invalid path: {}", .0.display())]
  InvalidPath(PathBuf),
}
