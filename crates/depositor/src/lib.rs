//! ISO 19139 metadata remapping and Zenodo deposit management.
//!
//! `depositor` turns an ISO 19139 XML metadata record into the metadata object
//! expected by Zenodo's deposit API, and drives the upload workflow around it:
//!
//! - Namespaced XML querying over a parsed ISO record
//! - Role-based contact extraction with name normalization and ORCID detection
//! - Geographic and temporal extent simplification
//! - Deposit creation, file upload, metadata attachment and publishing
//! - Resumable uploads through a small on-disk state file
//!
//! # Getting Started
//!
//! ```no_run
//! use depositor::{metadata::extract_metadata, prelude::*, zenodo::ZenodoClient, Config};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!   // Remap an ISO record into a deposit metadata object
//!   let metadata = extract_metadata("record.xml")?;
//!   println!("{}", serde_json::to_string_pretty(&metadata)?);
//!
//!   // Create a deposit and attach the metadata
//!   let config = Config::load(Config::default_path())?;
//!   let client = ZenodoClient::new(config.server.base_url(), config.token()?);
//!   let deposition = client.create_deposition().await?;
//!   client.update_metadata(deposition.id, &metadata).await?;
//!   Ok(())
//! }
//! ```
//!
//! # Module Organization
//!
//! - [`xml`]: Namespace-resolved path queries over a parsed XML record
//! - [`iso`]: ISO 19139 field tables, contact extraction and extent simplification
//! - [`metadata`]: Deposit metadata types and the assembler that builds them
//! - [`zenodo`]: HTTP client, upload file collection and resume state
//! - [`configuration`]: Runtime configuration
//! - [`error`]: Error type shared by the whole crate

#![warn(missing_docs, clippy::missing_docs_in_private_items)]

use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace, warn};
#[cfg(test)]
use {tempfile::tempdir, tracing_test::traced_test};

pub mod configuration;
pub mod error;
pub mod iso;
pub mod metadata;
pub mod xml;
pub mod zenodo;

pub use configuration::{Config, Server};

use crate::{error::*, xml::*};

/// Common traits and types for ergonomic imports.
///
/// ```no_run
/// use depositor::prelude::*;
///
/// fn example() -> Result<(), DepositorError> {
///   let xml = read_record("record.xml")?;
///   let document = Document::parse(&xml)?;
///   let metadata = MetadataAssembler::new().assemble(&document)?;
///   println!("{:?}", metadata.title);
///   Ok(())
/// }
/// ```
pub mod prelude {
  pub use crate::{
    error::DepositorError,
    metadata::{DepositMetadata, MetadataAssembler},
    xml::{read_record, Document, Node},
  };
}
