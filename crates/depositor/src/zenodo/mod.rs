//! Zenodo deposit API client.
//!
//! A deposit is created empty, receives its files through the bucket link
//! returned at creation, gets its metadata attached, and is finally published.
//! [`ZenodoClient`] wraps each of those calls; the order is up to the caller.
//!
//! - [`upload`]: collection of the files to send from a local folder
//! - [`resume`]: persisted deposit identifiers so an interrupted upload can continue
//!
//! # Examples
//!
//! ```no_run
//! use depositor::{zenodo::ZenodoClient, Server};
//!
//! # async fn example() -> depositor::error::Result<()> {
//! let client = ZenodoClient::new(Server::Sandbox.base_url(), "my-token");
//! let deposition = client.create_deposition().await?;
//! let file = client.upload_file(&deposition.bucket_url, "data.csv", "data/data.csv").await?;
//! println!("Uploaded {} bytes, {}", file.size, file.checksum);
//! client.publish(deposition.id).await?;
//! # Ok(())
//! # }
//! ```

use reqwest::{header::CONTENT_LENGTH, Body, Response, StatusCode};
use serde_json::json;

use super::*;
use crate::metadata::DepositMetadata;

pub mod resume;
pub mod upload;

pub use resume::ResumeState;
pub use upload::{collect_upload_files, UploadFile};

/// Query parameter carrying the API token.
const ACCESS_TOKEN_PARAM: &str = "access_token";

/// A freshly created deposit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deposition {
  /// Deposit identifier
  pub id:         u64,
  /// Bucket files are uploaded into
  pub bucket_url: String,
}

/// Zenodo's answer to a successful file upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
  /// Checksum computed by Zenodo, e.g. `md5:...`
  pub checksum: String,
  /// Stored size in bytes
  pub size:     u64,
}

/// Raw deposit creation response.
#[derive(Debug, Deserialize)]
struct DepositionResponse {
  /// Deposit identifier
  id:    u64,
  /// Related API links
  #[serde(default)]
  links: DepositionLinks,
}

/// Links of a deposit, only the bucket matters here.
#[derive(Debug, Default, Deserialize)]
struct DepositionLinks {
  /// File bucket URL
  bucket: Option<String>,
}

/// Raw file upload response.
#[derive(Debug, Deserialize)]
struct UploadResponse {
  /// Checksum of the stored file
  checksum: Option<String>,
  /// Size of the stored file
  size:     Option<u64>,
}

/// Client for one Zenodo deposit endpoint.
#[derive(Debug, Clone)]
pub struct ZenodoClient {
  /// Shared HTTP client
  client:   reqwest::Client,
  /// Deposit collection URL, e.g. `https://zenodo.org/api/deposit/depositions`
  base_url: String,
  /// Personal access token
  token:    String,
}

impl ZenodoClient {
  /// Creates a client for the deposit collection at `base_url`.
  ///
  /// # Arguments
  ///
  /// * `base_url` - Deposit collection URL, see [`Server::base_url`]
  /// * `token` - Zenodo personal access token
  pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Self {
    Self {
      client:   reqwest::Client::new(),
      base_url: base_url.into().trim_end_matches('/').to_string(),
      token:    token.into(),
    }
  }

  /// Deposit collection URL this client talks to.
  pub fn base_url(&self) -> &str { &self.base_url }

  /// Query string attached to every request.
  fn auth(&self) -> [(&str, &str); 1] { [(ACCESS_TOKEN_PARAM, self.token.as_str())] }

  /// Creates a new, empty deposit.
  ///
  /// # Errors
  ///
  /// Anything but `201 Created` is returned as [`DepositorError::Api`]. A
  /// response without a bucket link is a [`DepositorError::UnexpectedResponse`].
  pub async fn create_deposition(&self) -> Result<Deposition> {
    info!("Creating deposit at {}", self.base_url);
    let response =
      self.client.post(&self.base_url).query(&self.auth()).json(&json!({})).send().await?;
    let response = expect_status(response, StatusCode::CREATED).await?;

    let body: DepositionResponse = response.json().await?;
    let bucket_url = body.links.bucket.ok_or_else(|| {
      DepositorError::UnexpectedResponse(format!("deposit {} has no bucket link", body.id))
    })?;
    debug!("Created deposit {} with bucket {bucket_url}", body.id);
    Ok(Deposition { id: body.id, bucket_url })
  }

  /// Uploads one file into a deposit bucket under `name`.
  ///
  /// The file is streamed from disk, never held in memory as a whole.
  pub async fn upload_file(
    &self,
    bucket_url: &str,
    name: &str,
    path: impl AsRef<Path>,
  ) -> Result<UploadedFile> {
    let path = path.as_ref();
    let file = tokio::fs::File::open(path).await?;
    let length = file.metadata().await?.len();
    debug!("Uploading {} ({length} bytes) as {name}", path.display());

    let url = format!("{}/{name}", bucket_url.trim_end_matches('/'));
    let response = self
      .client
      .put(&url)
      .query(&self.auth())
      .header(CONTENT_LENGTH, length)
      .body(Body::from(file))
      .send()
      .await?;
    if !response.status().is_success() {
      return Err(api_error(response).await);
    }

    let body: UploadResponse = response.json().await?;
    match (body.checksum, body.size) {
      (Some(checksum), Some(size)) => Ok(UploadedFile { checksum, size }),
      _ => Err(DepositorError::UnexpectedResponse(format!(
        "upload of {name} did not report a checksum and size"
      ))),
    }
  }

  /// Attaches `metadata` to a deposit, replacing whatever it had.
  pub async fn update_metadata(&self, id: u64, metadata: &DepositMetadata) -> Result<()> {
    info!("Attaching metadata to deposit {id}");
    let body = json!({ "metadata": metadata });
    trace!("Metadata payload: {body}");

    let url = format!("{}/{id}", self.base_url);
    let response = self.client.put(&url).query(&self.auth()).json(&body).send().await?;
    expect_status(response, StatusCode::OK).await?;
    Ok(())
  }

  /// Publishes a deposit. Published deposits can no longer be deleted.
  pub async fn publish(&self, id: u64) -> Result<()> {
    info!("Publishing deposit {id}");
    let url = format!("{}/{id}/actions/publish", self.base_url);
    let response = self.client.post(&url).query(&self.auth()).send().await?;
    if !response.status().is_success() {
      return Err(api_error(response).await);
    }
    Ok(())
  }
}

/// Passes `response` through when it carries `expected`.
async fn expect_status(response: Response, expected: StatusCode) -> Result<Response> {
  if response.status() == expected {
    Ok(response)
  } else {
    Err(api_error(response).await)
  }
}

/// Turns a rejected response into [`DepositorError::Api`].
async fn api_error(response: Response) -> DepositorError {
  let status = response.status().as_u16();
  let body = response.text().await.unwrap_or_default();
  warn!("Zenodo answered {status}: {body}");
  DepositorError::Api { status, body }
}
