//! Resume files for interrupted uploads.
//!
//! Creating a deposit is the only step that cannot be repeated safely, so its
//! identifiers are written to disk right away. Passing the file back lets a
//! later run upload into the same deposit instead of creating a new one.

use super::*;

/// Identifiers needed to continue uploading into an existing deposit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResumeState {
  /// Deposit identifier
  pub dataset_id: u64,
  /// Bucket files are uploaded into
  pub bucket_url: String,
}

impl From<Deposition> for ResumeState {
  fn from(deposition: Deposition) -> Self {
    Self { dataset_id: deposition.id, bucket_url: deposition.bucket_url }
  }
}

impl ResumeState {
  /// File name used for the resume file of deposit `dataset_id`.
  pub fn file_name(dataset_id: u64) -> String { format!("resume_upload_{dataset_id}.json") }

  /// Writes the state as pretty JSON into `dir`, returning the file path.
  pub fn save(&self, dir: impl AsRef<Path>) -> Result<PathBuf> {
    let dir = dir.as_ref();
    std::fs::create_dir_all(dir)?;
    let path = dir.join(Self::file_name(self.dataset_id));
    std::fs::write(&path, serde_json::to_string_pretty(self)?)?;
    debug!("Saved resume state for deposit {} to {}", self.dataset_id, path.display());
    Ok(path)
  }

  /// Reads a resume file written by [`ResumeState::save`].
  ///
  /// # Errors
  ///
  /// [`DepositorError::InvalidPath`] if `path` is not a file,
  /// [`DepositorError::Json`] if it does not hold a resume state.
  pub fn load(path: impl AsRef<Path>) -> Result<Self> {
    let path = path.as_ref();
    if !path.is_file() {
      return Err(DepositorError::InvalidPath(path.to_path_buf()));
    }
    let state: Self = serde_json::from_str(&std::fs::read_to_string(path)?)?;
    debug!("Resuming deposit {} from {}", state.dataset_id, path.display());
    Ok(state)
  }
}
