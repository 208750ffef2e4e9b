//! Files to upload from a local folder.

use std::collections::BTreeMap;

use glob::Pattern;

use super::*;

/// A file found in the upload folder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
  /// Name the file gets in the deposit bucket
  pub name: String,
  /// Location on disk
  pub path: PathBuf,
}

/// Walks `folder` recursively and lists every file to upload.
///
/// Hidden files (names starting with `.`) are skipped. Files are returned in
/// path order. Zenodo buckets are flat, so files from different
/// sub-folders end up side by side under their bare name.
///
/// # Errors
///
/// [`DepositorError::InvalidPath`] if `folder` is not a directory, and
/// [`DepositorError::DuplicateFileNames`] if two files share a name.
pub fn collect_upload_files(folder: impl AsRef<Path>) -> Result<Vec<UploadFile>> {
  let folder = folder.as_ref();
  if !folder.is_dir() {
    return Err(DepositorError::InvalidPath(folder.to_path_buf()));
  }

  let root = folder.to_str().ok_or_else(|| DepositorError::InvalidPath(folder.to_path_buf()))?;
  let pattern = format!("{}/**/*", Pattern::escape(root.trim_end_matches('/')));
  debug!("Collecting upload files matching {pattern}");

  let mut files = Vec::new();
  for entry in glob::glob(&pattern)? {
    let path = entry?;
    if !path.is_file() {
      continue;
    }
    let Some(name) = path.file_name().and_then(|name| name.to_str()).map(str::to_string) else {
      warn!("Skipping file with a non UTF-8 name: {}", path.display());
      continue;
    };
    if name.starts_with('.') {
      debug!("Skipping hidden file {}", path.display());
      continue;
    }
    files.push(UploadFile { name, path });
  }
  files.sort_by(|a, b| a.path.cmp(&b.path));

  let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
  for file in &files {
    *counts.entry(file.name.as_str()).or_default() += 1;
  }
  let duplicates: Vec<String> =
    counts.into_iter().filter(|(_, count)| *count > 1).map(|(name, _)| name.to_string()).collect();
  if !duplicates.is_empty() {
    return Err(DepositorError::DuplicateFileNames(duplicates));
  }

  info!("Found {} files to upload in {}", files.len(), folder.display());
  Ok(files)
}

#[cfg(test)]
mod tests {
  use super::*;

  fn touch(path: &Path) {
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, "content").unwrap();
  }

  #[test]
  fn test_collect_upload_files() {
    let dir = tempdir().unwrap();
    touch(&dir.path().join("b.nc"));
    touch(&dir.path().join("a.csv"));
    touch(&dir.path().join("nested/deeper/c.txt"));
    touch(&dir.path().join(".DS_Store"));
    touch(&dir.path().join("nested/.hidden"));

    let files = collect_upload_files(dir.path()).unwrap();
    let names: Vec<_> = files.iter().map(|file| file.name.as_str()).collect();
    assert_eq!(names, vec!["a.csv", "b.nc", "c.txt"]);
    assert_eq!(files[2].path, dir.path().join("nested/deeper/c.txt"));
  }

  #[test]
  fn test_duplicate_names_are_rejected() {
    let dir = tempdir().unwrap();
    touch(&dir.path().join("one/data.csv"));
    touch(&dir.path().join("two/data.csv"));
    touch(&dir.path().join("unique.csv"));

    match collect_upload_files(dir.path()) {
      Err(DepositorError::DuplicateFileNames(names)) => assert_eq!(names, vec!["data.csv"]),
      other => panic!("expected duplicate file names, got {other:?}"),
    }
  }

  #[test]
  fn test_folder_must_exist() {
    let dir = tempdir().unwrap();
    let file = dir.path().join("file.txt");
    touch(&file);

    assert!(matches!(collect_upload_files(&file), Err(DepositorError::InvalidPath(_))));
    assert!(matches!(
      collect_upload_files(dir.path().join("missing")),
      Err(DepositorError::InvalidPath(_))
    ));
  }

  #[test]
  fn test_empty_folder() {
    let dir = tempdir().unwrap();
    assert!(collect_upload_files(dir.path()).unwrap().is_empty());
  }
}
