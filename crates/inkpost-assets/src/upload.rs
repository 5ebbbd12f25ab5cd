//! Upload batches and the storage service contract.
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::namespace::AssetNamespace;

/// One file returned by the storage service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadedAsset {
  /// Name of the file as it was submitted.
  pub filename: String,
  /// Fetchable URL assigned by storage.
  pub url:      String,
}

/// Result of one upload request, in submission order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UploadBatch {
  assets: Vec<UploadedAsset>,
}

impl UploadBatch {
  #[must_use]
  pub const fn new() -> Self {
    Self { assets: Vec::new() }
  }

  /// Append a `(filename, url)` pair. Order of calls is submission order.
  pub fn push(&mut self, filename: impl Into<String>, url: impl Into<String>) {
    self.assets.push(UploadedAsset {
      filename: filename.into(),
      url:      url.into(),
    });
  }

  #[must_use]
  pub const fn len(&self) -> usize {
    self.assets.len()
  }

  #[must_use]
  pub const fn is_empty(&self) -> bool {
    self.assets.is_empty()
  }

  pub fn iter(&self) -> impl Iterator<Item = &UploadedAsset> {
    self.assets.iter()
  }
}

impl<F, U> FromIterator<(F, U)> for UploadBatch
where
  F: Into<String>,
  U: Into<String>,
{
  fn from_iter<T: IntoIterator<Item = (F, U)>>(iter: T) -> Self {
    let mut batch = Self::new();
    for (filename, url) in iter {
      batch.push(filename, url);
    }
    batch
  }
}

impl<'a> IntoIterator for &'a UploadBatch {
  type Item = &'a UploadedAsset;
  type IntoIter = std::slice::Iter<'a, UploadedAsset>;

  fn into_iter(self) -> Self::IntoIter {
    self.assets.iter()
  }
}

/// A file waiting to be sent to storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingFile {
  pub filename: String,
  pub source:   PathBuf,
}

impl PendingFile {
  /// Build a pending file from a local path, using its file name.
  #[must_use]
  pub fn from_path(path: impl Into<PathBuf>) -> Self {
    let source = path.into();
    let filename = source
      .file_name()
      .map(|n| n.to_string_lossy().into_owned())
      .unwrap_or_default();
    Self { filename, source }
  }
}

/// Failure of an upload request. None of these are fatal to a session; the
/// writer can retry.
#[derive(Debug, Error)]
pub enum UploadError {
  #[error("Upload transport error: {0}")]
  Transport(String),

  #[error("Storage rejected the upload: {0}")]
  Rejected(String),

  #[error("I/O error: {0}")]
  Io(#[from] std::io::Error),
}

impl UploadError {
  /// Whether retrying the same request may succeed.
  #[must_use]
  pub const fn is_retryable(&self) -> bool {
    matches!(self, Self::Transport(_) | Self::Io(_))
  }
}

/// Storage collaborator that accepts files for a namespace.
pub trait UploadService {
  /// Upload `files` into `namespace`. On success the batch preserves the
  /// order of `files`.
  ///
  /// # Errors
  ///
  /// Returns an [`UploadError`] when the request fails; no partial batch is
  /// returned in that case.
  fn upload(
    &self,
    namespace: &AssetNamespace,
    files: &[PendingFile],
  ) -> Result<UploadBatch, UploadError>;
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_batch_preserves_order() {
    let batch: UploadBatch =
      [("b.png", "https://x/b"), ("a.png", "https://x/a")]
        .into_iter()
        .collect();
    let names: Vec<_> = batch.iter().map(|a| a.filename.as_str()).collect();
    assert_eq!(names, ["b.png", "a.png"]);
  }

  #[test]
  fn test_batch_json_shape() {
    let json = r#"[{"filename":"a.png","url":"https://cdn/a.png"}]"#;
    let batch: UploadBatch = serde_json::from_str(json).expect("valid batch");
    assert_eq!(batch.len(), 1);
    assert_eq!(
      batch.iter().next().map(|a| a.url.as_str()),
      Some("https://cdn/a.png")
    );
  }

  #[test]
  fn test_pending_file_name() {
    let file = PendingFile::from_path("/tmp/shots/cat.jpg");
    assert_eq!(file.filename, "cat.jpg");
  }

  #[test]
  fn test_retryable() {
    assert!(UploadError::Transport("timeout".into()).is_retryable());
    assert!(!UploadError::Rejected("too large".into()).is_retryable());
  }
}
