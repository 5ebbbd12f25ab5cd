use inkpost_assets::UploadError;
use thiserror::Error;

/// Errors raised by an [`EditingSession`](crate::EditingSession).
///
/// None of these end the session; edits and undo keep working.
#[derive(Debug, Error)]
pub enum SessionError {
  #[error("An upload is already in progress for this draft")]
  UploadInFlight,

  #[error("Upload response arrived for a cancelled or reset draft")]
  StaleTicket,

  #[error("Upload failed: {0}")]
  Upload(#[from] UploadError),
}

impl SessionError {
  /// Whether trying again later may succeed.
  #[must_use]
  pub const fn is_retryable(&self) -> bool {
    match self {
      Self::UploadInFlight => true,
      Self::StaleTicket => false,
      Self::Upload(e) => e.is_retryable(),
    }
  }
}

/// Errors building a [`PublishRequest`](crate::PublishRequest).
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PublishError {
  #[error("A title is required before publishing")]
  MissingTitle,

  #[error("Cannot publish an empty draft")]
  EmptyDraft,
}
