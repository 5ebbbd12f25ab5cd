//! The writer's draft: text, history, cursor, namespace and uploads.
use inkpost_assets::{
  AssetNamespace,
  NamespaceAllocator,
  PendingFile,
  ReconcileReport,
  UploadBatch,
  UploadError,
  UploadService,
  reconcile,
};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::{
  error::{PublishError, SessionError},
  history::EditHistory,
  publish::PublishRequest,
};

/// A selection as byte offsets into the draft. `start == end` is a caret.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
  pub start: usize,
  pub end:   usize,
}

impl Selection {
  /// Selection between two offsets, in either order.
  #[must_use]
  pub const fn new(a: usize, b: usize) -> Self {
    if a <= b {
      Self { start: a, end: b }
    } else {
      Self { start: b, end: a }
    }
  }

  #[must_use]
  pub const fn caret(offset: usize) -> Self {
    Self {
      start: offset,
      end:   offset,
    }
  }
}

/// Proof that an upload was started, handed back on completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploadTicket {
  token:    u64,
  sequence: u64,
}

impl UploadTicket {
  /// Session token the upload was started under.
  #[must_use]
  pub const fn token(&self) -> u64 {
    self.token
  }
}

/// One writer's draft.
///
/// Owns the text, its undo history, the current selection, the draft's asset
/// namespace and the state of at most one in-flight upload. Text edits and
/// undo stay available while an upload is outstanding.
#[derive(Debug, Clone, Default)]
pub struct EditingSession {
  text:          String,
  history:       EditHistory,
  selection:     Option<Selection>,
  namespace:     Option<AssetNamespace>,
  token:         u64,
  in_flight:     Option<UploadTicket>,
  next_sequence: u64,
}

impl EditingSession {
  #[must_use]
  pub fn new() -> Self {
    Self::default()
  }

  /// Open an existing draft. The initial text is not an undo step.
  #[must_use]
  pub fn with_text(text: impl Into<String>) -> Self {
    Self {
      text: text.into(),
      ..Self::default()
    }
  }

  /// Use a history of the given depth, discarding any recorded steps.
  #[must_use]
  pub fn with_history_limit(mut self, limit: usize) -> Self {
    self.history = EditHistory::with_limit(limit);
    self
  }

  #[must_use]
  pub fn text(&self) -> &str {
    &self.text
  }

  #[must_use]
  pub const fn history(&self) -> &EditHistory {
    &self.history
  }

  #[must_use]
  pub const fn selection(&self) -> Option<Selection> {
    self.selection
  }

  #[must_use]
  pub const fn namespace(&self) -> Option<&AssetNamespace> {
    self.namespace.as_ref()
  }

  /// Current session token. Bumped by [`reset`](Self::reset).
  #[must_use]
  pub const fn token(&self) -> u64 {
    self.token
  }

  #[must_use]
  pub const fn is_upload_in_flight(&self) -> bool {
    self.in_flight.is_some()
  }

  /// Replace the draft, recording the old text for undo.
  ///
  /// Returns `false` when `new_text` equals the current text, in which case
  /// no history is recorded.
  pub fn apply_edit(&mut self, new_text: impl Into<String>) -> bool {
    let new_text = new_text.into();
    if new_text == self.text {
      return false;
    }
    let previous = std::mem::replace(&mut self.text, new_text);
    self.history.record(previous);
    true
  }

  /// Step back one edit. No-op on an empty undo stack.
  pub fn undo(&mut self) -> bool {
    self.history.undo(&mut self.text)
  }

  /// Step forward one undone edit. No-op on an empty redo stack.
  pub fn redo(&mut self) -> bool {
    self.history.redo(&mut self.text)
  }

  pub const fn set_selection(&mut self, selection: Option<Selection>) {
    self.selection = selection;
  }

  /// Insert `snippet` on its own line at the selection.
  ///
  /// The selected range is replaced. Offsets beyond the text or inside a
  /// character are clamped to the nearest boundary before them; with no
  /// selection the snippet goes at the end. A newline is added before the
  /// snippet if the text before it is non-empty and does not end with one,
  /// and after it if the text after it is non-empty and does not start with
  /// one.
  ///
  /// Returns the offset just past the snippet, which also becomes the new
  /// caret. The insertion is one undo step.
  pub fn insert_at_cursor(&mut self, snippet: &str) -> usize {
    let len = self.text.len();
    let (start, end) = self.selection.map_or((len, len), |sel| {
      let start = floor_boundary(&self.text, sel.start);
      let end = floor_boundary(&self.text, sel.end).max(start);
      (start, end)
    });

    let mut before = self.text[..start].to_string();
    let after = &self.text[end..];
    if !before.is_empty() && !before.ends_with('\n') {
      before.push('\n');
    }
    let separator = if !after.is_empty() && !after.starts_with('\n') {
      "\n"
    } else {
      ""
    };

    let cursor = before.len() + snippet.len();
    let new_text = format!("{before}{snippet}{separator}{after}");
    self.apply_edit(new_text);
    self.selection = Some(Selection::caret(cursor));
    cursor
  }

  /// Allocate the draft's namespace if it has none yet.
  ///
  /// Repeated calls return the same namespace until [`reset`](Self::reset).
  pub fn reserve_namespace<A>(
    &mut self,
    allocator: &mut A,
    seed: Option<&str>,
  ) -> &AssetNamespace
  where
    A: NamespaceAllocator + ?Sized,
  {
    self.namespace.get_or_insert_with(|| {
      let namespace = allocator.allocate(seed);
      debug!("Reserved asset namespace {namespace}");
      namespace
    })
  }

  /// Mark an upload as started.
  ///
  /// # Errors
  ///
  /// Returns [`SessionError::UploadInFlight`] if another upload has not
  /// completed or been cancelled.
  pub fn begin_upload(&mut self) -> Result<UploadTicket, SessionError> {
    if self.in_flight.is_some() {
      return Err(SessionError::UploadInFlight);
    }
    let ticket = UploadTicket {
      token:    self.token,
      sequence: self.next_sequence,
    };
    self.next_sequence += 1;
    self.in_flight = Some(ticket);
    Ok(ticket)
  }

  /// Forget the in-flight upload; its response will be rejected as stale.
  pub const fn cancel_upload(&mut self) -> bool {
    self.in_flight.take().is_some()
  }

  /// Finish an upload and fold its batch into the draft.
  ///
  /// On success the draft is reconciled against the batch and the result is
  /// applied as a single undoable edit. `fallback_label` is the alt text for
  /// uploads nothing referenced.
  ///
  /// # Errors
  ///
  /// - [`SessionError::StaleTicket`] if the ticket is not the in-flight
  ///   upload of this session (cancelled, or started before a reset). The
  ///   in-flight state is left as is.
  /// - [`SessionError::Upload`] if the upload itself failed. The draft is not
  ///   touched and a new upload may be started.
  pub fn complete_upload(
    &mut self,
    ticket: UploadTicket,
    result: Result<UploadBatch, UploadError>,
    fallback_label: Option<&str>,
  ) -> Result<ReconcileReport, SessionError> {
    if ticket.token != self.token || self.in_flight != Some(ticket) {
      warn!("Ignoring upload response for stale ticket {ticket:?}");
      return Err(SessionError::StaleTicket);
    }
    self.in_flight = None;

    let batch = result?;
    let report = reconcile(&self.text, &batch, fallback_label);
    self.apply_edit(report.text.clone());
    info!("{}", report.summary());
    Ok(report)
  }

  /// Upload `files` through `service` and reconcile the draft, reserving a
  /// namespace first if needed.
  ///
  /// # Errors
  ///
  /// See [`begin_upload`](Self::begin_upload) and
  /// [`complete_upload`](Self::complete_upload).
  pub fn upload_with<S, A>(
    &mut self,
    service: &S,
    allocator: &mut A,
    files: &[PendingFile],
    fallback_label: Option<&str>,
  ) -> Result<ReconcileReport, SessionError>
  where
    S: UploadService + ?Sized,
    A: NamespaceAllocator + ?Sized,
  {
    let namespace = self.reserve_namespace(allocator, None).clone();
    let ticket = self.begin_upload()?;
    let result = service.upload(&namespace, files);
    self.complete_upload(ticket, result, fallback_label)
  }

  /// Abandon the draft.
  ///
  /// Clears text, history, selection and namespace, cancels any in-flight
  /// upload and moves to a new session token so late responses are ignored.
  pub fn reset(&mut self) {
    self.text.clear();
    self.history.clear();
    self.selection = None;
    self.namespace = None;
    self.in_flight = None;
    self.token = self.token.wrapping_add(1);
    debug!("Draft reset, session token now {}", self.token);
  }

  /// Package the draft for the persistence service.
  ///
  /// # Errors
  ///
  /// See [`PublishRequest::new`].
  pub fn publish_request(
    &self,
    title: &str,
  ) -> Result<PublishRequest, PublishError> {
    Ok(
      PublishRequest::new(self.text.clone(), title)?
        .with_namespace(self.namespace.clone()),
    )
  }
}

/// Clamp `offset` into `text` and back onto a char boundary.
fn floor_boundary(text: &str, offset: usize) -> usize {
  let mut offset = offset.min(text.len());
  while !text.is_char_boundary(offset) {
    offset -= 1;
  }
  offset
}
