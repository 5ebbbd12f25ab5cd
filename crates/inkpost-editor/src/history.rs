//! Bounded, strictly linear undo/redo history of whole-buffer snapshots.
use std::{collections::VecDeque, mem};

/// Undo depth used when nothing else is configured.
pub const DEFAULT_HISTORY_LIMIT: usize = 200;

/// Undo and redo stacks of draft snapshots.
///
/// Recording a new snapshot clears the redo stack; there is no branching.
/// When the undo stack exceeds its limit the oldest snapshot is dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditHistory {
  undo:  VecDeque<String>,
  redo:  Vec<String>,
  limit: usize,
}

impl Default for EditHistory {
  fn default() -> Self {
    Self::with_limit(DEFAULT_HISTORY_LIMIT)
  }
}

impl EditHistory {
  #[must_use]
  pub fn new() -> Self {
    Self::default()
  }

  /// Create a history keeping at most `limit` undo steps (at least one).
  #[must_use]
  pub fn with_limit(limit: usize) -> Self {
    let limit = limit.max(1);
    Self {
      undo: VecDeque::with_capacity(limit.min(DEFAULT_HISTORY_LIMIT)),
      redo: Vec::new(),
      limit,
    }
  }

  #[must_use]
  pub const fn limit(&self) -> usize {
    self.limit
  }

  /// Record the text as it was before an edit.
  pub fn record(&mut self, previous: String) {
    self.redo.clear();
    self.push_undo(previous);
  }

  /// Swap `current` with the most recent undo snapshot.
  ///
  /// Returns `false` and leaves `current` alone when there is nothing to
  /// undo.
  pub fn undo(&mut self, current: &mut String) -> bool {
    let Some(previous) = self.undo.pop_back() else {
      return false;
    };
    self.redo.push(mem::replace(current, previous));
    true
  }

  /// Swap `current` with the most recently undone snapshot.
  pub fn redo(&mut self, current: &mut String) -> bool {
    let Some(next) = self.redo.pop() else {
      return false;
    };
    let undone = mem::replace(current, next);
    self.push_undo(undone);
    true
  }

  #[must_use]
  pub fn can_undo(&self) -> bool {
    !self.undo.is_empty()
  }

  #[must_use]
  pub fn can_redo(&self) -> bool {
    !self.redo.is_empty()
  }

  #[must_use]
  pub fn undo_len(&self) -> usize {
    self.undo.len()
  }

  #[must_use]
  pub fn redo_len(&self) -> usize {
    self.redo.len()
  }

  /// Drop all history.
  pub fn clear(&mut self) {
    self.undo.clear();
    self.redo.clear();
  }

  fn push_undo(&mut self, snapshot: String) {
    self.undo.push_back(snapshot);
    while self.undo.len() > self.limit {
      self.undo.pop_front();
    }
  }
}
