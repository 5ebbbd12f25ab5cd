//! Asset namespaces: the storage folder that holds one article's uploads.
use std::{collections::HashSet, fmt};

use serde::{Deserialize, Serialize};

/// Storage folder associated with a single document.
///
/// Once a draft has been given a namespace it keeps it until the draft is
/// reset; see `EditingSession::reserve_namespace` in `inkpost-editor`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssetNamespace(String);

impl AssetNamespace {
  /// Wrap an existing namespace string, e.g. one read back from a saved post.
  ///
  /// Returns `None` for empty or whitespace-only input.
  #[must_use]
  pub fn new(name: impl Into<String>) -> Option<Self> {
    let name = name.into();
    let trimmed = name.trim().trim_matches('/');
    if trimmed.is_empty() {
      None
    } else {
      Some(Self(trimmed.to_string()))
    }
  }

  #[must_use]
  pub fn as_str(&self) -> &str {
    &self.0
  }
}

impl fmt::Display for AssetNamespace {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}

impl AsRef<str> for AssetNamespace {
  fn as_ref(&self) -> &str {
    &self.0
  }
}

/// Hands out fresh namespaces for new drafts.
pub trait NamespaceAllocator {
  /// Allocate a namespace that has not been handed out before.
  ///
  /// `seed` is usually the draft's title or slug; allocators may ignore it.
  fn allocate(&mut self, seed: Option<&str>) -> AssetNamespace;
}

/// Allocator deriving namespaces from a slug of the seed.
///
/// The first request for a slug gets the bare slug, later requests get a
/// numeric suffix. Seeds that slugify to nothing fall back to `draft`.
#[derive(Debug, Default, Clone)]
pub struct SlugNamespaceAllocator {
  issued: HashSet<String>,
}

impl SlugNamespaceAllocator {
  #[must_use]
  pub fn new() -> Self {
    Self::default()
  }

  /// Mark namespaces that already exist in storage as taken.
  #[must_use]
  pub fn with_existing<I, S>(mut self, existing: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    self.issued.extend(existing.into_iter().map(Into::into));
    self
  }
}

impl NamespaceAllocator for SlugNamespaceAllocator {
  fn allocate(&mut self, seed: Option<&str>) -> AssetNamespace {
    let base = seed.map(namespace_slug).unwrap_or_default();
    let base = if base.is_empty() {
      "draft".to_string()
    } else {
      base
    };

    let mut candidate = base.clone();
    let mut n = 1;
    while self.issued.contains(&candidate) {
      n += 1;
      candidate = format!("{base}-{n}");
    }

    log::debug!("Allocated asset namespace {candidate}");
    self.issued.insert(candidate.clone());
    AssetNamespace(candidate)
  }
}

/// Reduce a seed to a storage-safe folder name: lowercase ASCII letters,
/// digits and single dashes.
fn namespace_slug(seed: &str) -> String {
  let mut slug = String::with_capacity(seed.len());
  for c in seed.chars() {
    if c.is_ascii_alphanumeric() {
      slug.push(c.to_ascii_lowercase());
    } else if !slug.is_empty() && !slug.ends_with('-') {
      slug.push('-');
    }
  }
  slug.trim_end_matches('-').to_string()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_namespace_rejects_blank() {
    assert!(AssetNamespace::new("   ").is_none());
    assert!(AssetNamespace::new("/").is_none());
    assert_eq!(
      AssetNamespace::new("/my-post/").map(|ns| ns.to_string()),
      Some("my-post".to_string())
    );
  }

  #[test]
  fn test_allocator_uses_seed_slug() {
    let mut alloc = SlugNamespaceAllocator::new();
    let ns = alloc.allocate(Some("Hello, World!"));
    assert_eq!(ns.as_str(), "hello-world");
  }

  #[test]
  fn test_allocator_never_repeats() {
    let mut alloc = SlugNamespaceAllocator::new().with_existing(["notes"]);
    assert_eq!(alloc.allocate(Some("Notes")).as_str(), "notes-2");
    assert_eq!(alloc.allocate(Some("Notes")).as_str(), "notes-3");
    assert_eq!(alloc.allocate(None).as_str(), "draft");
    assert_eq!(alloc.allocate(Some("???")).as_str(), "draft-2");
  }
}
