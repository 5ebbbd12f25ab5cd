//! Path resolution for image and link references.
//!
//! Writers reference images in many ways: paths relative to the draft,
//! Windows paths pasted from a file manager, paths into the upload or avatar
//! storage roots, or complete URLs. [`AssetResolver::resolve`] turns any of
//! these into something the article view can fetch.
use log::trace;
use percent_encoding::{AsciiSet, CONTROLS, percent_decode_str, utf8_percent_encode};
use serde::{Deserialize, Serialize};

use crate::namespace::AssetNamespace;

/// Characters escaped when building storage URLs. Mirrors `encodeURI`:
/// reserved URL punctuation such as `/`, `?` and `#` is left alone.
const URI_PATH: &AsciiSet = &CONTROLS
  .add(b' ')
  .add(b'"')
  .add(b'%')
  .add(b'<')
  .add(b'>')
  .add(b'[')
  .add(b'\\')
  .add(b']')
  .add(b'^')
  .add(b'`')
  .add(b'{')
  .add(b'|')
  .add(b'}');

/// Resolves raw references against the site's asset storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetResolver {
  origin:       String,
  uploads_root: String,
  avatar_root:  String,
}

impl Default for AssetResolver {
  fn default() -> Self {
    Self::new("", "uploads", "avatars")
  }
}

impl AssetResolver {
  /// Create a resolver for `origin` (e.g. `https://cdn.example.com`) with the
  /// given storage roots. Surrounding slashes are ignored.
  #[must_use]
  pub fn new(origin: &str, uploads_root: &str, avatar_root: &str) -> Self {
    Self {
      origin:       origin.trim().trim_end_matches('/').to_string(),
      uploads_root: uploads_root.trim().trim_matches('/').to_string(),
      avatar_root:  avatar_root.trim().trim_matches('/').to_string(),
    }
  }

  #[must_use]
  pub fn origin(&self) -> &str {
    &self.origin
  }

  #[must_use]
  pub fn uploads_root(&self) -> &str {
    &self.uploads_root
  }

  /// Resolve `raw` into a fetchable reference.
  ///
  /// Never fails: input that cannot be made absolute comes back as a
  /// normalized relative path.
  #[must_use]
  pub fn resolve(&self, raw: &str, namespace: Option<&AssetNamespace>) -> String {
    if raw.is_empty() || is_absolute_url(raw) || is_opaque_reference(raw) {
      return raw.to_string();
    }

    let normalized = normalize_path(raw);

    if let Some(storage_path) = self.storage_path(&normalized) {
      let resolved = format!("{}/{storage_path}", self.origin);
      trace!("Resolved storage path {raw} -> {resolved}");
      return resolved;
    }

    if normalized.starts_with('/') {
      return normalized;
    }

    match namespace {
      Some(ns) if !normalized.is_empty() => {
        let joined = format!("{}/{ns}/{normalized}", self.uploads_root);
        let resolved = format!("{}/{}", self.origin, encode_uri_path(&joined));
        trace!("Resolved {raw} into namespace {ns}: {resolved}");
        resolved
      },
      _ => normalized,
    }
  }

  /// If `path` points into the uploads or avatar root, return it without its
  /// leading slash.
  fn storage_path<'p>(&self, path: &'p str) -> Option<&'p str> {
    let relative = path.trim_start_matches('/');
    [&self.uploads_root, &self.avatar_root]
      .into_iter()
      .filter(|root| !root.is_empty())
      .any(|root| {
        relative
          .strip_prefix(root.as_str())
          .is_some_and(|rest| rest.starts_with('/'))
      })
      .then_some(relative)
  }
}

/// `http://`, `https://` or scheme-relative `//`, case-insensitively.
fn is_absolute_url(raw: &str) -> bool {
  let lower = raw.get(..8).unwrap_or(raw).to_ascii_lowercase();
  lower.starts_with("//")
    || lower.starts_with("http://")
    || lower.starts_with("https://")
}

/// Fragments, queries and URIs with a non-HTTP scheme (`mailto:`, `data:`)
/// are left for the browser. A single letter before `:` is a drive letter.
fn is_opaque_reference(raw: &str) -> bool {
  if raw.starts_with('#') || raw.starts_with('?') {
    return true;
  }
  let Some((scheme, _)) = raw.split_once(':') else {
    return false;
  };
  let mut chars = scheme.chars();
  scheme.len() >= 2
    && chars.next().is_some_and(|c| c.is_ascii_alphabetic())
    && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

/// Normalize separators and drop `.`/`..` segments.
///
/// Parent traversal is never honored: `../../etc/secret` becomes
/// `etc/secret`.
#[must_use]
pub fn normalize_path(raw: &str) -> String {
  let unified = raw.trim().replace('\\', "/");
  let rooted = unified.starts_with('/');

  let segments: Vec<&str> = unified
    .split('/')
    .filter(|segment| !matches!(*segment, "." | ".."))
    .skip_while(|segment| segment.is_empty())
    .collect();

  let joined = segments.join("/");
  if rooted {
    format!("/{joined}")
  } else {
    joined
  }
}

/// Percent-encode a storage path, decoding existing escapes first so that
/// already-encoded input is not encoded twice.
fn encode_uri_path(path: &str) -> String {
  let decoded = percent_decode_str(path).decode_utf8_lossy();
  utf8_percent_encode(&decoded, URI_PATH).to_string()
}
