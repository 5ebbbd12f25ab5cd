//! Rewriting draft image references after an upload completes.
//!
//! Writers usually type `![alt](photo.png)` before the file exists anywhere.
//! Once storage returns URLs for a batch, each uploaded file is matched to the
//! first pending reference with the same file name and that reference's path
//! is replaced by the URL. Uploads nobody referenced are appended to the end
//! of the draft so they are not lost.
//!
//! Matching is by basename only, so two different files that share a name in
//! different folders cannot be told apart.
use std::sync::LazyLock;

use indexmap::IndexMap;
use log::{debug, trace};
use percent_encoding::percent_decode_str;
use regex::Regex;
use serde::Serialize;

use crate::upload::UploadBatch;

/// `![alt](path)` with an optional `"title"`. The path runs up to the title
/// or the closing parenthesis and may contain spaces (`Screen Shot.png`);
/// the `<...>` form is accepted too.
static IMAGE_REF_RE: LazyLock<Option<Regex>> = LazyLock::new(|| {
  Regex::new(
    r#"!\[(?P<alt>[^\]]*)\]\(\s*(?P<path><[^>\n]*>|[^)\n]*?)(?P<title>\s+"[^"\n]*")?\s*\)"#,
  )
  .map_err(|e| log::error!("Failed to compile IMAGE_REF_RE regex: {e}"))
  .ok()
});

/// Outcome of a reconciliation pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReconcileReport {
  /// The rewritten draft.
  pub text: String,

  /// References whose path was replaced by an uploaded URL.
  pub matched_count: usize,

  /// Image references present in the draft before reconciling.
  pub total_references_before: usize,

  /// Uploads that matched nothing and were appended as new references.
  pub appended_count: usize,
}

impl ReconcileReport {
  /// Whether every pre-existing reference was satisfied by the batch.
  #[must_use]
  pub const fn is_complete(&self) -> bool {
    self.total_references_before == 0
      || self.matched_count == self.total_references_before
  }

  /// Human readable status line for the writer.
  #[must_use]
  pub fn summary(&self) -> String {
    if self.is_complete() {
      if self.appended_count > 0 {
        format!(
          "All images imported; {} new image(s) added at the end",
          self.appended_count
        )
      } else {
        "All images imported".to_string()
      }
    } else {
      format!(
        "{} of {} images imported automatically; please complete the rest \
         manually",
        self.matched_count, self.total_references_before
      )
    }
  }
}

/// Count `![...](...)` references in `text`.
#[must_use]
pub fn count_image_references(text: &str) -> usize {
  IMAGE_REF_RE
    .as_ref()
    .map_or(0, |re| re.find_iter(text).count())
}

/// Point image references in `draft` at the URLs in `batch`.
///
/// A batch entry replaces at most one reference (the first whose basename
/// matches); if the batch names a file twice, the later URL wins. Entries
/// left over are appended as `![label](url)` lines, using `fallback_label`
/// when it is non-blank and the file name otherwise.
#[must_use]
pub fn reconcile(
  draft: &str,
  batch: &UploadBatch,
  fallback_label: Option<&str>,
) -> ReconcileReport {
  let total_references_before = count_image_references(draft);

  let mut pending: IndexMap<&str, &str> = IndexMap::with_capacity(batch.len());
  for asset in batch {
    pending.insert(asset.filename.as_str(), asset.url.as_str());
  }

  if pending.is_empty() {
    return ReconcileReport {
      text: draft.to_string(),
      matched_count: 0,
      total_references_before,
      appended_count: 0,
    };
  }

  let mut text = String::with_capacity(draft.len() + batch.len() * 64);
  let mut matched_count = 0;
  let mut last = 0;

  if let Some(re) = IMAGE_REF_RE.as_ref() {
    for caps in re.captures_iter(draft) {
      let Some(path) = caps.name("path") else {
        continue;
      };
      let candidate = basename(path.as_str());
      if candidate.is_empty() {
        continue;
      }

      let url = pending.shift_remove(candidate).or_else(|| {
        let decoded = percent_decode_str(candidate).decode_utf8_lossy();
        pending.shift_remove(&*decoded)
      });

      if let Some(url) = url {
        trace!("Matched image reference {} -> {url}", path.as_str());
        text.push_str(&draft[last..path.start()]);
        text.push_str(url);
        last = path.end();
        matched_count += 1;
      }
    }
  }
  text.push_str(&draft[last..]);

  let appended_count = pending.len();
  if appended_count > 0 {
    if !text.is_empty() && !text.ends_with('\n') {
      text.push('\n');
    }
    let label = fallback_label.filter(|label| !label.trim().is_empty());
    let lines: Vec<String> = pending
      .iter()
      .map(|(filename, url)| {
        format!("![{}]({url})", escape_label(label.unwrap_or(*filename)))
      })
      .collect();
    text.push_str(&lines.join("\n"));
  }

  debug!(
    "Reconciled upload batch: {matched_count}/{total_references_before} \
     references matched, {appended_count} appended"
  );

  ReconcileReport {
    text,
    matched_count,
    total_references_before,
    appended_count,
  }
}

/// Last path segment, splitting on both separators, without `<...>`.
fn basename(path: &str) -> &str {
  let path = path
    .strip_prefix('<')
    .and_then(|p| p.strip_suffix('>'))
    .unwrap_or(path);
  path.rsplit(['/', '\\']).next().unwrap_or(path)
}

fn escape_label(label: &str) -> String {
  label.replace('[', "\\[").replace(']', "\\]")
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_basename_splits_both_separators() {
    assert_eq!(basename("img/shots/a.png"), "a.png");
    assert_eq!(basename(r"C:\shots\a.png"), "a.png");
    assert_eq!(basename("<my dir/a b.png>"), "a b.png");
    assert_eq!(basename("a.png"), "a.png");
  }

  #[test]
  fn test_count_includes_titles_and_empty_paths() {
    let draft = "![a](x.png) ![b](y.png \"Title\") ![c]()";
    assert_eq!(count_image_references(draft), 3);
    assert_eq!(count_image_references("![s](My Shot.png) (aside)"), 1);
  }

  #[test]
  fn test_summary_wording() {
    let report = ReconcileReport {
      text: String::new(),
      matched_count: 1,
      total_references_before: 2,
      appended_count: 0,
    };
    assert!(!report.is_complete());
    assert_eq!(
      report.summary(),
      "1 of 2 images imported automatically; please complete the rest manually"
    );
  }

  #[test]
  fn test_label_brackets_are_escaped() {
    let batch: UploadBatch =
      [("a.png", "https://cdn/a.png")].into_iter().collect();
    let report = reconcile("", &batch, Some("[draft]"));
    assert_eq!(report.text, "![\\[draft\\]](https://cdn/a.png)");
  }
}
