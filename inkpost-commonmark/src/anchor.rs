//! In-page anchor navigation.
//!
//! Clicking a `#fragment` link in a rendered article should land on the
//! heading it names even when the fragment was typed by hand (`#Getting
//! Started` instead of `#getting-started`). [`navigate`] decides what the view
//! does; the lookup of element ids is abstracted behind [`ElementLookup`] so
//! the decision can be made against a live document or a precomputed index.
use std::collections::HashSet;

use log::warn;
use percent_encoding::percent_decode_str;
use serde::Serialize;

use crate::{types::Header, utils::slugify};

/// Answers whether an element with a given id exists.
pub trait ElementLookup {
  fn contains_id(&self, id: &str) -> bool;
}

impl ElementLookup for HashSet<String> {
  fn contains_id(&self, id: &str) -> bool {
    self.contains(id)
  }
}

/// Element ids of one rendered article.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnchorIndex {
  ids: HashSet<String>,
}

impl AnchorIndex {
  /// Collect every `id` attribute in `html`.
  #[must_use]
  pub fn from_html(html: &str) -> Self {
    use tendril::TendrilSink;

    let document = kuchikikiki::parse_html().one(html);
    let ids = document
      .select("[id]")
      .map(|elements| {
        elements
          .filter_map(|element| {
            element
              .attributes
              .borrow()
              .get("id")
              .map(std::string::ToString::to_string)
          })
          .collect()
      })
      .unwrap_or_default();
    Self { ids }
  }

  /// Index the heading ids of a render.
  #[must_use]
  pub fn from_headers(headers: &[Header]) -> Self {
    Self {
      ids: headers.iter().map(|header| header.id.clone()).collect(),
    }
  }

  #[must_use]
  pub fn len(&self) -> usize {
    self.ids.len()
  }

  #[must_use]
  pub fn is_empty(&self) -> bool {
    self.ids.is_empty()
  }
}

impl ElementLookup for AnchorIndex {
  fn contains_id(&self, id: &str) -> bool {
    self.ids.contains(id)
  }
}

/// What the article view should do for a clicked link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum AnchorNavigation {
  /// Not an in-page link; let the browser navigate.
  NotAnchor,
  /// Scroll smoothly to the element and show `#id` in the location bar
  /// without navigating.
  ScrollTo { id: String },
  /// No such element; set the location fragment and let the browser try.
  SetFragment { fragment: String },
}

impl AnchorNavigation {
  /// Fragment to show in the location bar, including the `#`.
  #[must_use]
  pub fn location_fragment(&self) -> Option<String> {
    match self {
      Self::NotAnchor => None,
      Self::ScrollTo { id } => Some(format!("#{id}")),
      Self::SetFragment { fragment } => Some(format!("#{fragment}")),
    }
  }
}

/// Decide how to follow `href` within the current article.
///
/// The fragment is percent-decoded and looked up as an exact id first, then
/// as the slug of the decoded text.
#[must_use]
pub fn navigate(href: &str, lookup: &impl ElementLookup) -> AnchorNavigation {
  let Some(raw) = href.strip_prefix('#') else {
    return AnchorNavigation::NotAnchor;
  };

  let decoded = match percent_decode_str(raw).decode_utf8() {
    Ok(decoded) => decoded.into_owned(),
    Err(e) => {
      warn!("Could not decode anchor fragment {raw}: {e}");
      raw.to_string()
    },
  };

  if !decoded.is_empty() {
    if lookup.contains_id(&decoded) {
      return AnchorNavigation::ScrollTo { id: decoded };
    }
    let slug = slugify(&decoded);
    if lookup.contains_id(&slug) {
      return AnchorNavigation::ScrollTo { id: slug };
    }
  }

  AnchorNavigation::SetFragment {
    fragment: raw.to_string(),
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn index(ids: &[&str]) -> HashSet<String> {
    ids.iter().map(|id| (*id).to_string()).collect()
  }

  #[test]
  fn test_non_fragment_links_are_ignored() {
    let ids = index(&["intro"]);
    assert_eq!(navigate("https://example.com", &ids), AnchorNavigation::NotAnchor);
    assert_eq!(navigate("intro", &ids), AnchorNavigation::NotAnchor);
    assert_eq!(AnchorNavigation::NotAnchor.location_fragment(), None);
  }

  #[test]
  fn test_exact_id_wins() {
    let ids = index(&["Intro", "intro"]);
    assert_eq!(navigate("#Intro", &ids), AnchorNavigation::ScrollTo {
      id: "Intro".into(),
    });
  }

  #[test]
  fn test_decoded_fragment_is_slugified() {
    let ids = index(&["getting-started", "快速-开始"]);
    assert_eq!(
      navigate("#Getting%20Started", &ids),
      AnchorNavigation::ScrollTo {
        id: "getting-started".into(),
      }
    );
    assert_eq!(
      navigate("#%E5%BF%AB%E9%80%9F%20%E5%BC%80%E5%A7%8B", &ids),
      AnchorNavigation::ScrollTo {
        id: "快速-开始".into(),
      }
    );
  }

  #[test]
  fn test_miss_sets_fragment_directly() {
    let ids = index(&["intro"]);
    let nav = navigate("#missing%20part", &ids);
    assert_eq!(nav, AnchorNavigation::SetFragment {
      fragment: "missing%20part".into(),
    });
    assert_eq!(nav.location_fragment().as_deref(), Some("#missing%20part"));
  }

  #[test]
  fn test_undecodable_fragment_falls_back_to_raw() {
    let ids = index(&["%ff"]);
    assert_eq!(navigate("#%ff", &ids), AnchorNavigation::ScrollTo {
      id: "%ff".into(),
    });
  }

  #[test]
  fn test_empty_fragment() {
    let ids = index(&["heading"]);
    assert_eq!(navigate("#", &ids), AnchorNavigation::SetFragment {
      fragment: String::new(),
    });
  }
}
