//! What a draft hands to the persistence service on publish.
use inkpost_assets::AssetNamespace;
use serde::{Deserialize, Serialize};

use crate::error::PublishError;

/// Raw Markdown plus the metadata a post is stored with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishRequest {
  pub markdown:  String,
  pub title:     String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub excerpt:   Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub category:  Option<String>,
  #[serde(default)]
  pub tags:      Vec<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub namespace: Option<AssetNamespace>,
}

impl PublishRequest {
  /// Start a request for `markdown` titled `title`.
  ///
  /// # Errors
  ///
  /// Returns [`PublishError::MissingTitle`] for a blank title and
  /// [`PublishError::EmptyDraft`] for a blank body.
  pub fn new(
    markdown: impl Into<String>,
    title: &str,
  ) -> Result<Self, PublishError> {
    let markdown = markdown.into();
    let title = title.trim();
    if title.is_empty() {
      return Err(PublishError::MissingTitle);
    }
    if markdown.trim().is_empty() {
      return Err(PublishError::EmptyDraft);
    }

    Ok(Self {
      markdown,
      title: title.to_string(),
      excerpt: None,
      category: None,
      tags: Vec::new(),
      namespace: None,
    })
  }

  #[must_use]
  pub fn with_excerpt(mut self, excerpt: impl Into<String>) -> Self {
    let excerpt = excerpt.into();
    self.excerpt = (!excerpt.trim().is_empty()).then_some(excerpt);
    self
  }

  #[must_use]
  pub fn with_category(mut self, category: impl Into<String>) -> Self {
    let category = category.into();
    self.category = (!category.trim().is_empty()).then_some(category);
    self
  }

  /// Set tags, trimmed, without blanks or repeats, in first-seen order.
  #[must_use]
  pub fn with_tags<I, S>(mut self, tags: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
  {
    self.tags.clear();
    for tag in tags {
      let tag = tag.as_ref().trim();
      if !tag.is_empty() && !self.tags.iter().any(|t| t == tag) {
        self.tags.push(tag.to_string());
      }
    }
    self
  }

  #[must_use]
  pub fn with_namespace(mut self, namespace: Option<AssetNamespace>) -> Self {
    self.namespace = namespace;
    self
  }
}
