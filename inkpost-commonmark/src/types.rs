//! Types for inkpost-commonmark public API and internal use.
use serde::{Deserialize, Serialize};

/// Represents a heading in a rendered article.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Header {
  /// Heading text (inline content, no markdown formatting).
  pub text:  String,
  /// Heading level (1-6).
  pub level: u8,
  /// Anchor id assigned to the heading, unique within one render.
  pub id:    String,
}

/// Result of rendering an article.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RenderResult {
  /// Rendered HTML output.
  pub html: String,

  /// Headings in document order (for a table of contents or anchor lookup).
  pub headers: Vec<Header>,

  /// Title of the article, if found (first level 1 heading).
  pub title: Option<String>,
}
