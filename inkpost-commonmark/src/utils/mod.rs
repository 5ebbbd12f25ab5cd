use std::sync::LazyLock;

use comrak::{
  Arena,
  nodes::{AstNode, NodeValue},
  options::Options,
  parse_document,
};
use regex::Regex;

/// Everything a heading slug may keep: ASCII letters and digits, CJK
/// ideographs, whitespace and hyphens.
static SLUG_STRIP_RE: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"[^a-zA-Z0-9\x{4E00}-\x{9FFF}\s-]").unwrap_or_else(|e| {
    log::error!("Failed to compile SLUG_STRIP_RE regex: {e}");
    never_matching_regex()
  })
});

static WHITESPACE_RE: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"\s+").unwrap_or_else(|e| {
    log::error!("Failed to compile WHITESPACE_RE regex: {e}");
    never_matching_regex()
  })
});

/// Slug used when a heading has no usable text.
pub const FALLBACK_SLUG: &str = "heading";

/// Slugify heading text for use as an anchor id.
///
/// Trims, drops every character that is not an ASCII letter or digit, a CJK
/// ideograph, whitespace or `-`, turns whitespace runs into single hyphens and
/// lowercases ASCII. Text with nothing left becomes [`FALLBACK_SLUG`].
#[must_use]
pub fn slugify(text: &str) -> String {
  let stripped = SLUG_STRIP_RE.replace_all(text.trim(), "");
  let slug = WHITESPACE_RE
    .replace_all(&stripped, "-")
    .to_ascii_lowercase();
  if slug.is_empty() {
    FALLBACK_SLUG.to_string()
  } else {
    slug
  }
}

/// Escape `& < > " '` for inclusion in generated markup.
#[must_use]
pub fn escape_html(text: &str) -> String {
  html_escape::encode_double_quoted_attribute(text).replace('\'', "&#x27;")
}

/// Strip markdown formatting and return plain text.
///
/// Code blocks and raw HTML are dropped; paragraphs are separated by spaces.
#[must_use]
pub fn strip_markdown(content: &str) -> String {
  let arena = Arena::new();
  let mut options = Options::default();
  options.extension.table = true;
  options.extension.footnotes = true;
  options.extension.strikethrough = true;
  options.extension.tasklist = true;

  let root = parse_document(&arena, content, &options);

  #[allow(clippy::items_after_statements, reason = "Helper scoped for clarity")]
  fn extract_text<'a>(node: &'a AstNode<'a>, plain_text: &mut String) {
    match &node.data.borrow().value {
      NodeValue::Text(t) => plain_text.push_str(t),
      NodeValue::Code(c) => plain_text.push_str(&c.literal),
      NodeValue::SoftBreak | NodeValue::LineBreak => plain_text.push(' '),
      NodeValue::CodeBlock(_)
      | NodeValue::HtmlBlock(_)
      | NodeValue::HtmlInline(_) => return,
      _ => {},
    }
    for child in node.children() {
      extract_text(child, plain_text);
    }
    if matches!(
      node.data.borrow().value,
      NodeValue::Paragraph | NodeValue::Heading(_) | NodeValue::Item(_)
    ) {
      plain_text.push(' ');
    }
  }

  let mut plain_text = String::new();
  extract_text(root, &mut plain_text);
  WHITESPACE_RE.replace_all(plain_text.trim(), " ").into_owned()
}

/// Build a short plain-text excerpt of an article, cut on a word boundary.
#[must_use]
pub fn excerpt(content: &str, max_chars: usize) -> String {
  let plain = strip_markdown(content);
  if plain.chars().count() <= max_chars {
    return plain;
  }

  let cut: String = plain.chars().take(max_chars).collect();
  let trimmed = cut
    .rfind(char::is_whitespace)
    .map_or(cut.as_str(), |idx| &cut[..idx]);
  format!("{}…", trimmed.trim_end())
}

/// Create a regex that never matches anything.
///
/// This is used as a fallback pattern when a regex fails to compile.
#[must_use]
pub fn never_matching_regex() -> Regex {
  #[allow(
    clippy::expect_used,
    reason = "This pattern is guaranteed to be valid"
  )]
  Regex::new(r"[^\s\S]").expect("regex pattern [^\\s\\S] should always compile")
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_slugify_basic() {
    assert_eq!(slugify("Intro"), "intro");
    assert_eq!(slugify("  Hello   World  "), "hello-world");
    assert_eq!(slugify("C++ & Rust"), "c-rust");
    assert_eq!(slugify("snake_case_name"), "snakecasename");
  }

  #[test]
  fn test_slugify_keeps_cjk_and_hyphens() {
    assert_eq!(slugify("快速 开始"), "快速-开始");
    assert_eq!(slugify("Pre-release Notes"), "pre-release-notes");
  }

  #[test]
  fn test_slugify_fallback() {
    assert_eq!(slugify(""), FALLBACK_SLUG);
    assert_eq!(slugify("!!! ???"), "-");
    assert_eq!(slugify("🎉"), FALLBACK_SLUG);
  }

  #[test]
  fn test_escape_html_covers_quotes() {
    assert_eq!(
      escape_html(r#"<a href="x">Tom & 'Jerry'</a>"#),
      "&lt;a href=&quot;x&quot;&gt;Tom &amp; &#x27;Jerry&#x27;&lt;/a&gt;"
    );
  }

  #[test]
  fn test_strip_markdown() {
    let md = "# Title\n\nSome *emphasis* and `code`.\n\n```\nskipped\n```\n";
    assert_eq!(strip_markdown(md), "Title Some emphasis and code.");
  }

  #[test]
  fn test_excerpt_cuts_on_word_boundary() {
    let md = "The quick brown fox jumps over the lazy dog.";
    assert_eq!(excerpt(md, 18), "The quick brown…");
    assert_eq!(excerpt("Short.", 80), "Short.");
  }
}
