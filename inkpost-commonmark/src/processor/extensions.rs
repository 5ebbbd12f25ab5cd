//! Tree rewrites applied to every rendered article.
//!
//! Three rewrites run over each document: highlight-mark splitting,
//! heading-id assignment and code-span classification. Each one is planned
//! against the tree as parsed and only then applied, so none of them sees
//! another's output.
//!
//! The text-level decisions (`split_highlight_marks`, `classify_code_span`)
//! are plain functions over strings and can be used without a tree.
use std::sync::LazyLock;

use comrak::nodes::{AstNode, NodeHeading, NodeHtmlBlock, NodeValue};
use log::trace;
use regex::Regex;

use super::types::{HeadingSlugTable, NodeAlloc};
use crate::{types::Header, utils};

/// `==content==`, content excluding `=`.
static HIGHLIGHT_RE: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"==([^=]+)==").unwrap_or_else(|e| {
    log::error!("Failed to compile HIGHLIGHT_RE regex: {e}");
    utils::never_matching_regex()
  })
});

/// A piece of a text node after highlight splitting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextSegment {
  /// Plain text, kept as a text node.
  Text(String),
  /// Highlighted content, emitted as a `<mark>` element.
  Mark(String),
}

/// Split `text` around `==highlight==` markers.
///
/// Returns `None` when there is no marker, in which case the text node is
/// left as it is.
#[must_use]
pub fn split_highlight_marks(text: &str) -> Option<Vec<TextSegment>> {
  let mut segments = Vec::new();
  let mut last = 0;

  for caps in HIGHLIGHT_RE.captures_iter(text) {
    let (Some(whole), Some(content)) = (caps.get(0), caps.get(1)) else {
      continue;
    };
    if whole.start() > last {
      segments.push(TextSegment::Text(text[last..whole.start()].to_string()));
    }
    segments.push(TextSegment::Mark(content.as_str().to_string()));
    last = whole.end();
  }

  if segments.is_empty() {
    return None;
  }
  if last < text.len() {
    segments.push(TextSegment::Text(text[last..].to_string()));
  }
  Some(segments)
}

/// Markup for a highlighted run.
#[must_use]
pub fn mark_html(content: &str) -> String {
  format!(
    "<mark class=\"highlight\">{}</mark>",
    utils::escape_html(content)
  )
}

/// A piece of an inline code span.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InlineSegment {
  Code(String),
  Text(String),
}

/// How a code node is rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodeSpan {
  /// A framed block with an optional language.
  Block {
    language: Option<String>,
    code:     String,
  },
  /// Inline code, possibly interleaved with plain text.
  Inline(Vec<InlineSegment>),
}

impl CodeSpan {
  #[must_use]
  pub const fn is_block(&self) -> bool {
    matches!(self, Self::Block { .. })
  }
}

/// Decide whether a code node renders as a block or inline.
///
/// Anything with a newline or a language tag is a block. Inline spans that
/// contain an even number of backticks are split on them: even-indexed
/// pieces are code, odd-indexed pieces are text, and empty pieces are
/// dropped.
#[must_use]
pub fn classify_code_span(literal: &str, language: Option<&str>) -> CodeSpan {
  let language = language.map(str::trim).filter(|lang| !lang.is_empty());
  if literal.contains('\n') || language.is_some() {
    return CodeSpan::Block {
      language: language.map(str::to_string),
      code:     literal.to_string(),
    };
  }
  CodeSpan::Inline(split_inline_code(literal))
}

fn split_inline_code(literal: &str) -> Vec<InlineSegment> {
  let ticks = literal.matches('`').count();
  if ticks == 0 || ticks % 2 == 1 {
    return vec![InlineSegment::Code(literal.to_string())];
  }

  let segments: Vec<InlineSegment> = literal
    .split('`')
    .enumerate()
    .filter(|(_, piece)| !piece.is_empty())
    .map(|(index, piece)| {
      if index % 2 == 0 {
        InlineSegment::Code(piece.to_string())
      } else {
        InlineSegment::Text(piece.to_string())
      }
    })
    .collect();

  if segments.is_empty() {
    vec![InlineSegment::Code(literal.to_string())]
  } else {
    segments
  }
}

/// Framed code block markup: a three-dot chrome bar above the code.
#[must_use]
pub fn code_block_html(language: Option<&str>, code: &str) -> String {
  let (data_attr, class_attr) = language.map_or_else(
    || (String::new(), String::new()),
    |lang| {
      let lang = utils::escape_html(lang);
      (
        format!(" data-language=\"{lang}\""),
        format!(" class=\"language-{lang}\""),
      )
    },
  );
  let code = code.strip_suffix('\n').unwrap_or(code);
  let dot = "<span class=\"code-chrome-dot\"></span>";
  let chrome =
    format!("<div class=\"code-chrome\" aria-hidden=\"true\">{dot}{dot}{dot}</div>");
  format!(
    "<div class=\"code-block\"{data_attr}>{chrome}<pre><code{class_attr}>{}</code></pre></div>\n",
    utils::escape_html(code)
  )
}

/// Inline code markup with interleaved text.
#[must_use]
pub fn inline_code_html(segments: &[InlineSegment]) -> String {
  segments
    .iter()
    .map(|segment| {
      match segment {
        InlineSegment::Code(code) => {
          format!("<code>{}</code>", utils::escape_html(code))
        },
        InlineSegment::Text(text) => utils::escape_html(text),
      }
    })
    .collect()
}

/// Flatten a node's inline content into plain text.
///
/// Markup wrappers (emphasis, links, ...) contribute their text; raw HTML is
/// skipped.
pub fn extract_inline_text<'a>(node: &'a AstNode<'a>) -> String {
  let mut text = String::new();
  for child in node.children() {
    match &child.data.borrow().value {
      NodeValue::Text(t) => text.push_str(t),
      NodeValue::Code(code) => text.push_str(&code.literal),
      NodeValue::SoftBreak | NodeValue::LineBreak => text.push(' '),
      NodeValue::HtmlInline(_) => {},
      _ => text.push_str(&extract_inline_text(child)),
    }
  }
  text
}

/// Text nodes to split, in document order.
pub(crate) fn plan_highlights<'a>(
  root: &'a AstNode<'a>,
) -> Vec<(&'a AstNode<'a>, Vec<TextSegment>)> {
  root
    .descendants()
    .filter(|node| {
      !node
        .parent()
        .is_some_and(|p| matches!(p.data.borrow().value, NodeValue::Image(_)))
    })
    .filter_map(|node| {
      let segments = match &node.data.borrow().value {
        NodeValue::Text(t) => split_highlight_marks(t)?,
        _ => return None,
      };
      Some((node, segments))
    })
    .collect()
}

pub(crate) fn apply_highlight<'a>(
  node: &'a AstNode<'a>,
  segments: Vec<TextSegment>,
  alloc: &NodeAlloc<'a>,
) {
  for segment in segments {
    let value = match segment {
      TextSegment::Text(text) => NodeValue::Text(text.into()),
      TextSegment::Mark(content) => NodeValue::HtmlInline(mark_html(&content)),
    };
    node.insert_before(alloc(value));
  }
  node.detach();
}

/// Headings in document order with the id each one receives.
pub(crate) fn plan_heading_ids<'a>(
  root: &'a AstNode<'a>,
  slugs: &mut HeadingSlugTable,
) -> Vec<(&'a AstNode<'a>, Header)> {
  let mut planned = Vec::new();
  for node in root.descendants() {
    let level = match node.data.borrow().value {
      NodeValue::Heading(NodeHeading { level, .. }) => level,
      _ => continue,
    };
    let text = extract_inline_text(node).trim().to_string();
    let id = slugs.assign(&utils::slugify(&text));
    planned.push((node, Header { text, level, id }));
  }
  planned
}

/// Marker read back by the HTML post-processor, which moves the id onto the
/// heading element.
pub(crate) fn apply_heading_id<'a>(
  node: &'a AstNode<'a>,
  id: &str,
  alloc: &NodeAlloc<'a>,
) {
  node.prepend(alloc(NodeValue::HtmlInline(format!("<!-- anchor: {id} -->"))));
}

/// Code nodes whose rendering differs from comrak's default.
pub(crate) fn plan_code_spans<'a>(
  root: &'a AstNode<'a>,
) -> Vec<(&'a AstNode<'a>, CodeSpan)> {
  root
    .descendants()
    .filter_map(|node| {
      let span = match &node.data.borrow().value {
        NodeValue::Code(code) => {
          let span = classify_code_span(&code.literal, None);
          let unchanged = CodeSpan::Inline(vec![InlineSegment::Code(
            code.literal.clone(),
          )]);
          if span == unchanged {
            return None;
          }
          span
        },
        NodeValue::CodeBlock(block) => {
          classify_code_span(
            &block.literal,
            block.info.split_whitespace().next(),
          )
        },
        _ => return None,
      };
      Some((node, span))
    })
    .collect()
}

pub(crate) fn apply_code_span<'a>(
  node: &'a AstNode<'a>,
  span: CodeSpan,
  alloc: &NodeAlloc<'a>,
) {
  let original_code = match &node.data.borrow().value {
    NodeValue::Code(code) => Some(code.clone()),
    _ => None,
  };

  match (original_code, span) {
    (Some(code), CodeSpan::Inline(segments)) => {
      trace!("Splitting inline code span into {} parts", segments.len());
      for segment in segments {
        let value = match segment {
          InlineSegment::Code(literal) => {
            let mut piece = code.clone();
            piece.literal = literal;
            NodeValue::Code(piece)
          },
          InlineSegment::Text(text) => NodeValue::Text(text.into()),
        };
        node.insert_before(alloc(value));
      }
      node.detach();
    },
    (Some(_), CodeSpan::Block { language, code }) => {
      node.data.borrow_mut().value =
        NodeValue::HtmlInline(code_block_html(language.as_deref(), &code));
    },
    (None, CodeSpan::Block { language, code }) => {
      node.data.borrow_mut().value = NodeValue::HtmlBlock(NodeHtmlBlock {
        block_type: 0,
        literal:    code_block_html(language.as_deref(), &code),
      });
    },
    (None, CodeSpan::Inline(segments)) => {
      node.data.borrow_mut().value = NodeValue::HtmlBlock(NodeHtmlBlock {
        block_type: 0,
        literal:    format!("<p>{}</p>\n", inline_code_html(&segments)),
      });
    },
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_split_highlight_single() {
    assert_eq!(
      split_highlight_marks("before ==alert== after"),
      Some(vec![
        TextSegment::Text("before ".into()),
        TextSegment::Mark("alert".into()),
        TextSegment::Text(" after".into()),
      ])
    );
  }

  #[test]
  fn test_split_highlight_multiple_and_edges() {
    assert_eq!(
      split_highlight_marks("==a== and ==b=="),
      Some(vec![
        TextSegment::Mark("a".into()),
        TextSegment::Text(" and ".into()),
        TextSegment::Mark("b".into()),
      ])
    );
  }

  #[test]
  fn test_split_highlight_no_match() {
    assert_eq!(split_highlight_marks("a == b"), None);
    assert_eq!(split_highlight_marks("===="), None);
    assert_eq!(split_highlight_marks("==unclosed"), None);
  }

  #[test]
  fn test_mark_html_escapes() {
    assert_eq!(
      mark_html("<b>&\"'"),
      "<mark class=\"highlight\">&lt;b&gt;&amp;&quot;&#x27;</mark>"
    );
  }

  #[test]
  fn test_classify_block_on_newline_or_language() {
    assert!(classify_code_span("a\nb", None).is_block());
    assert!(classify_code_span("let x = 1;", Some("rust")).is_block());
    assert!(!classify_code_span("let x = 1;", Some("  ")).is_block());
  }

  #[test]
  fn test_classify_inline_even_backticks_split() {
    assert_eq!(
      classify_code_span("a `b` c", None),
      CodeSpan::Inline(vec![
        InlineSegment::Code("a ".into()),
        InlineSegment::Text("b".into()),
        InlineSegment::Code(" c".into()),
      ])
    );
    assert_eq!(
      classify_code_span("`x`", None),
      CodeSpan::Inline(vec![InlineSegment::Text("x".into())])
    );
  }

  #[test]
  fn test_classify_inline_odd_or_none_unchanged() {
    assert_eq!(
      classify_code_span("a ` b", None),
      CodeSpan::Inline(vec![InlineSegment::Code("a ` b".into())])
    );
    assert_eq!(
      classify_code_span("plain", None),
      CodeSpan::Inline(vec![InlineSegment::Code("plain".into())])
    );
    assert_eq!(
      classify_code_span("``", None),
      CodeSpan::Inline(vec![InlineSegment::Code("``".into())])
    );
  }

  #[test]
  fn test_block_html_has_chrome() {
    let html = code_block_html(Some("rust"), "if a < b {}");
    assert!(html.contains("class=\"code-chrome\""));
    assert_eq!(html.matches("code-chrome-dot").count(), 3);
    assert!(html.contains("data-language=\"rust\""));
    assert!(html.contains("<code class=\"language-rust\">if a &lt; b {}</code>"));

    let trailing = code_block_html(None, "npm install\n");
    assert!(trailing.contains("<code>npm install</code>"));

    let inline = inline_code_html(&[InlineSegment::Code("x".into())]);
    assert!(!inline.contains("code-chrome"));
  }
}
