//! Core implementation of the article renderer.
//!
//! This module contains the main implementation of `ArticleRenderer`: parsing,
//! the tree rewrites, asset path resolution, HTML output and the DOM
//! post-processing step that turns heading markers into `id` attributes.
use comrak::{
  Arena,
  nodes::{AstNode, NodeValue},
  options::Options,
  parse_document,
};
use inkpost_assets::AssetNamespace;
use log::debug;
use markup5ever::local_name;

use super::{
  extensions::{
    apply_code_span,
    apply_heading_id,
    apply_highlight,
    plan_code_spans,
    plan_heading_ids,
    plan_highlights,
  },
  process::process_safe,
  types::{
    ArticleRenderer,
    AssetPathTransformer,
    AstTransformer,
    HeadingSlugTable,
    NodeAlloc,
    RawHtmlTransformer,
    RenderOptions,
  },
};
use crate::types::{Header, RenderResult};

impl ArticleRenderer {
  /// Create a new `ArticleRenderer` with the given options.
  #[must_use]
  pub const fn new(options: RenderOptions) -> Self {
    Self { options }
  }

  /// Access renderer options.
  #[must_use]
  pub const fn options(&self) -> &RenderOptions {
    &self.options
  }

  /// Render relative assets into `namespace`.
  #[must_use]
  pub fn with_namespace(mut self, namespace: Option<AssetNamespace>) -> Self {
    self.options.namespace = namespace;
    self
  }

  /// Render Markdown to HTML, extracting headers and title.
  ///
  /// Every call starts from an empty [`HeadingSlugTable`].
  #[must_use]
  pub fn render(&self, markdown: &str) -> RenderResult {
    self.render_with_slugs(markdown, &mut HeadingSlugTable::new())
  }

  /// Render Markdown using the caller's heading slug table.
  #[must_use]
  pub fn render_with_slugs(
    &self,
    markdown: &str,
    slugs: &mut HeadingSlugTable,
  ) -> RenderResult {
    let arena = Arena::new();
    let options = self.comrak_options();
    let root = parse_document(&arena, markdown, &options);
    let alloc = |value: NodeValue| &*arena.alloc(value.into());

    let headers = self.rewrite_document(root, &alloc, slugs);

    let mut html_output = String::new();
    comrak::format_html(root, &options, &mut html_output).unwrap_or_default();

    let html = if headers.is_empty() {
      html_output
    } else {
      kuchiki_postprocess_html(&html_output, process_header_anchor_comments)
    };

    let title = headers
      .iter()
      .find(|header| header.level == 1)
      .map(|header| header.text.clone());

    RenderResult {
      html,
      headers,
      title,
    }
  }

  /// Apply every rewrite to a parsed document and return its headings.
  ///
  /// The highlight, heading and code rewrites are all planned on the tree as
  /// parsed, then applied in that order. Raw HTML escaping happens between
  /// planning and applying, and asset resolution last.
  pub fn rewrite_document<'a>(
    &self,
    root: &'a AstNode<'a>,
    alloc: &NodeAlloc<'a>,
    slugs: &mut HeadingSlugTable,
  ) -> Vec<Header> {
    let highlights = plan_highlights(root);
    let headings = plan_heading_ids(root, slugs);
    let code_spans = plan_code_spans(root);

    debug!(
      "Rewriting document: {} highlighted text nodes, {} headings, {} code \
       spans",
      highlights.len(),
      headings.len(),
      code_spans.len()
    );

    if !self.options.allow_raw_html {
      RawHtmlTransformer.transform(root, alloc);
    }

    for (node, segments) in highlights {
      apply_highlight(node, segments, alloc);
    }
    for (node, header) in &headings {
      apply_heading_id(node, &header.id, alloc);
    }
    for (node, span) in code_spans {
      apply_code_span(node, span, alloc);
    }

    let assets = AssetPathTransformer {
      resolver:  &self.options.resolver,
      namespace: self.options.namespace.as_ref(),
    };
    assets.transform(root, alloc);

    headings.into_iter().map(|(_, header)| header).collect()
  }

  /// Build comrak options from `RenderOptions` and feature flags.
  #[must_use]
  pub fn comrak_options(&self) -> Options<'_> {
    let mut options = Options::default();
    if self.options.gfm {
      options.extension.table = true;
      options.extension.footnotes = true;
      options.extension.strikethrough = true;
      options.extension.tasklist = true;
      options.extension.autolink = true;
    }
    // Author HTML is neutralised on the tree, generated markup must pass.
    options.render.r#unsafe = true;
    options
  }
}

/// Move `<!-- anchor: id -->` markers onto their heading element.
fn process_header_anchor_comments(document: &kuchikikiki::NodeRef) {
  let mut to_modify = Vec::new();

  for heading in document.inclusive_descendants() {
    let Some(element) = heading.as_element() else {
      continue;
    };
    if !matches!(
      element.name.local.as_ref(),
      "h1" | "h2" | "h3" | "h4" | "h5" | "h6"
    ) {
      continue;
    }

    let marker = heading.children().find_map(|child| {
      let id = child
        .as_comment()?
        .borrow()
        .trim()
        .strip_prefix("anchor:")?
        .trim()
        .to_string();
      (!id.is_empty()).then_some((child, id))
    });
    if let Some((comment, id)) = marker {
      to_modify.push((heading.clone(), comment, id));
    }
  }

  for (heading, comment, id) in to_modify {
    if let Some(element) = heading.as_element() {
      element
        .attributes
        .borrow_mut()
        .insert(local_name!("id"), id);
      comment.detach();
    }
  }
}

/// Parse `html` as a fragment, transform it and serialize the body back.
fn kuchiki_postprocess_html<F>(html: &str, transform_fn: F) -> String
where
  F: FnOnce(&kuchikikiki::NodeRef),
{
  process_safe(
    html,
    |html| {
      use tendril::TendrilSink;

      let document = kuchikikiki::parse_html().one(html);
      transform_fn(&document);

      let mut out = Vec::new();
      if let Ok(body) = document.select_first("body") {
        for child in body.as_node().children() {
          child.serialize(&mut out).ok();
        }
      }
      String::from_utf8(out).unwrap_or_default()
    },
    html,
  )
}
