//! Type definitions for the article renderer.
//!
//! Contains the core types used by the renderer, including:
//! - Configuration options (`RenderOptions`)
//! - The renderer itself (`ArticleRenderer`)
//! - The per-render heading slug table
//! - AST transformation traits and implementations
//!
//! # Examples
//!
//! ```
//! use inkpost_commonmark::{ArticleRenderer, RenderOptions};
//!
//! let options = RenderOptions {
//!   gfm: true,
//!   allow_raw_html: false,
//!   ..Default::default()
//! };
//!
//! let renderer = ArticleRenderer::new(options);
//! ```

use std::collections::{HashMap, HashSet};

use comrak::nodes::{AstNode, NodeValue};
use inkpost_assets::{AssetNamespace, AssetResolver};
use log::trace;

/// Allocates a fresh node in the arena that owns the document being
/// rewritten.
pub type NodeAlloc<'a> = dyn Fn(NodeValue) -> &'a AstNode<'a> + 'a;

/// Options for configuring the article renderer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
  /// Enable GitHub Flavored Markdown (GFM) extensions.
  pub gfm: bool,

  /// Emit author-written raw HTML as markup. When `false` it is rendered as
  /// escaped text.
  pub allow_raw_html: bool,

  /// Resolver used for image and link destinations.
  pub resolver: AssetResolver,

  /// Storage namespace of the article being rendered, if it has one.
  pub namespace: Option<AssetNamespace>,
}

impl Default for RenderOptions {
  fn default() -> Self {
    Self {
      gfm:            cfg!(feature = "gfm"),
      allow_raw_html: false,
      resolver:       AssetResolver::default(),
      namespace:      None,
    }
  }
}

/// Builder for constructing `RenderOptions` with method chaining.
#[derive(Debug, Clone, Default)]
pub struct RenderOptionsBuilder {
  options: RenderOptions,
}

impl RenderOptionsBuilder {
  /// Create a new builder with default options.
  #[must_use]
  pub fn new() -> Self {
    Self::default()
  }

  /// Enable or disable GitHub Flavored Markdown.
  #[must_use]
  pub const fn gfm(mut self, enabled: bool) -> Self {
    self.options.gfm = enabled;
    self
  }

  /// Allow or escape author-written raw HTML.
  #[must_use]
  pub const fn allow_raw_html(mut self, enabled: bool) -> Self {
    self.options.allow_raw_html = enabled;
    self
  }

  /// Set the asset resolver.
  #[must_use]
  pub fn resolver(mut self, resolver: AssetResolver) -> Self {
    self.options.resolver = resolver;
    self
  }

  /// Set the article's asset namespace.
  #[must_use]
  pub fn namespace(mut self, namespace: Option<AssetNamespace>) -> Self {
    self.options.namespace = namespace;
    self
  }

  /// Build the final `RenderOptions`.
  #[must_use]
  pub fn build(self) -> RenderOptions {
    self.options
  }
}

/// Renders Markdown articles into HTML.
///
/// Holds no per-document state, so one renderer can be shared between
/// threads and reused for any number of articles.
#[derive(Debug, Clone, Default)]
pub struct ArticleRenderer {
  pub(crate) options: RenderOptions,
}

/// Base slug to occurrence count for the headings of one render.
///
/// The first heading with a given slug keeps it bare; the k-th gets
/// `{slug}-{k}`. Generated ids are remembered too, so a later heading whose
/// own slug happens to equal a generated id is pushed further along.
#[derive(Debug, Clone, Default)]
pub struct HeadingSlugTable {
  counts: HashMap<String, usize>,
  issued: HashSet<String>,
}

impl HeadingSlugTable {
  #[must_use]
  pub fn new() -> Self {
    Self::default()
  }

  /// Assign the id for the next heading whose base slug is `base`.
  pub fn assign(&mut self, base: &str) -> String {
    let count = self.counts.entry(base.to_string()).or_insert(0);
    let mut id = if *count == 0 {
      base.to_string()
    } else {
      format!("{base}-{}", *count + 1)
    };
    *count += 1;

    while self.issued.contains(&id) {
      *count += 1;
      id = format!("{base}-{count}");
    }

    trace!("Assigned heading id {id} for slug {base}");
    self.issued.insert(id.clone());
    id
  }

  /// Number of ids handed out so far.
  #[must_use]
  pub fn len(&self) -> usize {
    self.issued.len()
  }

  #[must_use]
  pub fn is_empty(&self) -> bool {
    self.issued.is_empty()
  }
}

/// Trait for AST transformations applied before HTML output.
pub trait AstTransformer {
  fn transform<'a>(&self, root: &'a AstNode<'a>, alloc: &NodeAlloc<'a>);
}

/// Rewrites image and link destinations through the [`AssetResolver`] and
/// blanks link targets that could run script or read local files.
pub struct AssetPathTransformer<'r> {
  pub resolver:  &'r AssetResolver,
  pub namespace: Option<&'r AssetNamespace>,
}

impl AstTransformer for AssetPathTransformer<'_> {
  fn transform<'a>(&self, root: &'a AstNode<'a>, _alloc: &NodeAlloc<'a>) {
    for node in root.descendants() {
      let mut data = node.data.borrow_mut();
      match data.value {
        NodeValue::Image(ref mut link) => {
          link.url = if is_unsafe_destination(&link.url, true) {
            String::new()
          } else {
            self.resolver.resolve(&link.url, self.namespace)
          };
        },
        NodeValue::Link(ref mut link) => {
          link.url = if is_unsafe_destination(&link.url, false) {
            log::debug!("Dropping unsafe link destination {}", link.url);
            String::new()
          } else {
            self.resolver.resolve(&link.url, self.namespace)
          };
        },
        _ => {},
      }
    }
  }
}

/// Replaces author-written raw HTML with text so that it renders escaped.
pub struct RawHtmlTransformer;

impl AstTransformer for RawHtmlTransformer {
  fn transform<'a>(&self, root: &'a AstNode<'a>, alloc: &NodeAlloc<'a>) {
    // Collected first: converting a block appends a child.
    let raw: Vec<_> = root
      .descendants()
      .filter(|node| {
        matches!(
          node.data.borrow().value,
          NodeValue::HtmlInline(_) | NodeValue::HtmlBlock(_)
        )
      })
      .collect();

    for node in raw {
      let (value, block_text) = match &node.data.borrow().value {
        NodeValue::HtmlInline(html) => {
          (NodeValue::Text(html.clone().into()), None)
        },
        NodeValue::HtmlBlock(block) => {
          (NodeValue::Paragraph, Some(block.literal.trim_end().to_string()))
        },
        _ => continue,
      };
      node.data.borrow_mut().value = value;
      if let Some(text) = block_text {
        node.append(alloc(NodeValue::Text(text.into())));
      }
    }
  }
}

/// `javascript:`, `vbscript:` and `file:` destinations, plus `data:` unless
/// it is an image on an image node.
fn is_unsafe_destination(url: &str, is_image: bool) -> bool {
  let trimmed = url.trim_start();
  let lower = trimmed.get(..16).unwrap_or(trimmed).to_ascii_lowercase();
  if ["javascript:", "vbscript:", "file:"]
    .iter()
    .any(|scheme| lower.starts_with(scheme))
  {
    return true;
  }
  if lower.starts_with("data:") {
    let is_image_data = [
      "data:image/png",
      "data:image/gif",
      "data:image/jpeg",
      "data:image/webp",
    ]
    .iter()
    .any(|prefix| lower.starts_with(prefix));
    return !(is_image && is_image_data);
  }
  false
}
