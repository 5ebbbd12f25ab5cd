//! # inkpost-commonmark
//!
//! Markdown rendering for inkpost articles: an AST-based pipeline on top of
//! `comrak` that marks `==highlights==`, gives every heading a unique anchor
//! id, frames code blocks and resolves asset paths against the article's
//! storage namespace.
//!
//! ## Quick Start
//!
//! ```rust
//! use inkpost_commonmark::{ArticleRenderer, RenderOptions};
//!
//! let renderer = ArticleRenderer::new(RenderOptions::default());
//! let result = renderer.render("# Hello World\n\nThis is ==important==.");
//!
//! assert_eq!(result.title.as_deref(), Some("Hello World"));
//! assert_eq!(result.headers[0].id, "hello-world");
//! assert!(result.html.contains("<mark class=\"highlight\">important</mark>"));
//! ```
//!
//! ## Anchor navigation
//!
//! ```rust
//! use inkpost_commonmark::{AnchorIndex, AnchorNavigation, ArticleRenderer, navigate};
//!
//! let result = ArticleRenderer::default().render("## Getting Started\n");
//! let index = AnchorIndex::from_html(&result.html);
//!
//! assert_eq!(
//!   navigate("#Getting%20Started", &index),
//!   AnchorNavigation::ScrollTo { id: "getting-started".into() }
//! );
//! ```

pub mod anchor;
pub mod processor;
mod types;
pub mod utils;

pub use crate::{
  anchor::{AnchorIndex, AnchorNavigation, ElementLookup, navigate},
  processor::{
    ArticleRenderer,
    AstTransformer,
    HeadingSlugTable,
    RenderOptions,
    RenderOptionsBuilder,
    RendererPreset,
    create_renderer,
    process_with_recovery,
  },
  types::{Header, RenderResult},
};
