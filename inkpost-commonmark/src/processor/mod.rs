//! Markdown article rendering.
//!
//! - [`core`]: the renderer and its rendering pipeline
//! - [`process`]: high-level rendering functions with error recovery
//! - [`extensions`]: the highlight, heading and code-span rewrites
//! - [`types`]: options, the renderer struct and AST transformers
pub mod core;
pub mod extensions;
pub mod process;
pub mod types;

pub use extensions::{
  CodeSpan,
  InlineSegment,
  TextSegment,
  classify_code_span,
  extract_inline_text,
  split_highlight_marks,
};
pub use process::{
  RENDER_ERROR_HTML,
  RendererPreset,
  create_renderer,
  process_safe,
  process_with_recovery,
  render_markdown_file,
};
pub use types::{
  ArticleRenderer,
  AssetPathTransformer,
  AstTransformer,
  HeadingSlugTable,
  NodeAlloc,
  RawHtmlTransformer,
  RenderOptions,
  RenderOptionsBuilder,
};
