//! High-level rendering functions with error recovery.
use std::{fs, path::Path};

use log::error;

use super::types::{ArticleRenderer, RenderOptions};
use crate::types::RenderResult;

/// Placeholder emitted when rendering panics.
pub const RENDER_ERROR_HTML: &str =
  "<div class=\"error\">Critical error rendering article content</div>";

/// Render an article with error recovery.
///
/// A panic anywhere in parsing or rewriting is caught and logged, and the
/// result carries an error placeholder instead of the article.
///
/// # Arguments
///
/// * `renderer` - The configured renderer
/// * `content` - The raw markdown content to render
#[must_use]
pub fn process_with_recovery(
  renderer: &ArticleRenderer,
  content: &str,
) -> RenderResult {
  match std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
    renderer.render(content)
  })) {
    Ok(result) => result,
    Err(panic_err) => {
      error!("Panic during markdown rendering: {panic_err:?}");
      RenderResult {
        html:    RENDER_ERROR_HTML.to_string(),
        headers: Vec::new(),
        title:   None,
      }
    },
  }
}

/// Safely process markup content with error recovery.
///
/// Returns `fallback` (or the input itself when `fallback` is empty) if
/// `processor_fn` panics.
///
/// # Arguments
///
/// * `content` - The content to process
/// * `processor_fn` - The processing function to apply
/// * `fallback` - Fallback content to use if processing fails
pub fn process_safe<F>(content: &str, processor_fn: F, fallback: &str) -> String
where
  F: FnOnce(&str) -> String,
{
  if content.is_empty() {
    return String::new();
  }

  let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
    processor_fn(content)
  }));

  match result {
    Ok(processed_text) => processed_text,
    Err(e) => {
      if let Some(error_msg) = e.downcast_ref::<String>() {
        error!("Error processing markup: {error_msg}");
      } else if let Some(error_msg) = e.downcast_ref::<&str>() {
        error!("Error processing markup: {error_msg}");
      } else {
        error!("Unknown error occurred while processing markup");
      }

      if fallback.is_empty() {
        content.to_string()
      } else {
        fallback.to_string()
      }
    },
  }
}

/// Preset configurations for common use cases.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RendererPreset {
  /// GFM enabled, author HTML escaped. Suitable for untrusted authors.
  Strict,
  /// GFM enabled, author HTML passed through.
  Trusted,
}

/// Create a renderer for a preset with the default asset resolver.
#[must_use]
pub fn create_renderer(preset: RendererPreset) -> ArticleRenderer {
  let options = match preset {
    RendererPreset::Strict => {
      RenderOptions {
        gfm: true,
        allow_raw_html: false,
        ..Default::default()
      }
    },
    RendererPreset::Trusted => {
      RenderOptions {
        gfm: true,
        allow_raw_html: true,
        ..Default::default()
      }
    },
  };

  ArticleRenderer::new(options)
}

/// Render a markdown file with error recovery. `inkpost render` calls this
/// once per file from a rayon pool.
///
/// # Errors
///
/// Returns an error if the file cannot be read.
pub fn render_markdown_file(
  file_path: &Path,
  renderer: &ArticleRenderer,
) -> Result<RenderResult, String> {
  let content = fs::read_to_string(file_path).map_err(|e| {
    format!("Failed to read file {}: {}", file_path.display(), e)
  })?;

  Ok(process_with_recovery(renderer, &content))
}
