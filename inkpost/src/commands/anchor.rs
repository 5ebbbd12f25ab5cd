//! `inkpost anchor`: where an in-page link in a rendered article lands.
use std::{io::Write, path::Path};

use color_eyre::eyre::Result;
use inkpost_commonmark::{
  AnchorIndex,
  AnchorNavigation,
  ArticleRenderer,
  navigate,
  process_with_recovery,
};
use inkpost_config::Config;

use super::read_file;

/// Render `file`, then resolve `href` against the ids in the output and
/// print the decision as JSON.
///
/// # Errors
///
/// Returns an error if the file cannot be read or output cannot be written.
pub fn run<W: Write>(
  config: &Config,
  file: &Path,
  href: &str,
  out: &mut W,
) -> Result<AnchorNavigation> {
  let markdown = read_file(file)?;
  let renderer = ArticleRenderer::new(config.to_render_options());
  let result = process_with_recovery(&renderer, &markdown);

  let index = AnchorIndex::from_html(&result.html);
  let navigation = navigate(href, &index);
  writeln!(out, "{}", serde_json::to_string(&navigation)?)?;
  Ok(navigation)
}
