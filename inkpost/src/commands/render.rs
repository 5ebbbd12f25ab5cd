//! `inkpost render`: Markdown articles to HTML or heading outlines.
use std::{
  fs,
  io::Write,
  path::{Path, PathBuf},
};

use color_eyre::eyre::{Context, Result, eyre};
use inkpost_commonmark::{
  ArticleRenderer,
  Header,
  RenderResult,
  processor::render_markdown_file,
};
use inkpost_config::Config;
use log::{debug, info};
use rayon::prelude::*;
use serde::Serialize;

use super::parse_namespace;

/// Title and headings of one article, as printed by `--headers`.
#[derive(Debug, Serialize)]
struct Outline<'a> {
  file:    String,
  title:   Option<&'a str>,
  headers: &'a [Header],
}

/// Arguments of the `render` subcommand.
#[derive(Debug, Clone, Default)]
pub struct RenderArgs {
  pub files:     Vec<PathBuf>,
  pub namespace: Option<String>,
  pub output:    Option<PathBuf>,
  pub headers:   bool,
}

/// Render every file in parallel, then write the results in argument order.
///
/// # Errors
///
/// Returns an error if a file cannot be read, or if output cannot be written.
pub fn run<W: Write>(config: &Config, args: &RenderArgs, out: &mut W) -> Result<()> {
  let renderer = ArticleRenderer::new(config.to_render_options())
    .with_namespace(parse_namespace(args.namespace.as_deref()));

  let results: Vec<(&PathBuf, Result<RenderResult, String>)> = args
    .files
    .par_iter()
    .map(|path| (path, render_markdown_file(path, &renderer)))
    .collect();
  info!("Rendered {} file(s)", results.len());

  if let Some(ref dir) = args.output {
    fs::create_dir_all(dir).wrap_err_with(|| {
      format!("Failed to create output directory: {}", dir.display())
    })?;
  }

  for (path, result) in results {
    let result = result.map_err(|e| eyre!(e))?;
    let body = if args.headers {
      outline_json(path, &result)?
    } else {
      result.html
    };

    if let Some(ref dir) = args.output {
      let extension = if args.headers { "json" } else { "html" };
      let target = output_path(dir, path, extension);
      fs::write(&target, body).wrap_err_with(|| {
        format!("Failed to write output: {}", target.display())
      })?;
      debug!("Wrote {}", target.display());
    } else {
      writeln!(out, "{body}")?;
    }
  }

  Ok(())
}

fn outline_json(path: &Path, result: &RenderResult) -> Result<String> {
  let outline = Outline {
    file:    path.display().to_string(),
    title:   result.title.as_deref(),
    headers: &result.headers,
  };
  serde_json::to_string_pretty(&outline)
    .wrap_err_with(|| format!("Failed to serialize headings of {}", path.display()))
}

/// `<dir>/<file stem>.<extension>`
fn output_path(dir: &Path, source: &Path, extension: &str) -> PathBuf {
  let stem = source
    .file_stem()
    .map_or_else(|| "index".into(), |s| s.to_string_lossy());
  dir.join(format!("{stem}.{extension}"))
}
