//! `inkpost publish`: package a draft file for the persistence service.
use std::{io::Write, path::PathBuf};

use color_eyre::eyre::{Context, Result};
use inkpost_commonmark::{ArticleRenderer, utils::excerpt};
use inkpost_config::Config;
use inkpost_editor::{EditingSession, PublishRequest};

use super::{parse_namespace, read_file};

/// Characters kept in the generated excerpt.
const EXCERPT_CHARS: usize = 160;

/// Arguments of the `publish` subcommand.
#[derive(Debug, Clone, Default)]
pub struct PublishArgs {
  pub draft:     PathBuf,
  pub title:     Option<String>,
  pub category:  Option<String>,
  pub tags:      Vec<String>,
  pub namespace: Option<String>,
}

/// Print the publish request for a draft file as JSON.
///
/// # Errors
///
/// Returns an error if the draft cannot be read, has no title or body, or
/// output cannot be written.
pub fn run<W: Write>(
  config: &Config,
  args: &PublishArgs,
  out: &mut W,
) -> Result<PublishRequest> {
  let mut session = config.editing_session();
  session.apply_edit(read_file(&args.draft)?);

  let title = match args.title {
    Some(ref title) => title.clone(),
    None => detected_title(config, &session).unwrap_or_default(),
  };

  let mut request = session
    .publish_request(&title)
    .wrap_err_with(|| format!("Cannot publish {}", args.draft.display()))?
    .with_excerpt(excerpt(session.text(), EXCERPT_CHARS))
    .with_tags(&args.tags)
    .with_namespace(parse_namespace(args.namespace.as_deref()));
  if let Some(ref category) = args.category {
    request = request.with_category(category.as_str());
  }

  writeln!(out, "{}", serde_json::to_string_pretty(&request)?)?;
  Ok(request)
}

fn detected_title(config: &Config, session: &EditingSession) -> Option<String> {
  ArticleRenderer::new(config.to_render_options())
    .render(session.text())
    .title
}
