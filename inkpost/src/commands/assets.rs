//! `inkpost resolve` and `inkpost reconcile`.
use std::{fs, io::Write, path::PathBuf};

use color_eyre::eyre::{Context, Result};
use inkpost_assets::{ReconcileReport, UploadBatch, reconcile};
use inkpost_config::Config;
use log::info;

use super::{parse_namespace, read_file};

/// Print one resolved URL per input path.
///
/// # Errors
///
/// Returns an error if output cannot be written.
pub fn resolve<W: Write>(
  config: &Config,
  paths: &[String],
  namespace: Option<&str>,
  out: &mut W,
) -> Result<()> {
  let resolver = config.resolver();
  let namespace = parse_namespace(namespace);
  for path in paths {
    writeln!(out, "{}", resolver.resolve(path, namespace.as_ref()))?;
  }
  Ok(())
}

/// Arguments of the `reconcile` subcommand.
#[derive(Debug, Clone, Default)]
pub struct ReconcileArgs {
  pub draft:    PathBuf,
  pub batch:    PathBuf,
  pub label:    Option<String>,
  pub in_place: bool,
}

/// Reconcile a draft file against a JSON upload batch.
///
/// The updated draft is written back with `in_place`, otherwise printed. The
/// report's summary is logged either way.
///
/// # Errors
///
/// Returns an error if either file cannot be read, the batch is not valid
/// JSON, or the result cannot be written.
pub fn reconcile_draft<W: Write>(
  config: &Config,
  args: &ReconcileArgs,
  out: &mut W,
) -> Result<ReconcileReport> {
  let draft = read_file(&args.draft)?;
  let batch: UploadBatch = serde_json::from_str(&read_file(&args.batch)?)
    .wrap_err_with(|| {
      format!("Invalid upload batch: {}", args.batch.display())
    })?;

  let label = args.label.as_deref().or_else(|| config.fallback_label());
  let report = reconcile(&draft, &batch, label);

  if args.in_place {
    fs::write(&args.draft, &report.text).wrap_err_with(|| {
      format!("Failed to write draft: {}", args.draft.display())
    })?;
  } else {
    write!(out, "{}", report.text)?;
  }

  info!("{}", report.summary());
  Ok(report)
}
