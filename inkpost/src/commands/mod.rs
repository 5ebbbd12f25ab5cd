//! Subcommand implementations. Each writes its report to the given writer so
//! the binary can hand in stdout and tests a buffer.
pub mod anchor;
pub mod assets;
pub mod publish;
pub mod render;

use std::{fs, path::Path};

use color_eyre::eyre::{Context, Result, bail};
use inkpost_assets::AssetNamespace;
use inkpost_config::Config;
use log::{info, warn};

/// Write a default configuration file.
///
/// # Errors
///
/// Returns an error if the file exists and `force` is not set, or if it
/// cannot be written.
pub fn init(output: &Path, format: &str, force: bool) -> Result<()> {
  // Check if file already exists and that we're not forcing overwrite
  if output.exists() && !force {
    bail!(
      "Configuration file already exists: {}. Use --force to overwrite.",
      output.display()
    );
  }

  if let Some(parent) = output.parent()
    && !parent.as_os_str().is_empty()
    && !parent.exists()
  {
    fs::create_dir_all(parent).wrap_err_with(|| {
      format!("Failed to create directory: {}", parent.display())
    })?;
    info!("Created directory: {}", parent.display());
  }

  Config::generate_default_config(format, output).wrap_err_with(|| {
    format!("Failed to generate configuration file: {}", output.display())
  })?;

  info!(
    "Configuration file created successfully. Edit it to point inkpost at \
     your asset storage."
  );
  Ok(())
}

/// Turn a `--namespace` argument into a namespace, ignoring blank values.
pub(crate) fn parse_namespace(raw: Option<&str>) -> Option<AssetNamespace> {
  let raw = raw?;
  let namespace = AssetNamespace::new(raw);
  if namespace.is_none() {
    warn!("Ignoring blank namespace '{raw}'");
  }
  namespace
}

pub(crate) fn read_file(path: &Path) -> Result<String> {
  fs::read_to_string(path)
    .wrap_err_with(|| format!("Failed to read {}", path.display()))
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_parse_namespace() {
    assert!(parse_namespace(None).is_none());
    assert!(parse_namespace(Some("  ")).is_none());
    assert_eq!(
      parse_namespace(Some("trip")).map(|ns| ns.to_string()),
      Some("trip".to_string())
    );
  }
}
