use std::{
  fs,
  path::{Path, PathBuf},
};

use inkpost_assets::AssetResolver;
use inkpost_commonmark::{RenderOptions, RenderOptionsBuilder};
use inkpost_editor::{DEFAULT_HISTORY_LIMIT, EditingSession};
use serde::{Deserialize, Serialize, de::DeserializeOwned};

use crate::error::ConfigError;

/// File names searched, in order, by [`Config::find_config_file`].
pub const CONFIG_FILENAMES: [&str; 3] =
  ["inkpost.toml", ".inkpost.toml", "inkpost.json"];

/// Configuration for inkpost.
///
/// [`Config`] holds where uploaded assets live, how drafts are edited and
/// how articles are rendered. Fields are typically loaded from a TOML or JSON
/// config file, but can also be set via `--config KEY=VALUE`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
  /// Origin uploaded assets are served from, e.g. `https://cdn.example.com`.
  /// Empty for root-relative URLs.
  pub asset_origin: String,

  /// Storage folder that holds one namespace per article.
  pub uploads_root: String,

  /// Storage folder for author avatars.
  pub avatar_root: String,

  /// Undo steps kept per draft.
  pub history_limit: usize,

  /// Alt text for uploads nothing in the draft referenced.
  pub fallback_label: Option<String>,

  /// Pass raw HTML through instead of escaping it.
  pub allow_raw_html: bool,

  /// Enable GitHub flavoured Markdown extensions.
  pub gfm: bool,
}

impl Default for Config {
  fn default() -> Self {
    Self {
      asset_origin:   String::new(),
      uploads_root:   "uploads".to_string(),
      avatar_root:    "avatars".to_string(),
      history_limit:  DEFAULT_HISTORY_LIMIT,
      fallback_label: None,
      allow_raw_html: false,
      gfm:            true,
    }
  }
}

/// The keys one config file actually sets.
///
/// Absent keys stay [`None`], so merging a layer into a [`Config`] never
/// touches what the file left out, and a file can set a key back to its
/// default value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ConfigLayer {
  pub asset_origin:   Option<String>,
  pub uploads_root:   Option<String>,
  pub avatar_root:    Option<String>,
  pub history_limit:  Option<usize>,
  pub fallback_label: Option<String>,
  pub allow_raw_html: Option<bool>,
  pub gfm:            Option<bool>,
}

impl ConfigLayer {
  /// Read the keys set in a config file (TOML or JSON).
  ///
  /// # Errors
  ///
  /// Returns an error if the file cannot be read or parsed, or if the format is
  /// unsupported.
  pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
    parse_config_file(path.as_ref())
  }
}

impl Config {
  /// Load configuration from a file (TOML or JSON).
  ///
  /// # Arguments
  ///
  /// * `path` - Path to the configuration file.
  ///
  /// # Errors
  ///
  /// Returns an error if the file cannot be read or parsed, or if the format is
  /// unsupported.
  pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
    parse_config_file(path.as_ref())
  }

  /// Load configuration from explicit files or a discovered one, then apply
  /// overrides.
  ///
  /// Files are merged in the order given. With no files, the current
  /// directory is searched (see [`Config::find_config_file`]); with nothing
  /// found the defaults are used.
  ///
  /// # Errors
  ///
  /// Returns an error if a file fails to load, an override is malformed, or
  /// the result does not pass [`Config::validate`].
  pub fn load(
    config_files: &[PathBuf],
    config_overrides: &[String],
  ) -> Result<Self, ConfigError> {
    let mut config = if let Some((first, rest)) = config_files.split_first() {
      let mut merged = Self::from_file(first)?;
      for path in rest {
        merged.merge(ConfigLayer::from_file(path)?);
      }
      if !rest.is_empty() {
        log::info!("Loaded and merged {} config files", config_files.len());
      }
      merged
    } else if let Some(discovered) = Self::find_config_file() {
      log::info!("Using discovered config file: {}", discovered.display());
      Self::from_file(&discovered)?
    } else {
      Self::default()
    };

    if !config_overrides.is_empty() {
      config.apply_overrides(config_overrides)?;
    }

    config.validate()?;
    Ok(config)
  }

  /// Apply configuration overrides from KEY=VALUE strings.
  ///
  /// # Errors
  ///
  /// Returns an error if:
  ///
  /// - An override string is not in KEY=VALUE format
  /// - A key is not recognized
  /// - A value cannot be parsed as the expected type
  ///
  /// # Example
  ///
  /// ```
  /// use inkpost_config::Config;
  ///
  /// let mut config = Config::default();
  /// config
  ///   .apply_overrides(&[
  ///     "asset_origin=https://cdn.example.com".to_string(),
  ///     "gfm=no".to_string(),
  ///   ])
  ///   .unwrap();
  /// assert!(!config.gfm);
  /// ```
  pub fn apply_overrides(
    &mut self,
    overrides: &[String],
  ) -> Result<(), ConfigError> {
    for override_str in overrides {
      let (key, value) = override_str.split_once('=').ok_or_else(|| {
        ConfigError::Config(format!(
          "Invalid config override format: '{override_str}'. Expected \
           KEY=VALUE"
        ))
      })?;

      self.apply_override(key.trim(), value.trim())?;
    }

    Ok(())
  }

  /// Set a single field by its config key.
  ///
  /// # Errors
  ///
  /// Returns an error for an unknown key or a value of the wrong type.
  pub fn apply_override(
    &mut self,
    key: &str,
    value: &str,
  ) -> Result<(), ConfigError> {
    match key {
      "asset_origin" => value.clone_into(&mut self.asset_origin),
      "uploads_root" => value.clone_into(&mut self.uploads_root),
      "avatar_root" => value.clone_into(&mut self.avatar_root),
      "history_limit" => {
        self.history_limit = match value.parse::<usize>() {
          Ok(n) if n > 0 => n,
          _ => {
            return Err(ConfigError::Config(format!(
              "Invalid value for '{key}': '{value}'. Expected a positive \
               integer"
            )));
          },
        };
      },
      "fallback_label" => {
        self.fallback_label =
          (!value.is_empty()).then(|| value.to_string());
      },
      "allow_raw_html" => self.allow_raw_html = parse_bool(key, value)?,
      "gfm" => self.gfm = parse_bool(key, value)?,
      _ => {
        return Err(ConfigError::Config(format!(
          "Unknown configuration key: '{key}'. See documentation for \
           supported keys."
        )));
      },
    }
    log::debug!("Applied config override {key}={value}");
    Ok(())
  }

  /// Merge a config layer into this one. Every key the layer sets replaces
  /// this config's value, keys it omits are kept.
  ///
  /// # Arguments
  ///
  /// * `layer` - The keys read from a later file (takes precedence)
  pub fn merge(&mut self, layer: ConfigLayer) {
    let ConfigLayer {
      asset_origin,
      uploads_root,
      avatar_root,
      history_limit,
      fallback_label,
      allow_raw_html,
      gfm,
    } = layer;

    if let Some(asset_origin) = asset_origin {
      self.asset_origin = asset_origin;
    }
    if let Some(uploads_root) = uploads_root {
      self.uploads_root = uploads_root;
    }
    if let Some(avatar_root) = avatar_root {
      self.avatar_root = avatar_root;
    }
    if let Some(history_limit) = history_limit {
      self.history_limit = history_limit;
    }
    if fallback_label.is_some() {
      self.fallback_label = fallback_label;
    }
    if let Some(allow_raw_html) = allow_raw_html {
      self.allow_raw_html = allow_raw_html;
    }
    if let Some(gfm) = gfm {
      self.gfm = gfm;
    }
  }

  /// Search the current directory for a config file.
  #[must_use]
  pub fn find_config_file() -> Option<PathBuf> {
    let current_dir = std::env::current_dir().ok()?;
    Self::find_config_file_in(&current_dir)
  }

  /// Search `dir` for the first of [`CONFIG_FILENAMES`] that exists.
  #[must_use]
  pub fn find_config_file_in(dir: &Path) -> Option<PathBuf> {
    CONFIG_FILENAMES
      .iter()
      .map(|filename| dir.join(filename))
      .find(|path| path.is_file())
  }

  /// Check values that deserialize fine but cannot be used.
  ///
  /// # Errors
  ///
  /// Returns an error listing every problem found.
  pub fn validate(&self) -> Result<(), ConfigError> {
    let mut errors = Vec::new();

    if self.history_limit == 0 {
      errors.push("history_limit must be at least 1".to_string());
    }

    let origin = self.asset_origin.trim();
    if !origin.is_empty()
      && !(origin.starts_with("http://") || origin.starts_with("https://"))
    {
      errors.push(format!(
        "asset_origin must be an http(s) URL, got '{origin}'"
      ));
    }

    if self.uploads_root.trim().trim_matches('/').is_empty() {
      errors.push("uploads_root must not be empty".to_string());
    }

    if !errors.is_empty() {
      let error_message = errors.join("\n");
      return Err(ConfigError::Config(format!(
        "Configuration validation errors:\n{error_message}"
      )));
    }

    Ok(())
  }

  /// The fallback label, if it is non-blank.
  #[must_use]
  pub fn fallback_label(&self) -> Option<&str> {
    self
      .fallback_label
      .as_deref()
      .filter(|label| !label.trim().is_empty())
  }

  /// Asset resolver for the configured origin and storage folders.
  #[must_use]
  pub fn resolver(&self) -> AssetResolver {
    AssetResolver::new(&self.asset_origin, &self.uploads_root, &self.avatar_root)
  }

  /// Render options for articles, without a namespace.
  #[must_use]
  pub fn to_render_options(&self) -> RenderOptions {
    RenderOptionsBuilder::new()
      .gfm(self.gfm)
      .allow_raw_html(self.allow_raw_html)
      .resolver(self.resolver())
      .build()
  }

  /// A fresh editing session using the configured history depth.
  #[must_use]
  pub fn editing_session(&self) -> EditingSession {
    EditingSession::new().with_history_limit(self.history_limit)
  }

  /// Write the default configuration file in `format` to `path`.
  ///
  /// # Errors
  ///
  /// Returns an error if the format is unsupported or the file cannot be
  /// written.
  pub fn generate_default_config(
    format: &str,
    path: &Path,
  ) -> Result<(), ConfigError> {
    let config_content = crate::templates::get_template(format)?;

    fs::write(path, config_content).map_err(|e| {
      ConfigError::Config(format!(
        "Failed to write default config to {}: {}",
        path.display(),
        e
      ))
    })?;

    log::info!("Created default configuration file: {}", path.display());
    Ok(())
  }
}

/// Read `path` and deserialize it by extension.
fn parse_config_file<T: DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
  let content = fs::read_to_string(path).map_err(|e| {
    ConfigError::Config(format!(
      "Failed to read config file: {}: {}",
      path.display(),
      e
    ))
  })?;

  let Some(ext) = path.extension().and_then(|ext| ext.to_str()) else {
    return Err(ConfigError::Config(format!(
      "Config file has no extension: {}",
      path.display()
    )));
  };

  match ext.to_lowercase().as_str() {
    "json" => {
      serde_json::from_str(&content).map_err(|e| {
        ConfigError::Config(format!(
          "Failed to parse JSON config from {}: {}",
          path.display(),
          e
        ))
      })
    },
    "toml" => {
      toml::from_str(&content).map_err(|e| {
        ConfigError::Config(format!(
          "Failed to parse TOML config from {}: {}",
          path.display(),
          e
        ))
      })
    },
    _ => {
      Err(ConfigError::Config(format!(
        "Unsupported config file format: {}",
        path.display()
      )))
    },
  }
}

fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
  match value.to_lowercase().as_str() {
    "true" | "yes" | "1" => Ok(true),
    "false" | "no" | "0" => Ok(false),
    _ => {
      Err(ConfigError::Config(format!(
        "Invalid boolean value for '{key}': '{value}'. Expected true/false, \
         yes/no, or 1/0"
      )))
    },
  }
}
