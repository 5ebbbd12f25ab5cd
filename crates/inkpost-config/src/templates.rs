use crate::error::ConfigError;

/// Default configuration in TOML, with a comment on every field.
pub const DEFAULT_TOML_TEMPLATE: &str = r#"# inkpost configuration file

# Origin that uploaded assets are served from. Leave empty to emit
# root-relative URLs.
asset_origin = ""

# Storage folder holding one namespace per article
uploads_root = "uploads"

# Storage folder for author avatars
avatar_root = "avatars"

# Undo steps kept per draft
history_limit = 200

# Alt text for uploaded images that nothing in the draft referenced.
# Defaults to the file name.
# fallback_label = "image"

# Pass raw HTML in articles through instead of escaping it
allow_raw_html = false

# GitHub flavoured extensions (tables, strikethrough, autolinks, task lists)
gfm = true
"#;

/// Default configuration in JSON.
pub const DEFAULT_JSON_TEMPLATE: &str = r#"{
  "asset_origin": "",
  "uploads_root": "uploads",
  "avatar_root": "avatars",
  "history_limit": 200,
  "allow_raw_html": false,
  "gfm": true
}
"#;

/// Get the configuration template for `format` (`toml` or `json`).
///
/// # Errors
///
/// Returns [`ConfigError::UnsupportedFormat`] for any other format.
pub fn get_template(format: &str) -> Result<&'static str, ConfigError> {
  match format.to_lowercase().as_str() {
    "toml" => Ok(DEFAULT_TOML_TEMPLATE),
    "json" => Ok(DEFAULT_JSON_TEMPLATE),
    _ => Err(ConfigError::UnsupportedFormat(format.to_string())),
  }
}
