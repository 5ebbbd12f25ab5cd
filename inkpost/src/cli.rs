use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Command line interface for inkpost
#[derive(Parser, Debug)]
#[command(author, version, about = "inkpost: blog authoring and rendering")]
pub struct Cli {
  /// Subcommand to execute (see [`Commands`])
  #[command(subcommand)]
  pub command: Commands,

  /// Enable verbose debug logging
  #[arg(short, long, global = true)]
  pub verbose: bool,

  /// Path to configuration file(s) (TOML or JSON, can be specified multiple
  /// times) Multiple files are merged in order, with later files overriding
  /// earlier ones
  #[arg(
    short = 'c',
    long = "config-file",
    global = true,
    action = clap::ArgAction::Append
  )]
  pub config_files: Vec<PathBuf>,

  /// Override configuration values (KEY=VALUE format, can be used multiple
  /// times)
  #[arg(long = "config", global = true, action = clap::ArgAction::Append)]
  pub config_overrides: Vec<String>,
}

/// All supported subcommands for the inkpost CLI.
#[derive(Subcommand, Debug)]
pub enum Commands {
  /// Initialize a new inkpost configuration file
  Init {
    /// Path to create the configuration file at
    #[arg(short, long, default_value = "inkpost.toml")]
    output: PathBuf,

    /// Format of the configuration file.
    #[arg(short = 'F', long, default_value = "toml", value_parser = ["toml", "json"])]
    format: String,

    /// Force overwrite if file already exists
    #[arg(short, long)]
    force: bool,
  },

  /// Render Markdown articles to HTML.
  Render {
    /// Markdown files to render.
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Asset namespace the articles' relative paths resolve into.
    #[arg(short, long)]
    namespace: Option<String>,

    /// Directory to write `<name>.html` files to. Without it, HTML goes to
    /// stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Emit title and headings as JSON instead of HTML.
    #[arg(long)]
    headers: bool,
  },

  /// Resolve asset references to fetchable URLs.
  Resolve {
    /// Paths or URLs as they appear in Markdown.
    #[arg(required = true)]
    paths: Vec<String>,

    /// Asset namespace of the article the paths belong to.
    #[arg(short, long)]
    namespace: Option<String>,
  },

  /// Point a draft's image references at uploaded URLs.
  Reconcile {
    /// Markdown draft to update.
    draft: PathBuf,

    /// JSON upload batch: `[{"filename": ..., "url": ...}, ...]`.
    #[arg(short, long)]
    batch: PathBuf,

    /// Alt text for uploads nothing in the draft referenced.
    #[arg(short, long)]
    label: Option<String>,

    /// Rewrite the draft file instead of printing the result.
    #[arg(short, long)]
    in_place: bool,
  },

  /// Decide how an in-page link in a rendered article navigates.
  Anchor {
    /// Markdown article the link appears in.
    file: PathBuf,

    /// Link target, e.g. `#Getting%20Started`.
    href: String,
  },

  /// Package a draft as a publish request (JSON).
  Publish {
    /// Markdown draft to publish.
    draft: PathBuf,

    /// Article title. Defaults to the draft's first level 1 heading.
    #[arg(short = 'T', long)]
    title: Option<String>,

    /// Category to file the article under.
    #[arg(long)]
    category: Option<String>,

    /// Tags for the article (can be specified multiple times)
    #[arg(short, long = "tag", action = clap::ArgAction::Append)]
    tags: Vec<String>,

    /// Asset namespace holding the draft's uploads.
    #[arg(short, long)]
    namespace: Option<String>,
  },
}

impl Cli {
  /// Parse command line arguments into a [`Cli`] struct.
  #[must_use]
  pub fn parse_args() -> Self {
    Self::parse()
  }
}

#[cfg(test)]
mod tests {
  use clap::CommandFactory;

  use super::*;

  #[test]
  fn test_cli_definition_is_valid() {
    Cli::command().debug_assert();
  }

  #[test]
  fn test_global_flags_after_subcommand() {
    let cli = Cli::try_parse_from([
      "inkpost",
      "resolve",
      "a.png",
      "--config",
      "asset_origin=https://cdn.example.com",
      "-v",
    ])
    .expect("valid arguments");

    assert!(cli.verbose);
    assert_eq!(cli.config_overrides, ["asset_origin=https://cdn.example.com"]);
    assert!(matches!(cli.command, Commands::Resolve { .. }));
  }

  #[test]
  fn test_render_requires_files() {
    assert!(Cli::try_parse_from(["inkpost", "render"]).is_err());
  }
}
