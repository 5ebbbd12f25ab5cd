use std::io;

use color_eyre::eyre::Result;
use inkpost::{
  cli::{Cli, Commands},
  commands::{
    self,
    assets::ReconcileArgs,
    publish::PublishArgs,
    render::RenderArgs,
  },
};
use inkpost_config::Config;
use log::LevelFilter;

fn main() -> Result<()> {
  color_eyre::install()?;

  // Parse command line arguments
  let cli = Cli::parse_args();

  // Initialize logging first so we can log during command handling
  env_logger::Builder::new()
    .filter_level(if cli.verbose {
      LevelFilter::Debug
    } else {
      LevelFilter::Info
    })
    .write_style(env_logger::WriteStyle::Always)
    .init();

  // `init` must work without a valid config around
  if let Commands::Init {
    output,
    format,
    force,
  } = &cli.command
  {
    return commands::init(output, format, *force);
  }

  let config = Config::load(&cli.config_files, &cli.config_overrides)?;
  let stdout = io::stdout();
  let mut out = stdout.lock();

  match cli.command {
    Commands::Init { .. } => Ok(()),
    Commands::Render {
      files,
      namespace,
      output,
      headers,
    } => {
      let args = RenderArgs {
        files,
        namespace,
        output,
        headers,
      };
      commands::render::run(&config, &args, &mut out)
    },
    Commands::Resolve { paths, namespace } => {
      commands::assets::resolve(&config, &paths, namespace.as_deref(), &mut out)
    },
    Commands::Reconcile {
      draft,
      batch,
      label,
      in_place,
    } => {
      let args = ReconcileArgs {
        draft,
        batch,
        label,
        in_place,
      };
      commands::assets::reconcile_draft(&config, &args, &mut out).map(|_| ())
    },
    Commands::Anchor { file, href } => {
      commands::anchor::run(&config, &file, &href, &mut out).map(|_| ())
    },
    Commands::Publish {
      draft,
      title,
      category,
      tags,
      namespace,
    } => {
      let args = PublishArgs {
        draft,
        title,
        category,
        tags,
        namespace,
      };
      commands::publish::run(&config, &args, &mut out).map(|_| ())
    },
  }
}
