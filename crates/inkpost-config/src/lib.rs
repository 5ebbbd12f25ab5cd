//! Configuration for inkpost.
//!
//! A [`Config`] is read from TOML or JSON, merged across several files,
//! adjusted with `KEY=VALUE` overrides and turned into the render options and
//! asset resolver used by the rest of the workspace.
pub mod config;
pub mod error;
pub mod templates;

pub use config::{Config, ConfigLayer};
pub use error::ConfigError;
