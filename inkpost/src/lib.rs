//! Expose the CLI's subcommands for use in integration tests. The supported
//! API lives in the `inkpost-*` library crates.
pub mod cli;
pub mod commands;
