//! CLI Adapter
//!
//! Command-line interface for the webhook relay.
//! Uses clap derive macros for argument parsing.

mod commands;

pub use commands::{CliApp, Command, PriceCmd, ServeCmd};
