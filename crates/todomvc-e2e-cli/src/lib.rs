//! todomvc-e2e CLI library
//!
//! Command-line front end for the TodoMVC end-to-end suite: argument
//! parsing, logging setup, progress output and the command handlers.

#![warn(missing_docs)]

mod commands;
mod config;
mod error;
pub mod handlers;
pub mod logging;
mod output;

pub use commands::{Cli, ColorArg, Commands, ConfigArgs, DriverArg, FormatArg, ListArgs, RunArgs};
pub use config::{CliConfig, ColorChoice, Verbosity};
pub use error::{CliError, CliResult};
pub use output::{failure_lines, OutputFormat, ProgressReporter};
