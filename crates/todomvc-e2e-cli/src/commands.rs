//! CLI command definitions using clap

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use todomvc_e2e::DriverKind;

/// todomvc-e2e: end-to-end behavioral suite for TodoMVC
#[derive(Parser, Debug)]
#[command(name = "todomvc-e2e")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (suppress non-error output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Color output (auto, always, never)
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorArg,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the suite against a TodoMVC page
    Run(RunArgs),

    /// List scenario names
    List(ListArgs),

    /// Show the effective configuration as YAML
    Config(ConfigArgs),
}

/// Arguments for the run command
#[derive(Parser, Debug, Default)]
#[allow(clippy::struct_excessive_bools)]
pub struct RunArgs {
    /// Start page of the application under test
    #[arg(long, env = "TODOMVC_URL")]
    pub base_url: Option<String>,

    /// Suite configuration file (YAML)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Seed items file (JSON)
    #[arg(long)]
    pub fixture: Option<PathBuf>,

    /// Driver backing the run. Defaults to memory unless built with --features browser
    #[arg(short, long)]
    pub driver: Option<DriverArg>,

    /// Only run scenarios whose "context > scenario" name contains this
    #[arg(short, long)]
    pub filter: Option<String>,

    /// Skip remaining scenarios after the first failure
    #[arg(long)]
    pub fail_fast: bool,

    /// Bounded wait for actions and assertions, in milliseconds
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Show the browser window
    #[arg(long)]
    pub headed: bool,

    /// Write the JSON report to this file
    #[arg(short, long)]
    pub report: Option<PathBuf>,

    /// Output format
    #[arg(long, default_value = "text")]
    pub format: FormatArg,
}

/// Arguments for the list command
#[derive(Parser, Debug, Default)]
pub struct ListArgs {
    /// Only list names containing this
    #[arg(short, long)]
    pub filter: Option<String>,

    /// Seed items file (JSON)
    #[arg(long)]
    pub fixture: Option<PathBuf>,
}

/// Arguments for the config command
#[derive(Parser, Debug, Default)]
pub struct ConfigArgs {
    /// Suite configuration file (YAML)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Print the defaults instead of the effective configuration
    #[arg(long)]
    pub defaults: bool,
}

/// Driver choice
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum DriverArg {
    /// In-process TodoMVC model
    Memory,
    /// Real Chromium over CDP (needs --features browser)
    Chromium,
}

impl From<DriverArg> for DriverKind {
    fn from(arg: DriverArg) -> Self {
        match arg {
            DriverArg::Memory => Self::Memory,
            DriverArg::Chromium => Self::Chromium,
        }
    }
}

/// Report format on stdout
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FormatArg {
    /// Human-readable text
    #[default]
    Text,
    /// JSON report
    Json,
}

impl From<FormatArg> for crate::output::OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Text => Self::Text,
            FormatArg::Json => Self::Json,
        }
    }
}

/// Color output argument
#[derive(ValueEnum, Clone, Debug, Default)]
pub enum ColorArg {
    /// Automatic color detection
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

impl From<ColorArg> for crate::config::ColorChoice {
    fn from(arg: ColorArg) -> Self {
        match arg {
            ColorArg::Auto => Self::Auto,
            ColorArg::Always => Self::Always,
            ColorArg::Never => Self::Never,
        }
    }
}
