// src/cli.rs

//! CLI argument parsing using `clap`.
//!
//! Every flag here is an override on top of the config file; see
//! [`crate::config::ConfigOverrides`].

use clap::{Parser, ValueEnum};

use crate::config::DEFAULT_CONFIG_FILE;

/// Command-line arguments for `rewatch`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "rewatch",
    version,
    about = "Restart a command whenever matching files change.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the config file (TOML).
    #[arg(long, value_name = "PATH", default_value = DEFAULT_CONFIG_FILE)]
    pub config: String,

    /// Directory to watch.
    #[arg(long, value_name = "DIR")]
    pub dir: Option<String>,

    /// Patterns to filter file names, separated by commas or spaces
    /// (e.g. `"*.rs, *.toml"`).
    #[arg(long, value_name = "PATTERNS")]
    pub pattern: Option<String>,

    /// Save the effective options back to the config file.
    #[arg(long)]
    pub save: bool,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `REWATCH_LOG` or `info` is used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Resolve and print the configuration, but don't watch or run anything.
    #[arg(long)]
    pub dry_run: bool,

    /// Command to run and restart, with its arguments.
    #[arg(trailing_var_arg = true, allow_hyphen_values = true, value_name = "COMMAND")]
    pub command: Vec<String>,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn as_directive(self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
