// src/logging.rs

//! Logging setup for `rewatch` using `tracing` + `tracing-subscriber`.
//!
//! The filter is chosen as follows:
//! 1. `--log-level` CLI flag, applied to everything
//! 2. `REWATCH_LOG` environment variable, any `EnvFilter` directive
//!    (e.g. `"debug"` or `"rewatch::watch=trace,info"`)
//! 3. `info`
//!
//! Logs go to STDERR. The managed command inherits our stdout and we don't
//! want to interleave with it more than necessary.

use anyhow::{Result, anyhow};
use tracing_subscriber::{EnvFilter, fmt};

use crate::cli::LogLevel;

/// Environment variable consulted when no `--log-level` is given.
pub const LOG_ENV: &str = "REWATCH_LOG";

/// Install the global subscriber. Call once, before the runner starts.
pub fn init_logging(cli_level: Option<LogLevel>) -> Result<()> {
    let filter = match cli_level {
        Some(lvl) => EnvFilter::new(lvl.as_directive()),
        None => EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info")),
    };

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow!("installing log subscriber: {e}"))
}
