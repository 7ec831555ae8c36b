// src/errors.rs

//! Crate-wide error type.
//!
//! Every condition the tool cannot recover from is a variant here and is
//! propagated up to `main`, which reports it and exits non-zero.

use std::path::PathBuf;

use nix::errno::Errno;
use nix::sys::signal::Signal;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RewatchError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("TOML encoding error: {0}")]
    TomlWriteError(#[from] toml::ser::Error),

    #[error("invalid glob pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: globset::Error,
    },

    #[error("cannot watch {path:?}: {reason}")]
    WatchRoot { path: PathBuf, reason: String },

    #[error("failed to initialize watcher: {0}")]
    WatchInit(#[source] notify::Error),

    #[error("failed to watch {path:?}: {source}")]
    WatchRegistration {
        path: PathBuf,
        #[source]
        source: notify::Error,
    },

    #[error("failed to stop watching {path:?}: {source}")]
    WatchRelease {
        path: PathBuf,
        #[source]
        source: notify::Error,
    },

    #[error("watch error: {0}")]
    WatchEvent(#[source] notify::Error),

    #[error("failed to start command '{command}': {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to start command: previous process {pid} hasn't exited")]
    ProcessStillRunning { pid: u32 },

    #[error("failed to send {signal} to process group {pgid}: {source}")]
    Signal {
        pgid: i32,
        signal: Signal,
        #[source]
        source: Errno,
    },

    #[error("process lifecycle is no longer running")]
    LifecycleClosed,

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, RewatchError>;
