// src/config/mod.rs

//! Configuration loading and validation for rewatch.
//!
//! Responsibilities:
//! - Define the TOML-backed data model (`model.rs`).
//! - Load / save a config file (`loader.rs`).
//! - Merge command-line overrides (`overrides.rs`).
//! - Validate into typed values: patterns, command, timings, stop signals
//!   (`validate.rs`, `duration.rs`).

pub mod duration;
pub mod loader;
pub mod model;
pub mod overrides;
pub mod validate;

pub use duration::parse_duration;
pub use loader::{
    DEFAULT_CONFIG_FILE, load_and_validate, load_from_fs, load_from_path, load_or_default,
    save_to_path,
};
pub use model::{ConfigFile, ProcessSection, RawConfigFile, TimingSection};
pub use overrides::{ConfigOverrides, split_patterns};
