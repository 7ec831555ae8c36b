// src/watch/mod.rs

//! File watching and change detection.
//!
//! This module is responsible for:
//! - Compiling the file-name glob patterns (`patterns`).
//! - Observing a directory tree with `notify`, growing the watch set as new
//!   directories appear (`watcher`, `walk`).
//! - Dropping paths that aren't matching files (`filter`).
//! - Coalescing bursts of changes into one batch (`aggregate`).
//!
//! [`pipeline::ChangePipeline`] chains the stages. Nothing here knows about
//! the managed process.

pub mod aggregate;
pub mod filter;
pub mod patterns;
pub mod pipeline;
pub mod walk;
pub mod watcher;

/// Buffer size of the channels between pipeline stages.
pub const STAGE_CAPACITY: usize = 64;

pub use aggregate::{ChangeBatch, gather, spawn_aggregator};
pub use filter::{accepts, spawn_filter};
pub use patterns::PatternSet;
pub use pipeline::ChangePipeline;
pub use walk::list_directories;
pub use watcher::{WatcherHandle, spawn_watcher};
