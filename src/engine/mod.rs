// src/engine/mod.rs

//! Orchestration for rewatch.
//!
//! The [`Runner`] ties the change pipeline to the process lifecycle: start
//! the command, and for every change batch stop it and start it again. The
//! [`AbortSignal`] is the single shutdown primitive shared by the runner and
//! the watcher.

pub mod abort;
pub mod runner;

pub use abort::{AbortListener, AbortSignal};
pub use runner::{Runner, RunnerOptions};
