// src/exec/mod.rs

//! Process execution layer.
//!
//! - [`command`] describes what to run.
//! - [`process`] spawns it into its own process group and watches for exit.
//! - [`signal`] stops a process group with an escalating signal ladder.
//! - [`lifecycle`] is the actor that owns the one live process.
//! - [`backend`] provides the `Lifecycle` trait the runner is written
//!   against, which tests replace with a fake.

pub mod backend;
pub mod command;
pub mod lifecycle;
pub mod process;
pub mod signal;

pub use backend::{Lifecycle, LifecycleFuture, NullLifecycle, lifecycle_for};
pub use command::CommandSpec;
pub use lifecycle::ProcessLifecycle;
pub use process::{ExitOutcome, ProcessStatus};
pub use signal::{EscalationLadder, TerminationReport, parse_signal};
