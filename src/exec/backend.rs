// src/exec/backend.rs

//! Pluggable lifecycle abstraction.
//!
//! The runner talks to a `Lifecycle` instead of the process actor directly.
//! Production uses [`ProcessLifecycle`] (or [`NullLifecycle`] when no
//! command is configured); tests substitute a recording fake.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use tracing::{Span, debug};

use crate::errors::Result;
use crate::exec::command::CommandSpec;
use crate::exec::lifecycle::ProcessLifecycle;
use crate::exec::signal::EscalationLadder;

pub type LifecycleFuture<'a> = Pin<Box<dyn Future<Output = Result<()>> + Send + 'a>>;

/// Start/terminate contract for the single managed process.
pub trait Lifecycle: Send + Sync {
    /// Wait `settle_delay`, then start a new process.
    fn start(&self, settle_delay: Duration) -> LifecycleFuture<'_>;

    /// Stop the current process, if any, and wait until it's gone.
    fn terminate(&self, wait_budget: Duration) -> LifecycleFuture<'_>;
}

impl Lifecycle for ProcessLifecycle {
    fn start(&self, settle_delay: Duration) -> LifecycleFuture<'_> {
        Box::pin(self.start_command(settle_delay))
    }

    fn terminate(&self, wait_budget: Duration) -> LifecycleFuture<'_> {
        Box::pin(async move {
            self.terminate_with_report(wait_budget).await?;
            Ok(())
        })
    }
}

/// Lifecycle for the empty command: starting and stopping do nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullLifecycle;

impl Lifecycle for NullLifecycle {
    fn start(&self, _settle_delay: Duration) -> LifecycleFuture<'_> {
        Box::pin(async {
            debug!("no command configured; nothing to start");
            Ok(())
        })
    }

    fn terminate(&self, _wait_budget: Duration) -> LifecycleFuture<'_> {
        Box::pin(async { Ok(()) })
    }
}

/// Pick the lifecycle for `command`.
pub fn lifecycle_for(
    command: CommandSpec,
    ladder: EscalationLadder,
    span: Span,
) -> Arc<dyn Lifecycle> {
    if command.is_null() {
        Arc::new(NullLifecycle)
    } else {
        Arc::new(ProcessLifecycle::spawn(command, ladder, span))
    }
}
