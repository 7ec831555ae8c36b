// src/engine/runner.rs

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tracing::{Span, info, info_span, warn};

use crate::engine::abort::AbortSignal;
use crate::errors::Result;
use crate::exec::Lifecycle;
use crate::fs::{FileSystem, RealFileSystem};
use crate::watch::{ChangeBatch, ChangePipeline, PatternSet};

/// Timings used by the runner loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunnerOptions {
    /// Pause before every start, so a half-written set of edits settles.
    pub settle_delay: Duration,
    /// Inactivity that ends a burst of changes.
    pub quiet_window: Duration,
    /// How long to wait for exit before the next, stronger stop signal.
    pub terminate_wait: Duration,
}

impl Default for RunnerOptions {
    fn default() -> Self {
        Self {
            settle_delay: Duration::from_millis(200),
            quiet_window: Duration::from_millis(500),
            terminate_wait: Duration::from_secs(2),
        }
    }
}

/// Watches a tree and restarts the managed command on every change batch.
///
/// A runner runs once: [`Runner::run`] blocks until [`Runner::exit`] is
/// called (typically from a Ctrl-C handler on another task) or a fatal error
/// occurs.
pub struct Runner {
    root: PathBuf,
    patterns: Arc<PatternSet>,
    lifecycle: Arc<dyn Lifecycle>,
    fs: Arc<dyn FileSystem>,
    options: RunnerOptions,
    abort: AbortSignal,
    /// Held for a whole stop/start cycle and for the exit path, so exit
    /// never lands between a terminate and the following start.
    cycle: Mutex<()>,
    span: Span,
}

impl fmt::Debug for Runner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Runner")
            .field("root", &self.root)
            .field("patterns", &self.patterns)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl Runner {
    pub fn new(
        root: impl Into<PathBuf>,
        patterns: Arc<PatternSet>,
        lifecycle: Arc<dyn Lifecycle>,
        options: RunnerOptions,
    ) -> Self {
        Self {
            root: root.into(),
            patterns,
            lifecycle,
            fs: Arc::new(RealFileSystem),
            options,
            abort: AbortSignal::new(),
            cycle: Mutex::new(()),
            span: info_span!("runner"),
        }
    }

    pub fn with_filesystem(mut self, fs: Arc<dyn FileSystem>) -> Self {
        self.fs = fs;
        self
    }

    /// Parent span for everything the runner spawns.
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    /// Watch, start the command, and restart it for every change batch.
    ///
    /// Returns after [`Runner::exit`] has completed, or with the first fatal
    /// error. On the error path the command is terminated before returning.
    pub async fn run(&self) -> Result<()> {
        let mut pipeline = ChangePipeline::spawn(
            &self.root,
            Arc::clone(&self.patterns),
            Arc::clone(&self.fs),
            self.abort.subscribe(),
            self.options.quiet_window,
            &self.span,
        )?;
        info!(parent: &self.span, root = ?self.root, patterns = %self.patterns, "watching for changes");

        let outcome = self.drive(&mut pipeline).await;

        let requested = self.abort.is_fired();
        self.abort.fire();
        let watched = pipeline.shutdown().await;

        // Waits for an in-flight exit to finish its terminate.
        let _cycle = self.cycle.lock().await;
        if !requested {
            if let Err(err) = self.lifecycle.terminate(self.options.terminate_wait).await {
                warn!(parent: &self.span, error = %err, "failed to stop command during shutdown");
            }
        }

        outcome?;
        watched
    }

    async fn drive(&self, pipeline: &mut ChangePipeline) -> Result<()> {
        if !self.restart(None).await? {
            return Ok(());
        }
        while let Some(batch) = pipeline.next_batch().await {
            if !self.restart(Some(&batch)).await? {
                break;
            }
        }
        Ok(())
    }

    /// One restart: terminate (if there was a batch), then start.
    ///
    /// Returns `false` without touching the process once exit was requested.
    async fn restart(&self, batch: Option<&ChangeBatch>) -> Result<bool> {
        let _cycle = self.cycle.lock().await;
        if self.abort.is_fired() {
            return Ok(false);
        }

        if let Some(batch) = batch {
            self.lifecycle.terminate(self.options.terminate_wait).await?;
            info!(parent: &self.span, files = %batch, "file changed");
        }
        self.lifecycle.start(self.options.settle_delay).await?;
        Ok(true)
    }

    /// Stop watching and terminate the command.
    ///
    /// Safe to call more than once and from any task; after it returns, no
    /// new process will be started by this runner.
    pub async fn exit(&self) -> Result<()> {
        let _cycle = self.cycle.lock().await;
        info!(parent: &self.span, "shutting down");
        self.abort.fire();
        self.lifecycle.terminate(self.options.terminate_wait).await
    }

    pub fn is_exiting(&self) -> bool {
        self.abort.is_fired()
    }
}
