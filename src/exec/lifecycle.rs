// src/exec/lifecycle.rs

//! Actor owning the one managed process.
//!
//! All requests are handled one at a time by a single task, which is what
//! guarantees there is never more than one live child: a start can't
//! interleave with a terminate, and a start is refused while the previous
//! process is still running.

use std::time::Duration;

use tokio::sync::{mpsc, oneshot};
use tokio::time::sleep;
use tracing::{Instrument, Span, debug, info};

use crate::errors::{Result, RewatchError};
use crate::exec::command::CommandSpec;
use crate::exec::process::{ManagedProcess, ProcessStatus};
use crate::exec::signal::{EscalationLadder, TerminationReport, terminate_group};

enum Request {
    Start {
        reply: oneshot::Sender<Result<()>>,
    },
    Terminate {
        wait_budget: Duration,
        reply: oneshot::Sender<Result<Option<TerminationReport>>>,
    },
    Status {
        reply: oneshot::Sender<ProcessStatus>,
    },
}

/// Cloneable handle to the process actor.
#[derive(Debug, Clone)]
pub struct ProcessLifecycle {
    tx: mpsc::Sender<Request>,
}

impl ProcessLifecycle {
    /// Spawn the actor. Must be called from within a Tokio runtime.
    pub fn spawn(command: CommandSpec, ladder: EscalationLadder, span: Span) -> Self {
        let (tx, mut rx) = mpsc::channel::<Request>(8);

        let mut actor = LifecycleActor {
            command,
            ladder,
            current: None,
            span: span.clone(),
        };

        tokio::spawn(
            async move {
                while let Some(request) = rx.recv().await {
                    actor.handle(request).await;
                }
                debug!("process lifecycle stopped");
            }
            .instrument(span),
        );

        Self { tx }
    }

    /// Sleep `settle_delay`, then start the command.
    ///
    /// Returns once the process has been spawned, not when it exits. Fails if
    /// the previous process is still alive or the spawn fails.
    pub async fn start_command(&self, settle_delay: Duration) -> Result<()> {
        sleep(settle_delay).await;
        let (reply, rx) = oneshot::channel();
        self.request(Request::Start { reply }, rx).await?
    }

    /// Stop the running process, escalating every `wait_budget`.
    ///
    /// `Ok(None)` means nothing was running and no signal was sent.
    pub async fn terminate_with_report(
        &self,
        wait_budget: Duration,
    ) -> Result<Option<TerminationReport>> {
        let (reply, rx) = oneshot::channel();
        self.request(Request::Terminate { wait_budget, reply }, rx)
            .await?
    }

    pub async fn status(&self) -> Result<ProcessStatus> {
        let (reply, rx) = oneshot::channel();
        self.request(Request::Status { reply }, rx).await
    }

    async fn request<T>(&self, request: Request, rx: oneshot::Receiver<T>) -> Result<T> {
        self.tx
            .send(request)
            .await
            .map_err(|_| RewatchError::LifecycleClosed)?;
        rx.await.map_err(|_| RewatchError::LifecycleClosed)
    }
}

struct LifecycleActor {
    command: CommandSpec,
    ladder: EscalationLadder,
    current: Option<ManagedProcess>,
    span: Span,
}

impl LifecycleActor {
    async fn handle(&mut self, request: Request) {
        match request {
            Request::Start { reply } => {
                let _ = reply.send(self.start());
            }
            Request::Terminate { wait_budget, reply } => {
                let result = self.terminate(wait_budget).await;
                let _ = reply.send(result);
            }
            Request::Status { reply } => {
                let _ = reply.send(self.status());
            }
        }
    }

    fn start(&mut self) -> Result<()> {
        if let Some(previous) = &self.current {
            if !previous.has_exited() {
                return Err(RewatchError::ProcessStillRunning {
                    pid: previous.pid(),
                });
            }
        }

        let process = ManagedProcess::spawn(&self.command, &self.span)?;
        self.current = Some(process);
        Ok(())
    }

    async fn terminate(&mut self, wait_budget: Duration) -> Result<Option<TerminationReport>> {
        let Some(process) = self.current.as_mut() else {
            return Ok(None);
        };
        if process.has_exited() {
            self.current = None;
            return Ok(None);
        }

        info!(pid = process.pid(), "stopping command");
        let report = terminate_group(process, &self.ladder, wait_budget).await?;
        debug!(?report, "command stopped");
        self.current = None;
        Ok(Some(report))
    }

    fn status(&self) -> ProcessStatus {
        match &self.current {
            None => ProcessStatus::Idle,
            Some(process) => match process.outcome() {
                Some(outcome) => ProcessStatus::Exited(outcome),
                None => ProcessStatus::Running { pid: process.pid() },
            },
        }
    }
}
