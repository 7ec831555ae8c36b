// src/exec/process.rs

//! A single spawned command and the background task waiting on it.

use std::os::unix::process::ExitStatusExt;
use std::process::ExitStatus;

use anyhow::anyhow;
use nix::unistd::Pid;
use tokio::sync::watch;
use tracing::{Instrument, Span, info, info_span, warn};

use crate::errors::{Result, RewatchError};
use crate::exec::command::CommandSpec;

/// How a managed process ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitOutcome {
    Success,
    /// Non-zero exit (`code`) or death by signal (`signal`). Both are
    /// `None` when the exit status couldn't be collected.
    Failure {
        code: Option<i32>,
        signal: Option<i32>,
    },
}

impl ExitOutcome {
    const UNKNOWN: ExitOutcome = ExitOutcome::Failure {
        code: None,
        signal: None,
    };

    pub fn success(&self) -> bool {
        matches!(self, ExitOutcome::Success)
    }
}

impl From<ExitStatus> for ExitOutcome {
    fn from(status: ExitStatus) -> Self {
        if status.success() {
            ExitOutcome::Success
        } else {
            ExitOutcome::Failure {
                code: status.code(),
                signal: status.signal(),
            }
        }
    }
}

/// What the lifecycle currently holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessStatus {
    /// Never started, or cleared by a completed terminate.
    Idle,
    Running { pid: u32 },
    /// Exited on its own and not yet cleared.
    Exited(ExitOutcome),
}

/// Handle to a spawned process. Owned by the lifecycle actor only.
#[derive(Debug)]
pub(crate) struct ManagedProcess {
    pid: u32,
    pgid: Pid,
    exit_rx: watch::Receiver<Option<ExitOutcome>>,
}

impl ManagedProcess {
    /// Spawn `command` and a waiter task that records its exit.
    ///
    /// Returns as soon as the spawn call completes.
    pub(crate) fn spawn(command: &CommandSpec, span: &Span) -> Result<Self> {
        let mut cmd = command
            .to_command()
            .ok_or_else(|| RewatchError::ConfigError("cannot start an empty command".to_string()))?;

        let mut child = cmd.spawn().map_err(|source| RewatchError::Spawn {
            command: command.to_string(),
            source,
        })?;

        let pid = child
            .id()
            .ok_or_else(|| RewatchError::Other(anyhow!("spawned process for '{command}' has no pid")))?;
        let raw_pid = i32::try_from(pid)
            .map_err(|_| RewatchError::Other(anyhow!("pid {pid} out of range")))?;

        let (exit_tx, exit_rx) = watch::channel(None);

        tokio::spawn(
            async move {
                let outcome = match child.wait().await {
                    Ok(status) => ExitOutcome::from(status),
                    Err(err) => {
                        warn!(error = %err, "failed to wait for process");
                        ExitOutcome::UNKNOWN
                    }
                };

                match outcome {
                    ExitOutcome::Success => info!("command exited successfully"),
                    ExitOutcome::Failure { code, signal } => {
                        info!(?code, ?signal, "command terminated")
                    }
                }

                exit_tx.send_replace(Some(outcome));
            }
            .instrument(info_span!(parent: span, "process", pid)),
        );

        info!(pid, command = %command, "command started");

        Ok(Self {
            pid,
            // Leader of its own group, so pgid == pid.
            pgid: Pid::from_raw(raw_pid),
            exit_rx,
        })
    }

    pub(crate) fn pid(&self) -> u32 {
        self.pid
    }

    pub(crate) fn pgid(&self) -> Pid {
        self.pgid
    }

    pub(crate) fn outcome(&self) -> Option<ExitOutcome> {
        *self.exit_rx.borrow()
    }

    pub(crate) fn has_exited(&self) -> bool {
        self.outcome().is_some()
    }

    /// Wait until the waiter task has recorded the exit.
    pub(crate) async fn wait_exit(&mut self) -> ExitOutcome {
        match self.exit_rx.wait_for(Option::is_some).await {
            Ok(outcome) => (*outcome).unwrap_or(ExitOutcome::UNKNOWN),
            // Waiter gone without reporting; nothing left to wait for.
            Err(_) => ExitOutcome::UNKNOWN,
        }
    }
}
