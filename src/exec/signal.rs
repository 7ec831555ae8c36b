// src/exec/signal.rs

//! Stopping a process group: signal, wait, escalate.

use std::str::FromStr;
use std::time::Duration;

use nix::errno::Errno;
use nix::sys::signal::{Signal, killpg};
use nix::unistd::Pid;
use tokio::time::{Instant, sleep, timeout};
use tracing::{debug, info, warn};

use crate::errors::{Result, RewatchError};
use crate::exec::process::{ExitOutcome, ManagedProcess};

const SWEEP_POLL: Duration = Duration::from_millis(50);

/// Ordered list of signals used to stop a process group.
///
/// Step `n` is sent after step `n - 1` went unanswered for one wait budget.
/// The last step is repeated until the process is gone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EscalationLadder {
    steps: Vec<Signal>,
}

impl Default for EscalationLadder {
    fn default() -> Self {
        Self {
            steps: vec![Signal::SIGINT, Signal::SIGKILL],
        }
    }
}

impl EscalationLadder {
    pub fn new(steps: Vec<Signal>) -> Result<Self> {
        if steps.is_empty() {
            return Err(RewatchError::ConfigError(
                "stop signal list must not be empty".to_string(),
            ));
        }
        Ok(Self { steps })
    }

    /// Build from names such as `"SIGINT"`, `"int"` or `"KILL"`.
    pub fn from_names<S: AsRef<str>>(names: &[S]) -> Result<Self> {
        let steps = names
            .iter()
            .map(|n| parse_signal(n.as_ref()))
            .collect::<Result<Vec<_>>>()?;
        Self::new(steps)
    }

    pub fn steps(&self) -> &[Signal] {
        &self.steps
    }

    /// Signal for the given attempt (0-based), clamped to the last step.
    pub fn signal_at(&self, attempt: usize) -> Signal {
        self.steps[attempt.min(self.steps.len() - 1)]
    }
}

pub fn parse_signal(name: &str) -> Result<Signal> {
    let upper = name.trim().to_ascii_uppercase();
    let full = if upper.starts_with("SIG") {
        upper
    } else {
        format!("SIG{upper}")
    };
    Signal::from_str(&full)
        .map_err(|_| RewatchError::ConfigError(format!("unknown signal '{name}'")))
}

/// What a terminate call did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TerminationReport {
    pub pid: u32,
    /// Signals successfully delivered to the group, in order.
    pub signals: Vec<Signal>,
    pub outcome: ExitOutcome,
    /// True if group members outlived the leader by a whole wait budget and
    /// were killed.
    pub swept_group: bool,
}

/// Walk `ladder` against the process group of `process` until the leader's
/// exit has been observed, waiting `wait_budget` between steps.
///
/// Only a failure to deliver the first signal is an error. `ESRCH` (group
/// already gone) never is.
pub(crate) async fn terminate_group(
    process: &mut ManagedProcess,
    ladder: &EscalationLadder,
    wait_budget: Duration,
) -> Result<TerminationReport> {
    let pgid = process.pgid();
    let mut signals = Vec::new();
    let mut attempt = 0usize;

    let outcome = loop {
        let signal = ladder.signal_at(attempt);
        match killpg(pgid, signal) {
            Ok(()) => signals.push(signal),
            Err(Errno::ESRCH) => debug!(%pgid, "process group already gone"),
            Err(source) if attempt == 0 => {
                return Err(RewatchError::Signal {
                    pgid: pgid.as_raw(),
                    signal,
                    source,
                });
            }
            Err(err) => warn!(%pgid, %signal, error = %err, "failed to signal process group"),
        }

        match timeout(wait_budget, process.wait_exit()).await {
            Ok(outcome) => break outcome,
            Err(_) => {
                attempt += 1;
                info!(
                    pid = process.pid(),
                    next = %ladder.signal_at(attempt),
                    "process still running after {:?}; escalating",
                    wait_budget
                );
            }
        }
    };

    let swept_group = sweep_group(pgid, wait_budget).await;

    Ok(TerminationReport {
        pid: process.pid(),
        signals,
        outcome,
        swept_group,
    })
}

/// Kill whatever is left of the group once its leader is gone.
///
/// Members already got the ladder's signals along with the leader, so they
/// get one more `wait_budget` to finish on their own first.
async fn sweep_group(pgid: Pid, wait_budget: Duration) -> bool {
    if !group_alive(pgid) {
        return false;
    }

    debug!(%pgid, "leader exited; waiting for the rest of the group");
    let deadline = Instant::now() + wait_budget;
    while Instant::now() < deadline {
        sleep(SWEEP_POLL.min(wait_budget)).await;
        if !group_alive(pgid) {
            return false;
        }
    }

    match killpg(pgid, Signal::SIGKILL) {
        Ok(()) => {
            info!(%pgid, "killed processes left behind in the group");
            true
        }
        Err(_) => false,
    }
}

/// The null signal only probes; it succeeds while any member remains.
fn group_alive(pgid: Pid) -> bool {
    killpg(pgid, None::<Signal>).is_ok()
}
