// src/config/model.rs

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::engine::RunnerOptions;
use crate::exec::{CommandSpec, EscalationLadder};
use crate::watch::PatternSet;

/// Configuration as read from (and written back to) a TOML file.
///
/// ```toml
/// directory = "."
/// patterns = ["*.rs", "*.toml"]
/// command = ["cargo", "run"]
///
/// [timing]
/// quiet_window = "500ms"
/// settle_delay = "200ms"
/// terminate_wait = "2s"
///
/// [process]
/// stop_signals = ["SIGINT", "SIGKILL"]
/// ```
///
/// Every field is optional. Without a config file at all, the defaults watch
/// every file under the current directory and run nothing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawConfigFile {
    /// Directory (or single file) to watch.
    #[serde(default = "default_directory")]
    pub directory: String,

    /// Glob patterns matched against file names, not paths.
    #[serde(default = "default_patterns")]
    pub patterns: Vec<String>,

    /// Program and arguments. Empty means "run nothing".
    #[serde(default)]
    pub command: Vec<String>,

    #[serde(default)]
    pub timing: TimingSection,

    #[serde(default)]
    pub process: ProcessSection,
}

fn default_directory() -> String {
    ".".to_string()
}

fn default_patterns() -> Vec<String> {
    vec!["*".to_string()]
}

impl Default for RawConfigFile {
    fn default() -> Self {
        Self {
            directory: default_directory(),
            patterns: default_patterns(),
            command: Vec::new(),
            timing: TimingSection::default(),
            process: ProcessSection::default(),
        }
    }
}

/// `[timing]` section. Durations are strings like `"250ms"`, `"2s"`, `"1m"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimingSection {
    #[serde(default = "default_quiet_window")]
    pub quiet_window: String,

    #[serde(default = "default_settle_delay")]
    pub settle_delay: String,

    #[serde(default = "default_terminate_wait")]
    pub terminate_wait: String,
}

fn default_quiet_window() -> String {
    "500ms".to_string()
}

fn default_settle_delay() -> String {
    "200ms".to_string()
}

fn default_terminate_wait() -> String {
    "2s".to_string()
}

impl Default for TimingSection {
    fn default() -> Self {
        Self {
            quiet_window: default_quiet_window(),
            settle_delay: default_settle_delay(),
            terminate_wait: default_terminate_wait(),
        }
    }
}

/// `[process]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessSection {
    /// Signals sent to the command's process group when stopping it, in
    /// order. The last one repeats until the process is gone.
    #[serde(default = "default_stop_signals")]
    pub stop_signals: Vec<String>,
}

fn default_stop_signals() -> Vec<String> {
    vec!["SIGINT".to_string(), "SIGKILL".to_string()]
}

impl Default for ProcessSection {
    fn default() -> Self {
        Self {
            stop_signals: default_stop_signals(),
        }
    }
}

/// Validated configuration, ready to build a runner from.
///
/// Obtain one through `ConfigFile::try_from(raw)` (see `validate.rs`).
#[derive(Debug, Clone)]
pub struct ConfigFile {
    pub directory: PathBuf,
    pub patterns: PatternSet,
    pub command: CommandSpec,
    pub options: RunnerOptions,
    pub escalation: EscalationLadder,
}

impl ConfigFile {
    pub(crate) fn new_unchecked(
        directory: PathBuf,
        patterns: PatternSet,
        command: CommandSpec,
        options: RunnerOptions,
        escalation: EscalationLadder,
    ) -> Self {
        Self {
            directory,
            patterns,
            command,
            options,
            escalation,
        }
    }
}
