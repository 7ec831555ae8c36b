// src/config/validate.rs

use std::path::PathBuf;
use std::time::Duration;

use tracing::warn;

use crate::config::duration::parse_duration;
use crate::config::model::{ConfigFile, ProcessSection, RawConfigFile, TimingSection};
use crate::engine::RunnerOptions;
use crate::errors::{Result, RewatchError};
use crate::exec::{CommandSpec, EscalationLadder};
use crate::watch::PatternSet;

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = RewatchError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        let directory = validate_directory(&raw.directory)?;
        let patterns = validate_patterns(&raw.patterns)?;
        let command = validate_command(&raw.command)?;
        let options = validate_timing(&raw.timing)?;
        let escalation = validate_process(&raw.process)?;
        Ok(ConfigFile::new_unchecked(
            directory, patterns, command, options, escalation,
        ))
    }
}

fn validate_directory(directory: &str) -> Result<PathBuf> {
    if directory.trim().is_empty() {
        return Err(RewatchError::ConfigError(
            "directory must not be empty".to_string(),
        ));
    }
    Ok(PathBuf::from(directory))
}

fn validate_patterns(patterns: &[String]) -> Result<PatternSet> {
    if patterns.is_empty() {
        warn!("no patterns configured; changes will never trigger a restart");
    }
    for pattern in patterns {
        if pattern.contains('/') {
            warn!(%pattern, "pattern contains '/' but patterns only match file names");
        }
    }
    PatternSet::new(patterns.iter().cloned())
}

fn validate_command(command: &[String]) -> Result<CommandSpec> {
    if let Some(program) = command.first() {
        if program.trim().is_empty() {
            return Err(RewatchError::ConfigError(
                "command program must not be an empty string".to_string(),
            ));
        }
    }
    Ok(CommandSpec::new(command.iter().cloned()))
}

fn validate_timing(timing: &TimingSection) -> Result<RunnerOptions> {
    let quiet_window = duration_field("quiet_window", &timing.quiet_window)?;
    let settle_delay = duration_field("settle_delay", &timing.settle_delay)?;
    let terminate_wait = duration_field("terminate_wait", &timing.terminate_wait)?;

    for (name, value) in [("quiet_window", quiet_window), ("terminate_wait", terminate_wait)] {
        if value.is_zero() {
            return Err(RewatchError::ConfigError(format!(
                "[timing].{name} must be greater than zero"
            )));
        }
    }

    Ok(RunnerOptions {
        settle_delay,
        quiet_window,
        terminate_wait,
    })
}

fn duration_field(name: &str, value: &str) -> Result<Duration> {
    parse_duration(value)
        .map_err(|e| RewatchError::ConfigError(format!("[timing].{name}: {e}")))
}

fn validate_process(process: &ProcessSection) -> Result<EscalationLadder> {
    EscalationLadder::from_names(process.stop_signals.as_slice()).map_err(|e| match e {
        RewatchError::ConfigError(msg) => {
            RewatchError::ConfigError(format!("[process].stop_signals: {msg}"))
        }
        other => other,
    })
}
