// src/config/overrides.rs

//! Command-line values that take precedence over the config file.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

use crate::cli::CliArgs;
use crate::config::model::RawConfigFile;

static SEPARATOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[,\s]+").expect("pattern separator regex is valid"));

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    pub directory: Option<String>,
    pub patterns: Option<Vec<String>>,
    pub command: Option<Vec<String>>,
}

impl ConfigOverrides {
    pub fn from_cli(args: &CliArgs) -> Self {
        Self {
            directory: args
                .dir
                .as_deref()
                .map(str::trim)
                .filter(|d| !d.is_empty())
                .map(str::to_string),
            patterns: args.pattern.as_deref().and_then(split_patterns),
            command: (!args.command.is_empty()).then(|| args.command.clone()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.directory.is_none() && self.patterns.is_none() && self.command.is_none()
    }

    pub fn apply(self, mut raw: RawConfigFile) -> RawConfigFile {
        if let Some(directory) = self.directory {
            raw.directory = directory;
        }
        if let Some(patterns) = self.patterns {
            raw.patterns = patterns;
        }
        if let Some(command) = self.command {
            raw.command = command;
        }
        raw
    }
}

/// Split a `--pattern` value on commas and whitespace.
///
/// Duplicates are dropped, keeping the first occurrence. Returns `None` when
/// nothing is left, so an empty flag doesn't wipe the configured patterns.
pub fn split_patterns(input: &str) -> Option<Vec<String>> {
    let mut seen = HashSet::new();
    let patterns: Vec<String> = SEPARATOR
        .split(input.trim())
        .filter(|p| !p.is_empty())
        .filter(|p| seen.insert(*p))
        .map(str::to_string)
        .collect();

    (!patterns.is_empty()).then_some(patterns)
}
