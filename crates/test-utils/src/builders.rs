#![allow(dead_code)]

use rewatch::config::{ConfigFile, RawConfigFile};

/// Builder for `RawConfigFile` to simplify test setup.
pub struct RawConfigBuilder {
    config: RawConfigFile,
}

impl RawConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: RawConfigFile::default(),
        }
    }

    pub fn directory(mut self, dir: &str) -> Self {
        self.config.directory = dir.to_string();
        self
    }

    pub fn patterns(mut self, patterns: &[&str]) -> Self {
        self.config.patterns = patterns.iter().map(|p| p.to_string()).collect();
        self
    }

    pub fn command(mut self, argv: &[&str]) -> Self {
        self.config.command = argv.iter().map(|a| a.to_string()).collect();
        self
    }

    pub fn quiet_window(mut self, value: &str) -> Self {
        self.config.timing.quiet_window = value.to_string();
        self
    }

    pub fn settle_delay(mut self, value: &str) -> Self {
        self.config.timing.settle_delay = value.to_string();
        self
    }

    pub fn terminate_wait(mut self, value: &str) -> Self {
        self.config.timing.terminate_wait = value.to_string();
        self
    }

    pub fn stop_signals(mut self, signals: &[&str]) -> Self {
        self.config.process.stop_signals = signals.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn raw(self) -> RawConfigFile {
        self.config
    }

    pub fn build(self) -> ConfigFile {
        ConfigFile::try_from(self.config).expect("Failed to build valid config from builder")
    }
}

impl Default for RawConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
