#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::time::Duration;

use polywatch::config::WatcherConfig;

/// Builder for `WatcherConfig` to simplify test setup.
///
/// Starts from commands that are harmless no-ops (`true`) so tests only
/// spell out what they care about.
pub struct WatcherConfigBuilder {
    config: WatcherConfig,
}

impl WatcherConfigBuilder {
    pub fn new(root: impl AsRef<Path>) -> Self {
        let mut config = WatcherConfig::new(root.as_ref().to_path_buf());
        config.interval = Duration::from_millis(20);
        config.build_command = "true".to_string();
        config.run_command = "true".to_string();
        Self { config }
    }

    pub fn interval(mut self, interval: Duration) -> Self {
        self.config.interval = interval;
        self
    }

    pub fn build_command(mut self, cmd: &str) -> Self {
        self.config.build_command = cmd.to_string();
        self
    }

    pub fn run_command(mut self, cmd: &str) -> Self {
        self.config.run_command = cmd.to_string();
        self
    }

    pub fn dep_file(mut self, path: &str) -> Self {
        self.config.dep_file = Some(PathBuf::from(path));
        self
    }

    pub fn dep_command(mut self, cmd: &str) -> Self {
        self.config.dep_command = Some(cmd.to_string());
        self
    }

    pub fn include(mut self, rule: &str) -> Self {
        self.config.include.push(rule.to_string());
        self
    }

    pub fn exclude(mut self, rule: &str) -> Self {
        self.config.exclude.push(rule.to_string());
        self
    }

    pub fn build(self) -> WatcherConfig {
        self.config
    }
}
