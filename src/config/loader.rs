// src/config/loader.rs

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::cli::CliArgs;
use crate::config::model::{RawConfigFile, WatcherConfig};
use crate::errors::Result;

/// Load a configuration file from a given path and return the raw
/// `RawConfigFile`.
///
/// This only performs TOML deserialization; defaults and validation happen
/// when the raw file is converted into a [`WatcherConfig`].
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawConfigFile> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;

    let config: RawConfigFile = toml::from_str(&contents)?;

    Ok(config)
}

/// Build the effective `WatcherConfig` for a CLI invocation.
///
/// Precedence per option: CLI flag, then config file, then built-in default.
///
/// - `--config PATH` must point to a readable file.
/// - Without `--config`, [`default_config_path`] is loaded only if it exists.
pub fn resolve(args: &CliArgs) -> Result<WatcherConfig> {
    let file = match &args.config {
        Some(path) => load_from_path(path)?,
        None => {
            let path = default_config_path();
            if path.is_file() {
                debug!(path = ?path, "loading default config file");
                load_from_path(&path)?
            } else {
                RawConfigFile::default()
            }
        }
    };

    WatcherConfig::try_from(overlay_cli(file, args))
}

/// Layer the flags that were given on the command line over `file`.
pub fn overlay_cli(file: RawConfigFile, args: &CliArgs) -> RawConfigFile {
    RawConfigFile {
        root: args.root.clone().or(file.root),
        interval: args.interval.clone().or(file.interval),
        build: args.build.clone().or(file.build),
        run: args.run.clone().or(file.run),
        dep_file: args.depfile.clone().or(file.dep_file),
        dep_command: args.depcommand.clone().or(file.dep_command),
        include: args.include.clone().or(file.include),
        exclude: args.exclude.clone().or(file.exclude),
    }
}

/// Config file picked up from the working directory when `--config` is not
/// given.
pub fn default_config_path() -> PathBuf {
    PathBuf::from("Polywatch.toml")
}
