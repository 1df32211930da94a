// src/cli.rs

//! CLI argument parsing using `clap`.
//!
//! Every watcher option is optional here: values left unset fall back to the
//! config file and then to the built-in defaults (see
//! [`crate::config::loader::resolve`]).

use clap::{Parser, ValueEnum};

/// Command-line arguments for `polywatch`.
#[derive(Debug, Clone, Default, Parser)]
#[command(
    name = "polywatch",
    version,
    about = "Poll a project tree, rebuild on change and restart the app.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to a config file (TOML).
    ///
    /// If omitted, `Polywatch.toml` in the current directory is used when it
    /// exists.
    #[arg(long, value_name = "PATH")]
    pub config: Option<String>,

    /// Directory to watch.
    #[arg(long, value_name = "DIR")]
    pub root: Option<String>,

    /// Polling interval (e.g. `1s`, `500ms`, `1m30s`).
    #[arg(long, value_name = "DURATION")]
    pub interval: Option<String>,

    /// Build command to run on change.
    #[arg(long, value_name = "CMD")]
    pub build: Option<String>,

    /// Run command to execute the built app.
    #[arg(long, value_name = "CMD")]
    pub run: Option<String>,

    /// Dependency file to monitor (e.g. `go.mod`, `package.json`).
    #[arg(long, value_name = "PATH")]
    pub depfile: Option<String>,

    /// Command to run when the dependency file changes (e.g. `npm install`).
    #[arg(long, value_name = "CMD")]
    pub depcommand: Option<String>,

    /// Comma-separated include rules (prefix or suffix, e.g. `.go,services`).
    #[arg(long, value_name = "RULES", value_delimiter = ',')]
    pub include: Option<Vec<String>>,

    /// Comma-separated exclude rules (prefix or suffix, e.g. `.git,tmp`).
    #[arg(long, value_name = "RULES", value_delimiter = ',')]
    pub exclude: Option<Vec<String>>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `POLYWATCH_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Resolve and print the configuration, but don't watch or run anything.
    #[arg(long)]
    pub dry_run: bool,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn comma_separated_rules_are_split() {
        let args = CliArgs::parse_from([
            "polywatch",
            "--include",
            ".go,services",
            "--exclude=.git,tmp",
        ]);
        assert_eq!(
            args.include,
            Some(vec![".go".to_string(), "services".to_string()])
        );
        assert_eq!(
            args.exclude,
            Some(vec![".git".to_string(), "tmp".to_string()])
        );
    }

    #[test]
    fn unset_flags_stay_none() {
        let args = CliArgs::parse_from(["polywatch"]);
        assert!(args.build.is_none());
        assert!(args.interval.is_none());
        assert!(args.include.is_none());
        assert!(!args.dry_run);
    }
}
