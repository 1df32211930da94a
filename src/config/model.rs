// src/config/model.rs

use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

/// Default build command when none is configured anywhere.
pub const DEFAULT_BUILD_COMMAND: &str = "echo 'No build command specified'";

/// Default run command when none is configured anywhere.
pub const DEFAULT_RUN_COMMAND: &str = "echo 'No run command specified'";

/// Default polling interval.
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(1);

/// Configuration as read from a TOML file.
///
/// ```toml
/// root = "."
/// interval = "500ms"
/// build = "go build -o myapp ."
/// run = "./myapp"
/// dep_file = "go.mod"
/// dep_command = "go mod tidy && go mod download"
/// include = [".go"]
/// exclude = [".git", "tmp"]
/// ```
///
/// Every key is optional. CLI flags are layered on top (see
/// [`crate::config::loader::resolve`]) and the result is turned into a
/// [`WatcherConfig`] through `TryFrom`, which applies defaults and checks
/// values.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct RawConfigFile {
    #[serde(default)]
    pub root: Option<String>,

    /// Duration string such as `"1s"` or `"250ms"`.
    #[serde(default)]
    pub interval: Option<String>,

    #[serde(default)]
    pub build: Option<String>,

    #[serde(default)]
    pub run: Option<String>,

    #[serde(default)]
    pub dep_file: Option<String>,

    #[serde(default)]
    pub dep_command: Option<String>,

    #[serde(default)]
    pub include: Option<Vec<String>>,

    #[serde(default)]
    pub exclude: Option<Vec<String>>,
}

/// Fully resolved watcher configuration.
///
/// Built once at startup and never mutated afterwards. The engine treats the
/// values as validated input: an empty command string simply means "nothing
/// to run".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatcherConfig {
    /// Directory tree to poll.
    pub root: PathBuf,
    /// Sleep between the end of one cycle and the next scan.
    pub interval: Duration,
    pub build_command: String,
    pub run_command: String,
    /// Manifest whose modification triggers `dep_command`. Only the base name
    /// is compared against scanned files.
    pub dep_file: Option<PathBuf>,
    pub dep_command: Option<String>,
    /// Prefix/suffix rules; empty means "everything not excluded".
    pub include: Vec<String>,
    /// Prefix/suffix rules; always win over `include`.
    pub exclude: Vec<String>,
}

impl WatcherConfig {
    /// Configuration for `root` with the built-in defaults for everything else.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            interval: DEFAULT_INTERVAL,
            build_command: DEFAULT_BUILD_COMMAND.to_string(),
            run_command: DEFAULT_RUN_COMMAND.to_string(),
            dep_file: None,
            dep_command: None,
            include: Vec::new(),
            exclude: Vec::new(),
        }
    }

    /// The dependency command, if one is configured and non-empty.
    pub fn effective_dep_command(&self) -> Option<&str> {
        self.dep_command
            .as_deref()
            .filter(|cmd| !cmd.trim().is_empty())
    }
}
