// src/watch/patterns.rs

//! Include/exclude rules deciding which files take part in change detection.
//!
//! A rule is a plain string that matches a relative path (e.g.
//! `"services/api/main.go"`) when the path starts with it or ends with it. So
//! `".go"` picks up every Go file, `"services"` the whole `services/` subtree
//! and `".git"` both the `.git` directory and `.gitignore`.

use crate::config::WatcherConfig;

/// Returns true if `rel_path` participates in change detection.
///
/// - Exclude rules are checked first and always win.
/// - An empty include list accepts every path that was not excluded.
/// - Otherwise at least one include rule has to match.
pub fn matches<S: AsRef<str>>(rel_path: &str, include: &[S], exclude: &[S]) -> bool {
    if exclude.iter().any(|rule| rule_matches(rel_path, rule.as_ref())) {
        return false;
    }
    if include.is_empty() {
        return true;
    }
    include.iter().any(|rule| rule_matches(rel_path, rule.as_ref()))
}

fn rule_matches(rel_path: &str, rule: &str) -> bool {
    rel_path.starts_with(rule) || rel_path.ends_with(rule)
}

/// Compiled rule lists for a watcher.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathRules {
    include: Vec<String>,
    exclude: Vec<String>,
}

impl PathRules {
    pub fn new(include: Vec<String>, exclude: Vec<String>) -> Self {
        Self { include, exclude }
    }

    pub fn from_config(cfg: &WatcherConfig) -> Self {
        Self::new(cfg.include.clone(), cfg.exclude.clone())
    }

    pub fn include(&self) -> &[String] {
        &self.include
    }

    pub fn exclude(&self) -> &[String] {
        &self.exclude
    }

    /// See [`matches`].
    pub fn matches(&self, rel_path: &str) -> bool {
        matches(rel_path, &self.include, &self.exclude)
    }
}
