// src/watch/path_utils.rs

//! Utility functions for path handling in the scanner.

use std::path::Path;

/// Convert a path into a string relative to `root`, with forward slashes.
///
/// Returns `None` if `path` does not live under `root`.
pub fn relative_str(root: &Path, path: &Path) -> Option<String> {
    let rel = path.strip_prefix(root).ok()?;
    Some(rel.to_string_lossy().replace('\\', "/"))
}

/// True if a directory name marks it as hidden (`.git`, `.idea`, ...).
pub fn is_hidden_name(name: &std::ffi::OsStr) -> bool {
    name.to_string_lossy().starts_with('.')
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::OsStr;
    use std::path::PathBuf;

    #[test]
    fn relative_paths_use_forward_slashes() {
        let root = PathBuf::from("project");
        let file = root.join("src").join("main.go");
        assert_eq!(relative_str(&root, &file).as_deref(), Some("src/main.go"));
    }

    #[test]
    fn foreign_paths_are_rejected() {
        assert_eq!(relative_str(Path::new("a"), Path::new("b/c")), None);
    }

    #[test]
    fn hidden_names() {
        assert!(is_hidden_name(OsStr::new(".git")));
        assert!(!is_hidden_name(OsStr::new("src")));
    }
}
