// src/watch/fingerprint.rs

//! Poll-and-diff change detection.
//!
//! A scan walks the watch root and folds `(relative path, size, mtime)` of
//! every accepted file into one streaming `blake3` hasher. Two scans of an
//! untouched tree give the same digest; adding, removing, resizing or
//! touching an accepted file changes it. File contents are never read.
//!
//! The same walk also notices when the configured dependency manifest (e.g.
//! `go.mod`) got a new modification time.

use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use blake3::Hasher;
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::config::WatcherConfig;
use crate::errors::{PolywatchError, Result};
use crate::watch::path_utils::{is_hidden_name, relative_str};
use crate::watch::patterns::PathRules;

/// Result of one scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fingerprint {
    /// 64-bit digest over all accepted files, in traversal order.
    pub digest: u64,
    /// True if an accepted file named like the dependency file has a
    /// modification time different from the one passed into the scan.
    pub dep_changed: bool,
    /// Dependency file mtime to pass into the next scan.
    pub dep_mtime: Option<SystemTime>,
    /// Number of files that contributed to `digest`.
    pub files: usize,
}

/// Walks a directory tree and fingerprints the files selected by
/// [`PathRules`].
#[derive(Debug, Clone)]
pub struct TreeFingerprinter {
    root: PathBuf,
    rules: PathRules,
    /// Base name of the dependency file; files anywhere in the tree with this
    /// name are compared.
    dep_name: Option<OsString>,
}

impl TreeFingerprinter {
    pub fn new(root: impl Into<PathBuf>, rules: PathRules, dep_file: Option<&Path>) -> Self {
        Self {
            root: root.into(),
            rules,
            dep_name: dep_file.and_then(|p| p.file_name()).map(|n| n.to_os_string()),
        }
    }

    pub fn from_config(cfg: &WatcherConfig) -> Self {
        Self::new(
            cfg.root.clone(),
            PathRules::from_config(cfg),
            cfg.dep_file.as_deref(),
        )
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Scan the tree once.
    ///
    /// Entries that cannot be read are logged and skipped. Only a root that
    /// cannot be read at all yields [`PolywatchError::ScanRoot`].
    pub fn scan(&self, previous_dep_mtime: Option<SystemTime>) -> Result<Fingerprint> {
        let root_meta = fs::metadata(&self.root).map_err(|source| PolywatchError::ScanRoot {
            path: self.root.clone(),
            source,
        })?;
        if !root_meta.is_dir() {
            return Err(PolywatchError::ScanRoot {
                path: self.root.clone(),
                source: io::Error::new(io::ErrorKind::NotADirectory, "watch root is not a directory"),
            });
        }

        let mut hasher = Hasher::new();
        let mut dep_changed = false;
        let mut dep_mtime = previous_dep_mtime;
        let mut files = 0usize;

        // Hidden directories are pruned with their whole subtree; the root is
        // always walked, whatever its name.
        let walker = WalkDir::new(&self.root)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| {
                e.depth() == 0 || !(e.file_type().is_dir() && is_hidden_name(e.file_name()))
            });

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) if err.depth() == 0 => {
                    let message = err.to_string();
                    let source = err
                        .into_io_error()
                        .unwrap_or_else(|| io::Error::other(message));
                    return Err(PolywatchError::ScanRoot {
                        path: self.root.clone(),
                        source,
                    });
                }
                Err(err) => {
                    warn!(error = %err, "error accessing entry; skipping");
                    continue;
                }
            };

            if !entry.file_type().is_file() {
                continue;
            }

            let Some(rel) = relative_str(&self.root, entry.path()) else {
                continue;
            };
            if !self.rules.matches(&rel) {
                continue;
            }

            let (size, mtime) = match entry.metadata() {
                Ok(meta) => match meta.modified() {
                    Ok(mtime) => (meta.len(), mtime),
                    Err(err) => {
                        warn!(path = %rel, error = %err, "no modification time; skipping");
                        continue;
                    }
                },
                Err(err) => {
                    warn!(path = %rel, error = %err, "cannot stat file; skipping");
                    continue;
                }
            };

            feed(&mut hasher, rel.as_bytes());
            feed(&mut hasher, size.to_string().as_bytes());
            feed(&mut hasher, render_mtime(mtime).as_bytes());
            files += 1;

            if let Some(dep_name) = &self.dep_name {
                if entry.file_name() == dep_name.as_os_str() && dep_mtime != Some(mtime) {
                    debug!(path = %rel, "dependency file modification time changed");
                    dep_changed = true;
                    dep_mtime = Some(mtime);
                }
            }
        }

        let digest = digest_u64(&hasher);
        debug!(digest = %format!("{digest:016x}"), files, dep_changed, "scan complete");

        Ok(Fingerprint {
            digest,
            dep_changed,
            dep_mtime,
            files,
        })
    }
}

/// Feed one field, terminated so that adjacent fields cannot run together.
fn feed(hasher: &mut Hasher, bytes: &[u8]) {
    hasher.update(bytes);
    hasher.update(&[0]);
}

fn digest_u64(hasher: &Hasher) -> u64 {
    let hash = hasher.finalize();
    let mut first = [0u8; 8];
    first.copy_from_slice(&hash.as_bytes()[..8]);
    u64::from_le_bytes(first)
}

/// Textual form of an mtime: `<secs>.<nanos>` relative to the UNIX epoch.
pub fn render_mtime(mtime: SystemTime) -> String {
    match mtime.duration_since(UNIX_EPOCH) {
        Ok(d) => format!("{}.{:09}", d.as_secs(), d.subsec_nanos()),
        Err(e) => {
            let d = e.duration();
            format!("-{}.{:09}", d.as_secs(), d.subsec_nanos())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn mtime_rendering_keeps_nanoseconds() {
        let t = UNIX_EPOCH + Duration::new(12, 5);
        assert_eq!(render_mtime(t), "12.000000005");
    }

    #[test]
    fn mtime_rendering_before_epoch() {
        let t = UNIX_EPOCH - Duration::from_secs(3);
        assert_eq!(render_mtime(t), "-3.000000000");
    }

    #[test]
    fn missing_root_is_a_scan_root_error() {
        let fp = TreeFingerprinter::new(
            "/definitely/not/here/polywatch",
            PathRules::default(),
            None,
        );
        assert!(matches!(fp.scan(None), Err(PolywatchError::ScanRoot { .. })));
    }

    #[test]
    fn dep_name_is_the_base_name() {
        let fp = TreeFingerprinter::new(".", PathRules::default(), Some(Path::new("sub/go.mod")));
        assert_eq!(fp.dep_name.as_deref(), Some(std::ffi::OsStr::new("go.mod")));
    }
}
