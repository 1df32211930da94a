#![allow(dead_code)]

use std::fs::{self, File};
use std::path::Path;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

pub use polywatch_test_utils::{init_tracing, with_timeout};

/// Fixed timestamp `secs` after the epoch, so tests never depend on the
/// filesystem's mtime granularity.
pub fn at(secs: u64) -> SystemTime {
    UNIX_EPOCH + Duration::from_secs(secs)
}

/// Write `contents` to `path` (creating parent dirs) and pin its mtime.
pub fn write_file(path: &Path, contents: &str, mtime_secs: u64) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, contents).unwrap();
    set_mtime(path, mtime_secs);
}

/// Change only the modification time of an existing file.
pub fn set_mtime(path: &Path, mtime_secs: u64) {
    let file = File::options().write(true).open(path).unwrap();
    file.set_modified(at(mtime_secs)).unwrap();
}
