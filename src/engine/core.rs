// src/engine/core.rs

//! Pure core of the watch loop.
//!
//! This module contains a synchronous, deterministic "core" that consumes one
//! [`Fingerprint`] per tick and decides what the IO shell should do next.
//!
//! The async/IO-heavy shell (`engine::runtime::WatchLoop`) is responsible for:
//! - running the scan on the blocking pool
//! - running dependency/build commands and restarting the app
//! - sleeping between ticks and handling shutdown
//!
//! The core has no Tokio types, does no IO, and is unit tested on its own.

use std::time::SystemTime;

use tracing::debug;

use crate::config::WatcherConfig;
use crate::engine::CyclePlan;
use crate::watch::Fingerprint;

/// Fingerprint the core starts from.
///
/// The first real scan is therefore treated as a change, unless the tree's
/// digest happens to be zero. That coincidence is accepted rather than
/// special-casing the first tick.
pub const SENTINEL_FINGERPRINT: u64 = 0;

/// Mutable state carried from one tick to the next.
#[derive(Debug, Clone)]
pub struct WatchCore {
    previous_fingerprint: u64,
    previous_dep_mtime: Option<SystemTime>,
    has_dep_command: bool,
}

impl WatchCore {
    pub fn new(has_dep_command: bool) -> Self {
        Self {
            previous_fingerprint: SENTINEL_FINGERPRINT,
            previous_dep_mtime: None,
            has_dep_command,
        }
    }

    pub fn from_config(cfg: &WatcherConfig) -> Self {
        Self::new(cfg.effective_dep_command().is_some())
    }

    pub fn previous_fingerprint(&self) -> u64 {
        self.previous_fingerprint
    }

    /// Dependency file mtime to hand to the next scan.
    pub fn previous_dep_mtime(&self) -> Option<SystemTime> {
        self.previous_dep_mtime
    }

    /// Record a successful scan and decide what to do.
    ///
    /// The new fingerprint is stored before anything is built and is never
    /// rolled back: a failed build is not retried until the tree changes
    /// again.
    pub fn on_scan(&mut self, scan: &Fingerprint) -> CyclePlan {
        self.previous_dep_mtime = scan.dep_mtime;

        if scan.digest == self.previous_fingerprint {
            return CyclePlan::Unchanged;
        }

        debug!(
            previous = %format!("{:016x}", self.previous_fingerprint),
            current = %format!("{:016x}", scan.digest),
            "fingerprint changed"
        );
        self.previous_fingerprint = scan.digest;

        CyclePlan::Rebuild {
            run_dependency: scan.dep_changed && self.has_dep_command,
        }
    }
}
