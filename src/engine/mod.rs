// src/engine/mod.rs

//! Orchestration engine for polywatch.
//!
//! One tick of the loop:
//!
//! ```text
//! scan ─┬─ unchanged ───────────────────────────────┐
//!       └─ changed ─ [dependency] ─ build ─ restart ─┴─ sleep ─ scan ...
//! ```
//!
//! A failed scan, dependency step or build ends the tick early; nothing is
//! retried until the fingerprint changes again.
//!
//! The pure decision logic lives in [`core`]; the async/IO shell is
//! implemented in [`runtime`].

pub mod core;
pub mod runtime;

pub use self::core::{WatchCore, SENTINEL_FINGERPRINT};
pub use self::runtime::WatchLoop;

/// What the core wants done after a successful scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CyclePlan {
    Unchanged,
    /// Build (after the dependency step, if requested) and restart.
    Rebuild { run_dependency: bool },
}

/// How a single tick ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    /// The root could not be scanned; state untouched.
    ScanFailed,
    Unchanged,
    /// The dependency command failed; build and restart skipped.
    DependencyFailed,
    /// The build command failed; restart skipped.
    BuildFailed,
    Restarted,
    /// Build succeeded but the app could not be started.
    RestartFailed,
}
