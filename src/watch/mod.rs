// src/watch/mod.rs

//! Change detection by polling.
//!
//! This module is responsible for:
//! - Deciding which relative paths are watched (`patterns`).
//! - Fingerprinting the watched tree and spotting dependency-file changes
//!   (`fingerprint`).
//!
//! It knows nothing about builds or processes; the engine compares
//! fingerprints between ticks and decides what to run.

pub mod fingerprint;
pub mod path_utils;
pub mod patterns;

pub use fingerprint::{Fingerprint, TreeFingerprinter};
pub use patterns::{matches, PathRules};
