// src/config/mod.rs

//! Configuration loading and validation for polywatch.
//!
//! Responsibilities:
//! - Define the TOML-backed data model and the resolved `WatcherConfig`
//!   (`model.rs`).
//! - Load a config file from disk and layer CLI flags over it (`loader.rs`).
//! - Validate and normalise values such as the polling interval
//!   (`validate.rs`).

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{default_config_path, load_from_path, resolve};
pub use model::{RawConfigFile, WatcherConfig};
pub use validate::parse_duration;
