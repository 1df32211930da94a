// src/exec/mod.rs

//! Process execution layer.
//!
//! This module is responsible for actually running the configured commands,
//! using `tokio::process::Command`.
//!
//! - [`command`] runs one shell command to completion (dependency and build
//!   steps).
//! - [`supervisor`] owns the single long-lived app process and restarts it.
//! - [`backend`] provides the `CommandBackend` trait and a concrete
//!   `RealCommandBackend` that the watch loop uses in production, and which
//!   tests can replace with a fake implementation.

pub mod backend;
pub mod command;
pub mod supervisor;

pub use backend::{CommandBackend, CommandStep, RealCommandBackend};
pub use command::run_shell;
pub use supervisor::{Launcher, ProcessSupervisor, RunningProcess};
