// src/exec/backend.rs

//! Pluggable command backend abstraction.
//!
//! The watch loop talks to a `CommandBackend` instead of spawning processes
//! itself. This makes it easy to swap in a fake backend in tests while
//! keeping the production implementation in [`command`](super::command) and
//! [`supervisor`](super::supervisor).

use std::future::Future;
use std::pin::Pin;

use crate::errors::Result;

use super::command::run_shell;
use super::supervisor::ProcessSupervisor;

/// Which blocking step of a cycle a command belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandStep {
    /// Dependency refresh (e.g. `npm install`), only after the dependency
    /// file changed.
    Dependency,
    Build,
}

/// Trait abstracting how the loop's commands are executed.
///
/// Production code uses [`RealCommandBackend`]; tests can provide their own
/// implementation that doesn't spawn real processes.
pub trait CommandBackend: Send {
    /// Run a blocking step to completion. `Err` aborts the cycle.
    fn run_step<'a>(
        &'a mut self,
        step: CommandStep,
        command: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + 'a>>;

    /// Replace the running app with a fresh `command` process.
    fn restart<'a>(
        &'a mut self,
        command: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + 'a>>;

    /// Stop whatever is still running; called once when the loop exits.
    fn shutdown(&mut self) -> Pin<Box<dyn Future<Output = ()> + Send + '_>>;
}

/// Real backend used in production: shell commands for the blocking steps
/// and a [`ProcessSupervisor`] for the app.
#[derive(Debug, Clone, Default)]
pub struct RealCommandBackend {
    supervisor: ProcessSupervisor,
}

impl RealCommandBackend {
    pub fn new(supervisor: ProcessSupervisor) -> Self {
        Self { supervisor }
    }

    pub fn supervisor(&self) -> &ProcessSupervisor {
        &self.supervisor
    }
}

impl CommandBackend for RealCommandBackend {
    fn run_step<'a>(
        &'a mut self,
        _step: CommandStep,
        command: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + 'a>> {
        Box::pin(run_shell(command))
    }

    fn restart<'a>(
        &'a mut self,
        command: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + 'a>> {
        let result = self.supervisor.restart(command).map(|_| ());
        Box::pin(async move { result })
    }

    fn shutdown(&mut self) -> Pin<Box<dyn Future<Output = ()> + Send + '_>> {
        self.supervisor.stop();
        Box::pin(async {})
    }
}
