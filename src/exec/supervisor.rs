// src/exec/supervisor.rs

//! Owner of the single long-lived "run" process.
//!
//! At most one process is tracked at any time. The tracked handle lives in a
//! [`ProcessSlot`] behind one mutex, shared by two writers:
//!
//! - [`ProcessSupervisor::restart`] (driven by the watch loop), which kills
//!   the previous process and stores the new one;
//! - the per-process exit watcher task, which clears the slot once its
//!   process has exited, but only if the slot still refers to that process.
//!
//! Killing is forced and not awaited: `restart` requests the kill and
//! immediately spawns the replacement, so old and new processes may overlap
//! for a moment (e.g. both holding a listening port).

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::process::{Child, Command};
use tokio::sync::oneshot;
use tracing::{debug, info, warn};

use crate::errors::{PolywatchError, Result};
use crate::exec::command::shell_command;

/// Public view of a tracked process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunningProcess {
    /// Monotonic id assigned by the supervisor; never reused.
    pub generation: u64,
    /// OS process id, if the platform reported one.
    pub pid: Option<u32>,
}

/// Internal handle: identity plus the channel asking the exit watcher to kill
/// the process.
struct TrackedProcess {
    info: RunningProcess,
    kill: oneshot::Sender<()>,
}

impl TrackedProcess {
    /// Best-effort forced kill. Fails silently if the process already exited.
    fn kill(self) -> RunningProcess {
        if self.kill.send(()).is_err() {
            debug!(
                generation = self.info.generation,
                "previous process already finished while killing"
            );
        }
        self.info
    }
}

/// The guarded state. Only these three operations touch the handle.
#[derive(Default)]
struct ProcessSlot {
    current: Option<TrackedProcess>,
    last_generation: u64,
}

impl ProcessSlot {
    fn current(&self) -> Option<RunningProcess> {
        self.current.as_ref().map(|p| p.info)
    }

    /// Replace the tracked process, killing the old one if present.
    fn swap_and_kill(&mut self, next: Option<TrackedProcess>) -> Option<RunningProcess> {
        let previous = std::mem::replace(&mut self.current, next);
        previous.map(TrackedProcess::kill)
    }

    /// Clear the slot if it still holds process `generation`.
    fn clear_if_matches(&mut self, generation: u64) -> bool {
        match &self.current {
            Some(p) if p.info.generation == generation => {
                self.current = None;
                true
            }
            _ => false,
        }
    }

    fn next_generation(&mut self) -> u64 {
        self.last_generation += 1;
        self.last_generation
    }
}

/// Builds the `Command` that starts the app from the configured run command.
pub type Launcher = fn(&str) -> Command;

/// Restarts and tracks the app process. Cheap to clone; clones share state.
#[derive(Clone)]
pub struct ProcessSupervisor {
    slot: Arc<Mutex<ProcessSlot>>,
    launcher: Launcher,
}

impl Default for ProcessSupervisor {
    fn default() -> Self {
        Self::with_launcher(shell_command)
    }
}

impl fmt::Debug for ProcessSupervisor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProcessSupervisor")
            .field("current", &self.current())
            .finish()
    }
}

impl ProcessSupervisor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Supervisor that starts processes through `launcher` instead of the
    /// platform shell.
    pub fn with_launcher(launcher: Launcher) -> Self {
        Self {
            slot: Arc::default(),
            launcher,
        }
    }

    /// The currently tracked process, if any.
    pub fn current(&self) -> Option<RunningProcess> {
        lock(&self.slot).current()
    }

    /// Kill the tracked process (if any) and start `run_command` in its place.
    ///
    /// Must be called from within a Tokio runtime. Returns the new process,
    /// or `None` if `run_command` is blank (the old process is still killed).
    /// On spawn failure nothing is tracked afterwards.
    pub fn restart(&self, run_command: &str) -> Result<Option<RunningProcess>> {
        let mut slot = lock(&self.slot);

        if let Some(previous) = slot.swap_and_kill(None) {
            info!(
                generation = previous.generation,
                pid = ?previous.pid,
                "stopping previous app process"
            );
        }

        if run_command.trim().is_empty() {
            info!("no run command configured; nothing started");
            return Ok(None);
        }

        info!(command = %run_command, "starting app");
        let mut cmd = (self.launcher)(run_command);
        cmd.kill_on_drop(true);
        let child = cmd.spawn().map_err(|source| PolywatchError::Spawn {
            command: run_command.to_string(),
            source,
        })?;

        let info = RunningProcess {
            generation: slot.next_generation(),
            pid: child.id(),
        };
        let (kill_tx, kill_rx) = oneshot::channel();
        slot.swap_and_kill(Some(TrackedProcess {
            info,
            kill: kill_tx,
        }));
        drop(slot);

        tokio::spawn(watch_exit(Arc::clone(&self.slot), child, info, kill_rx));

        Ok(Some(info))
    }

    /// Kill the tracked process, if any, and return what was stopped.
    pub fn stop(&self) -> Option<RunningProcess> {
        let stopped = lock(&self.slot).swap_and_kill(None);
        if let Some(p) = stopped {
            info!(generation = p.generation, pid = ?p.pid, "stopping app process");
        }
        stopped
    }
}

fn lock(slot: &Mutex<ProcessSlot>) -> MutexGuard<'_, ProcessSlot> {
    // The slot holds no invariant a panicking holder could break halfway.
    slot.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Wait until the process exits on its own or a kill is requested, then clear
/// the slot if it still refers to this process.
async fn watch_exit(
    slot: Arc<Mutex<ProcessSlot>>,
    mut child: Child,
    info: RunningProcess,
    kill_rx: oneshot::Receiver<()>,
) {
    tokio::select! {
        status = child.wait() => match status {
            Ok(status) => info!(
                generation = info.generation,
                pid = ?info.pid,
                exit_code = ?status.code(),
                "app exited"
            ),
            Err(e) => warn!(
                generation = info.generation,
                error = %e,
                "failed waiting for app process"
            ),
        },

        // A dropped sender means nobody tracks this process any more; kill
        // it as well.
        _ = kill_rx => {
            if let Err(e) = child.start_kill() {
                debug!(
                    generation = info.generation,
                    error = %e,
                    "kill failed; process may have already exited"
                );
            }
            let _ = child.wait().await;
            debug!(generation = info.generation, pid = ?info.pid, "app process killed");
        }
    }

    if lock(&slot).clear_if_matches(info.generation) {
        debug!(generation = info.generation, "cleared tracked app process");
    }
}
