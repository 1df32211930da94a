// src/exec/command.rs

//! Shell command execution with inherited output streams.

use tokio::process::Command;
use tracing::{debug, info};

use crate::errors::{PolywatchError, Result};

/// Build a shell command appropriate for the platform.
///
/// stdin, stdout and stderr are inherited, so the command's output shows up
/// live in the watcher's console.
pub fn shell_command(command: &str) -> Command {
    if cfg!(windows) {
        let mut c = Command::new("cmd");
        c.arg("/C").arg(command);
        c
    } else {
        let mut c = Command::new("sh");
        c.arg("-c").arg(command);
        c
    }
}

/// Run `command` through the shell and wait for it to finish.
///
/// An empty (or blank) command is a successful no-op. A non-zero exit status
/// is reported as [`PolywatchError::CommandFailed`]. There is no timeout.
pub async fn run_shell(command: &str) -> Result<()> {
    if command.trim().is_empty() {
        debug!("empty command; nothing to run");
        return Ok(());
    }

    info!(command = %command, "running command");

    let status = shell_command(command)
        .status()
        .await
        .map_err(|source| PolywatchError::Spawn {
            command: command.to_string(),
            source,
        })?;

    if status.success() {
        debug!(command = %command, "command succeeded");
        Ok(())
    } else {
        Err(PolywatchError::CommandFailed {
            command: command.to_string(),
            code: status.code(),
        })
    }
}
