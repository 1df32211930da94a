// src/engine/runtime.rs

use std::fmt;
use std::sync::Arc;
use std::time::SystemTime;

use tokio::sync::oneshot;
use tracing::{debug, error, info, warn};

use crate::config::WatcherConfig;
use crate::errors::Result;
use crate::exec::{CommandBackend, CommandStep};
use crate::watch::{Fingerprint, TreeFingerprinter};

use super::core::WatchCore;
use super::{CycleOutcome, CyclePlan};

/// Polls the tree on a fixed interval and drives builds and restarts through
/// a `CommandBackend`.
///
/// This is the IO shell around `WatchCore`, which holds the change-detection
/// state. Ticks run strictly one after another; a hanging build stalls the
/// loop.
pub struct WatchLoop<B: CommandBackend> {
    config: Arc<WatcherConfig>,
    fingerprinter: Arc<TreeFingerprinter>,
    core: WatchCore,
    backend: B,
}

impl<B: CommandBackend> fmt::Debug for WatchLoop<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WatchLoop")
            .field("root", &self.config.root)
            .field("core", &self.core)
            .finish_non_exhaustive()
    }
}

impl<B: CommandBackend> WatchLoop<B> {
    pub fn new(config: WatcherConfig, backend: B) -> Self {
        let fingerprinter = TreeFingerprinter::from_config(&config);
        let core = WatchCore::from_config(&config);
        Self {
            config: Arc::new(config),
            fingerprinter: Arc::new(fingerprinter),
            core,
            backend,
        }
    }

    pub fn config(&self) -> &WatcherConfig {
        &self.config
    }

    /// Change-detection state (for tests).
    pub fn core(&self) -> &WatchCore {
        &self.core
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Main loop: tick, sleep, repeat until `shutdown` fires.
    ///
    /// Shutdown is only observed while sleeping, so a running build always
    /// finishes first. If the sender is dropped without firing, the loop just
    /// keeps going. On exit the backend is told to stop the app.
    pub async fn run(mut self, mut shutdown: oneshot::Receiver<()>) -> Result<()> {
        info!(
            root = ?self.config.root,
            interval = ?self.config.interval,
            "polywatch loop started"
        );

        let mut listening = true;
        loop {
            let outcome = self.tick().await;
            debug!(?outcome, "cycle finished");

            if !listening {
                tokio::time::sleep(self.config.interval).await;
                continue;
            }

            tokio::select! {
                _ = tokio::time::sleep(self.config.interval) => {}
                res = &mut shutdown => match res {
                    Ok(()) => {
                        info!("shutdown requested; stopping loop");
                        break;
                    }
                    Err(_) => {
                        debug!("shutdown sender dropped; polling until killed");
                        listening = false;
                        tokio::time::sleep(self.config.interval).await;
                    }
                },
            }
        }

        self.backend.shutdown().await;
        info!("polywatch loop exiting");
        Ok(())
    }

    /// One scan, and if the tree changed, the dependency step, build and
    /// restart.
    pub async fn tick(&mut self) -> CycleOutcome {
        let previous_dep_mtime = self.core.previous_dep_mtime();
        let scan = match scan_tree(Arc::clone(&self.fingerprinter), previous_dep_mtime).await {
            Some(scan) => scan,
            None => return CycleOutcome::ScanFailed,
        };

        match self.core.on_scan(&scan) {
            CyclePlan::Unchanged => CycleOutcome::Unchanged,
            CyclePlan::Rebuild { run_dependency } => {
                info!(files = scan.files, "change detected, rebuilding");
                self.rebuild(run_dependency).await
            }
        }
    }

    async fn rebuild(&mut self, run_dependency: bool) -> CycleOutcome {
        if run_dependency {
            if let Some(dep_command) = self.config.effective_dep_command() {
                info!(
                    dep_file = ?self.config.dep_file,
                    command = %dep_command,
                    "dependency file changed; running dependency command"
                );
                if let Err(e) = self.backend.run_step(CommandStep::Dependency, dep_command).await {
                    error!(error = %e, "dependency command failed");
                    return CycleOutcome::DependencyFailed;
                }
            }
        }

        info!("running build command");
        if let Err(e) = self
            .backend
            .run_step(CommandStep::Build, &self.config.build_command)
            .await
        {
            error!(error = %e, "build failed");
            return CycleOutcome::BuildFailed;
        }

        match self.backend.restart(&self.config.run_command).await {
            Ok(()) => CycleOutcome::Restarted,
            Err(e) => {
                warn!(error = %e, "app start failed");
                CycleOutcome::RestartFailed
            }
        }
    }
}

/// Run one scan on the blocking pool; failures are logged and reported as
/// `None`.
async fn scan_tree(
    fingerprinter: Arc<TreeFingerprinter>,
    previous_dep_mtime: Option<SystemTime>,
) -> Option<Fingerprint> {
    match tokio::task::spawn_blocking(move || fingerprinter.scan(previous_dep_mtime)).await {
        Ok(Ok(scan)) => Some(scan),
        Ok(Err(e)) => {
            error!(error = %e, "error scanning watched directory");
            None
        }
        Err(e) => {
            error!(error = %e, "scan task failed");
            None
        }
    }
}
