// src/lib.rs

pub mod cli;
pub mod config;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod logging;
pub mod watch;

use anyhow::Result;
use tokio::sync::oneshot;
use tracing::{debug, info};

use crate::cli::CliArgs;
use crate::config::{resolve, WatcherConfig};
use crate::engine::WatchLoop;
use crate::exec::{ProcessSupervisor, RealCommandBackend};

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config resolution (CLI flags over config file over defaults)
/// - the process supervisor and command backend
/// - the polling loop
/// - Ctrl-C handling
pub async fn run(args: CliArgs) -> Result<()> {
    let cfg = resolve(&args)?;

    if args.dry_run {
        print_dry_run(&cfg);
        return Ok(());
    }

    print_banner();

    let backend = RealCommandBackend::new(ProcessSupervisor::new());
    let watch_loop = WatchLoop::new(cfg, backend);

    // Ctrl-C → stop polling and kill the app.
    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            eprintln!("failed to listen for Ctrl+C: {e}");
            return;
        }
        let _ = shutdown_tx.send(());
    });

    info!("starting polywatch");
    watch_loop.run(shutdown_rx).await?;
    Ok(())
}

fn print_banner() {
    println!("polywatch: change it, build it, run it, repeat.");
    println!("Example:");
    println!(
        "  polywatch --root=./myapp --depfile=go.mod --depcommand=\"go mod tidy\" \
         --build=\"go build -o myapp .\" --run=\"./myapp\" --include=.go --exclude=.git,tmp"
    );
    println!();
}

/// Simple dry-run output: print the resolved configuration.
fn print_dry_run(cfg: &WatcherConfig) {
    println!("polywatch dry-run");
    println!("  root: {}", cfg.root.display());
    println!("  interval: {:?}", cfg.interval);
    println!("  build: {}", cfg.build_command);
    println!("  run: {}", cfg.run_command);
    if let Some(ref dep_file) = cfg.dep_file {
        println!("  dep_file: {}", dep_file.display());
    }
    if let Some(dep_command) = cfg.effective_dep_command() {
        println!("  dep_command: {dep_command}");
    }
    if !cfg.include.is_empty() {
        println!("  include: {:?}", cfg.include);
    }
    if !cfg.exclude.is_empty() {
        println!("  exclude: {:?}", cfg.exclude);
    }

    debug!("dry-run complete (no execution)");
}
