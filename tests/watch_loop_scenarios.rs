// tests/watch_loop_scenarios.rs

mod common;
use crate::common::{init_tracing, set_mtime, with_timeout, write_file};

use std::error::Error;
use std::fs;

use tempfile::TempDir;
use tokio::sync::oneshot;
use tokio::time::{sleep, Duration};

use polywatch::engine::{CycleOutcome, WatchLoop, SENTINEL_FINGERPRINT};
use polywatch_test_utils::builders::WatcherConfigBuilder;
use polywatch_test_utils::fake_backend::{FakeBackend, Invocation};

type TestResult = Result<(), Box<dyn Error>>;

fn build(cmd: &str) -> Invocation {
    Invocation::Build(cmd.to_string())
}

fn restart(cmd: &str) -> Invocation {
    Invocation::Restart(cmd.to_string())
}

fn dependency(cmd: &str) -> Invocation {
    Invocation::Dependency(cmd.to_string())
}

/// Fresh empty directory: the first tick moves away from the sentinel and
/// builds + restarts once even though there are no files.
#[tokio::test]
async fn empty_directory_builds_once_on_first_tick() -> TestResult {
    init_tracing();
    let dir = TempDir::new()?;
    let backend = FakeBackend::new();
    let cfg = WatcherConfigBuilder::new(dir.path())
        .build_command("make")
        .run_command("./app")
        .build();
    let mut watch_loop = WatchLoop::new(cfg, backend.clone());

    assert_eq!(watch_loop.core().previous_fingerprint(), SENTINEL_FINGERPRINT);
    assert_eq!(watch_loop.tick().await, CycleOutcome::Restarted);
    assert_ne!(watch_loop.core().previous_fingerprint(), SENTINEL_FINGERPRINT);
    assert_eq!(backend.invocations(), vec![build("make"), restart("./app")]);

    assert_eq!(watch_loop.tick().await, CycleOutcome::Unchanged);
    assert_eq!(backend.invocations().len(), 2, "no further work on an unchanged tree");
    Ok(())
}

/// Adding an included file triggers exactly one build and restart.
#[tokio::test]
async fn included_file_triggers_rebuild_and_restart() -> TestResult {
    init_tracing();
    let dir = TempDir::new()?;
    let backend = FakeBackend::new();
    let cfg = WatcherConfigBuilder::new(dir.path())
        .include(".go")
        .build_command("go build")
        .run_command("./app")
        .build();
    let mut watch_loop = WatchLoop::new(cfg, backend.clone());

    watch_loop.tick().await;
    backend.clear();

    write_file(&dir.path().join("app.go"), "package main", 100);
    assert_eq!(watch_loop.tick().await, CycleOutcome::Restarted);
    assert_eq!(watch_loop.tick().await, CycleOutcome::Unchanged);
    assert_eq!(backend.invocations(), vec![build("go build"), restart("./app")]);
    Ok(())
}

/// Adding an excluded file does nothing.
#[tokio::test]
async fn excluded_file_is_ignored() -> TestResult {
    init_tracing();
    let dir = TempDir::new()?;
    let backend = FakeBackend::new();
    let cfg = WatcherConfigBuilder::new(dir.path()).exclude(".log").build();
    let mut watch_loop = WatchLoop::new(cfg, backend.clone());

    watch_loop.tick().await;
    backend.clear();

    write_file(&dir.path().join("temp.log"), "noise", 100);
    assert_eq!(watch_loop.tick().await, CycleOutcome::Unchanged);
    assert!(backend.invocations().is_empty());
    Ok(())
}

/// Touching the dependency file runs the dependency command before the
/// build, exactly once.
#[tokio::test]
async fn dependency_change_runs_dep_command_before_build() -> TestResult {
    init_tracing();
    let dir = TempDir::new()?;
    let go_mod = dir.path().join("go.mod");
    write_file(&go_mod, "module example", 100);
    write_file(&dir.path().join("main.go"), "package main", 100);

    let backend = FakeBackend::new();
    let cfg = WatcherConfigBuilder::new(dir.path())
        .dep_file("go.mod")
        .dep_command("go mod tidy")
        .build_command("go build")
        .run_command("./app")
        .build();
    let mut watch_loop = WatchLoop::new(cfg, backend.clone());

    // Cold start: the dependency file is seen for the first time.
    assert_eq!(watch_loop.tick().await, CycleOutcome::Restarted);
    assert_eq!(
        backend.invocations(),
        vec![dependency("go mod tidy"), build("go build"), restart("./app")]
    );
    backend.clear();

    // A source change alone does not refresh dependencies.
    set_mtime(&dir.path().join("main.go"), 150);
    watch_loop.tick().await;
    assert_eq!(backend.invocations(), vec![build("go build"), restart("./app")]);
    backend.clear();

    set_mtime(&go_mod, 200);
    assert_eq!(watch_loop.tick().await, CycleOutcome::Restarted);
    assert_eq!(watch_loop.tick().await, CycleOutcome::Unchanged);
    assert_eq!(
        backend.invocations(),
        vec![dependency("go mod tidy"), build("go build"), restart("./app")]
    );
    Ok(())
}

/// A failing dependency command aborts the cycle before the build.
#[tokio::test]
async fn failed_dependency_step_skips_build() -> TestResult {
    init_tracing();
    let dir = TempDir::new()?;
    write_file(&dir.path().join("package.json"), "{}", 100);

    let backend = FakeBackend::new();
    backend.fail_command("npm install");
    let cfg = WatcherConfigBuilder::new(dir.path())
        .dep_file("package.json")
        .dep_command("npm install")
        .build_command("npm run build")
        .build();
    let mut watch_loop = WatchLoop::new(cfg, backend.clone());

    assert_eq!(watch_loop.tick().await, CycleOutcome::DependencyFailed);
    assert_eq!(backend.invocations(), vec![dependency("npm install")]);
    Ok(())
}

/// A failed build never restarts the app and is not retried on an identical
/// tree.
#[tokio::test]
async fn failed_build_is_not_retried_until_next_change() -> TestResult {
    init_tracing();
    let dir = TempDir::new()?;
    write_file(&dir.path().join("main.go"), "package main", 100);

    let backend = FakeBackend::new();
    backend.fail_command("go build");
    let cfg = WatcherConfigBuilder::new(dir.path())
        .build_command("go build")
        .run_command("./app")
        .build();
    let mut watch_loop = WatchLoop::new(cfg, backend.clone());

    assert_eq!(watch_loop.tick().await, CycleOutcome::BuildFailed);
    let fingerprint_after_failure = watch_loop.core().previous_fingerprint();
    assert_ne!(fingerprint_after_failure, SENTINEL_FINGERPRINT);

    // Same tree, build would now succeed, but nothing is retried.
    backend.succeed_command("go build");
    assert_eq!(watch_loop.tick().await, CycleOutcome::Unchanged);
    assert_eq!(watch_loop.core().previous_fingerprint(), fingerprint_after_failure);
    assert_eq!(backend.invocations(), vec![build("go build")]);

    // The next real change builds and restarts.
    write_file(&dir.path().join("main.go"), "package main // fixed", 200);
    assert_eq!(watch_loop.tick().await, CycleOutcome::Restarted);
    assert_eq!(
        backend.invocations(),
        vec![build("go build"), build("go build"), restart("./app")]
    );
    Ok(())
}

#[tokio::test]
async fn restart_failure_keeps_the_loop_going() -> TestResult {
    init_tracing();
    let dir = TempDir::new()?;
    let backend = FakeBackend::new();
    backend.fail_command("./app");
    let cfg = WatcherConfigBuilder::new(dir.path()).run_command("./app").build();
    let mut watch_loop = WatchLoop::new(cfg, backend.clone());

    assert_eq!(watch_loop.tick().await, CycleOutcome::RestartFailed);
    assert_eq!(watch_loop.tick().await, CycleOutcome::Unchanged);
    Ok(())
}

#[tokio::test]
async fn scan_failure_leaves_state_untouched() -> TestResult {
    init_tracing();
    let dir = TempDir::new()?;
    let root = dir.path().join("project");
    let backend = FakeBackend::new();
    let cfg = WatcherConfigBuilder::new(&root).build();
    let mut watch_loop = WatchLoop::new(cfg, backend.clone());

    assert_eq!(watch_loop.tick().await, CycleOutcome::ScanFailed);
    assert_eq!(watch_loop.core().previous_fingerprint(), SENTINEL_FINGERPRINT);
    assert!(backend.invocations().is_empty());

    // Once the root shows up, the loop recovers on its own.
    fs::create_dir(&root)?;
    assert_eq!(watch_loop.tick().await, CycleOutcome::Restarted);
    Ok(())
}

#[tokio::test]
async fn run_polls_until_shutdown_then_stops_backend() -> TestResult {
    init_tracing();
    let dir = TempDir::new()?;
    let backend = FakeBackend::new();
    let cfg = WatcherConfigBuilder::new(dir.path())
        .interval(Duration::from_millis(10))
        .run_command("./app")
        .build();
    let watch_loop = WatchLoop::new(cfg, backend.clone());

    let (shutdown_tx, shutdown_rx) = oneshot::channel();
    let handle = tokio::spawn(watch_loop.run(shutdown_rx));

    with_timeout(async {
        while !backend.invocations().contains(&restart("./app")) {
            sleep(Duration::from_millis(5)).await;
        }
    })
    .await;

    // A later change is picked up by the running loop.
    write_file(&dir.path().join("main.go"), "package main", 100);
    with_timeout(async {
        while backend
            .invocations()
            .iter()
            .filter(|i| **i == restart("./app"))
            .count()
            < 2
        {
            sleep(Duration::from_millis(5)).await;
        }
    })
    .await;

    shutdown_tx.send(()).expect("loop should still be listening");
    with_timeout(handle).await??;

    assert_eq!(backend.invocations().last(), Some(&Invocation::Shutdown));
    Ok(())
}
