// tests/runner_cycles.rs

mod common;
use crate::common::{init_tracing, project_dir, settle, wait_until, with_timeout};

use std::error::Error;
use std::sync::Arc;
use std::time::Duration;

use rewatch::engine::{Runner, RunnerOptions};
use rewatch::errors::RewatchError;
use rewatch::exec::NullLifecycle;
use rewatch::watch::PatternSet;
use rewatch_test_utils::{LifecycleCall, RecordingLifecycle};

use LifecycleCall::{Start, Terminate};

type TestResult = Result<(), Box<dyn Error>>;

fn options() -> RunnerOptions {
    RunnerOptions {
        settle_delay: Duration::from_millis(10),
        quiet_window: Duration::from_millis(200),
        terminate_wait: Duration::from_secs(1),
    }
}

fn runner(root: &std::path::Path, patterns: &[&str], lifecycle: &RecordingLifecycle) -> Arc<Runner> {
    let patterns = PatternSet::new(patterns.iter().copied()).expect("valid patterns");
    Arc::new(Runner::new(
        root,
        Arc::new(patterns),
        Arc::new(lifecycle.clone()),
        options(),
    ))
}

#[tokio::test]
async fn change_batch_restarts_the_command() -> TestResult {
    init_tracing();
    let (_guard, root) = project_dir();
    let recorder = RecordingLifecycle::new();
    let runner = runner(&root, &["*.txt"], &recorder);

    let task = tokio::spawn({
        let runner = Arc::clone(&runner);
        async move { runner.run().await }
    });

    assert!(wait_until(Duration::from_secs(5), || recorder.count(Start) == 1).await);
    settle().await;

    std::fs::write(root.join("a.txt"), "a")?;
    std::fs::write(root.join("b.txt"), "b")?;
    assert!(
        wait_until(Duration::from_secs(5), || recorder.count(Start) == 2).await,
        "no restart after change: {:?}",
        recorder.calls()
    );
    assert_eq!(recorder.calls(), vec![Start, Terminate, Start]);

    runner.exit().await?;
    with_timeout(task).await??;

    assert_eq!(recorder.calls(), vec![Start, Terminate, Start, Terminate]);
    assert_eq!(recorder.overlaps(), 0);
    assert!(!recorder.is_live());
    Ok(())
}

#[tokio::test]
async fn unmatched_change_leaves_the_command_alone() -> TestResult {
    init_tracing();
    let (_guard, root) = project_dir();
    let recorder = RecordingLifecycle::new();
    let runner = runner(&root, &["*.go"], &recorder);

    let task = tokio::spawn({
        let runner = Arc::clone(&runner);
        async move { runner.run().await }
    });

    assert!(wait_until(Duration::from_secs(5), || recorder.count(Start) == 1).await);
    settle().await;

    std::fs::write(root.join("notes.md"), "# todo")?;
    tokio::time::sleep(Duration::from_millis(800)).await;
    assert_eq!(recorder.calls(), vec![Start]);

    runner.exit().await?;
    with_timeout(task).await??;
    Ok(())
}

#[tokio::test]
async fn nothing_starts_after_exit() -> TestResult {
    init_tracing();
    let (_guard, root) = project_dir();
    let recorder = RecordingLifecycle::new();
    let runner = runner(&root, &["*"], &recorder);

    let task = tokio::spawn({
        let runner = Arc::clone(&runner);
        async move { runner.run().await }
    });
    assert!(wait_until(Duration::from_secs(5), || recorder.count(Start) == 1).await);
    settle().await;

    // Exit while changes are still streaming in.
    std::fs::write(root.join("late.txt"), "x")?;
    runner.exit().await?;
    std::fs::write(root.join("later.txt"), "y")?;
    with_timeout(task).await??;
    assert!(runner.is_exiting());

    let after_exit = recorder.calls();
    tokio::time::sleep(Duration::from_millis(500)).await;
    assert_eq!(recorder.calls(), after_exit);
    assert_eq!(after_exit.last(), Some(&Terminate));
    assert!(!recorder.is_live());
    assert_eq!(recorder.overlaps(), 0);
    Ok(())
}

#[tokio::test]
async fn exit_before_run_never_starts_the_command() -> TestResult {
    init_tracing();
    let (_guard, root) = project_dir();
    let recorder = RecordingLifecycle::new();
    let runner = runner(&root, &["*"], &recorder);

    runner.exit().await?;
    with_timeout(runner.run()).await?;

    assert_eq!(recorder.count(Start), 0);
    assert_eq!(recorder.count(Terminate), 1);
    Ok(())
}

#[tokio::test]
async fn missing_root_fails_the_run() {
    init_tracing();
    let recorder = RecordingLifecycle::new();
    let runner = runner(
        std::path::Path::new("/no/such/dir/for/rewatch"),
        &["*"],
        &recorder,
    );

    let res = with_timeout(runner.run()).await;
    assert!(
        matches!(res, Err(RewatchError::WatchRoot { .. })),
        "got {res:?}"
    );
    assert!(recorder.calls().is_empty());
}

#[tokio::test]
async fn null_lifecycle_keeps_watching() -> TestResult {
    init_tracing();
    let (_guard, root) = project_dir();
    let runner = Arc::new(Runner::new(
        root.clone(),
        Arc::new(PatternSet::new(["*"])?),
        Arc::new(NullLifecycle),
        options(),
    ));

    let task = tokio::spawn({
        let runner = Arc::clone(&runner);
        async move { runner.run().await }
    });
    settle().await;
    std::fs::write(root.join("x.txt"), "x")?;
    settle().await;
    assert!(!task.is_finished());

    runner.exit().await?;
    with_timeout(task).await??;
    Ok(())
}
