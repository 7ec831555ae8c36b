#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::time::Duration;

use tempfile::TempDir;
use tokio::sync::mpsc;
use tokio::time::timeout;

pub use rewatch_test_utils::builders;
pub use rewatch_test_utils::{init_tracing, wait_until, with_timeout};

/// A temp directory plus its canonical path (event paths are canonical).
pub fn project_dir() -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().expect("create temp dir");
    let root = dir.path().canonicalize().expect("canonicalize temp dir");
    (dir, root)
}

/// Receive from `rx` until `expected` shows up. Fails after five seconds.
pub async fn recv_until(rx: &mut mpsc::Receiver<PathBuf>, expected: &Path) -> bool {
    let found = timeout(Duration::from_secs(5), async {
        while let Some(path) = rx.recv().await {
            if path == expected {
                return true;
            }
        }
        false
    })
    .await;
    matches!(found, Ok(true))
}

/// Give the OS watcher a moment to deliver pending events.
pub async fn settle() {
    tokio::time::sleep(Duration::from_millis(300)).await;
}
