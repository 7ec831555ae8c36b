// src/watch/aggregate.rs

//! Debouncing: coalesce a burst of changed paths into one [`ChangeBatch`].

use std::collections::BTreeSet;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::timeout;
use tracing::{Instrument, Span, debug};

/// Sorted, de-duplicated set of files that changed together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeBatch {
    files: Vec<PathBuf>,
}

impl ChangeBatch {
    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn into_files(self) -> Vec<PathBuf> {
        self.files
    }
}

impl From<BTreeSet<PathBuf>> for ChangeBatch {
    fn from(set: BTreeSet<PathBuf>) -> Self {
        Self {
            files: set.into_iter().collect(),
        }
    }
}

impl fmt::Display for ChangeBatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, file) in self.files.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", file.display())?;
        }
        Ok(())
    }
}

/// Collect `first` plus everything that arrives on `changes` until
/// `quiet_window` passes without a new path.
///
/// Each arrival restarts the window, so a steady stream of edits keeps the
/// batch open. The batch also ends if `changes` closes.
pub async fn gather(
    first: PathBuf,
    changes: &mut mpsc::Receiver<PathBuf>,
    quiet_window: Duration,
) -> ChangeBatch {
    let mut files = BTreeSet::new();
    files.insert(first);

    loop {
        match timeout(quiet_window, changes.recv()).await {
            Ok(Some(path)) => {
                files.insert(path);
            }
            Ok(None) | Err(_) => break,
        }
    }

    ChangeBatch::from(files)
}

/// Spawn the aggregator stage: one [`ChangeBatch`] per burst on `changes`.
pub fn spawn_aggregator(
    mut changes: mpsc::Receiver<PathBuf>,
    quiet_window: Duration,
    span: Span,
) -> mpsc::Receiver<ChangeBatch> {
    // Batches are consumed one restart at a time; no point queueing more.
    let (tx, rx) = mpsc::channel(1);

    tokio::spawn(
        async move {
            while let Some(first) = changes.recv().await {
                let batch = gather(first, &mut changes, quiet_window).await;
                debug!(files = batch.len(), "change batch ready");
                if tx.send(batch).await.is_err() {
                    break;
                }
            }
            debug!("aggregator stage finished");
        }
        .instrument(span),
    );

    rx
}
