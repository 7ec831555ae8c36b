// src/watch/pipeline.rs

//! Wires the three stages together:
//! watcher -> filter -> aggregator -> [`ChangeBatch`]es.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use tracing::{Span, info_span};

use crate::engine::AbortListener;
use crate::errors::Result;
use crate::fs::FileSystem;
use crate::watch::aggregate::{ChangeBatch, spawn_aggregator};
use crate::watch::filter::spawn_filter;
use crate::watch::patterns::PatternSet;
use crate::watch::watcher::{WatcherHandle, spawn_watcher};

/// A running change pipeline.
///
/// The batch stream ends after `abort` fires and the watcher has drained.
#[derive(Debug)]
pub struct ChangePipeline {
    watcher: WatcherHandle,
    batches: tokio::sync::mpsc::Receiver<ChangeBatch>,
}

impl ChangePipeline {
    pub fn spawn(
        root: &Path,
        patterns: Arc<PatternSet>,
        fs: Arc<dyn FileSystem>,
        abort: AbortListener,
        quiet_window: Duration,
        span: &Span,
    ) -> Result<Self> {
        let (watcher, changed) =
            spawn_watcher(root, Arc::clone(&fs), abort, info_span!(parent: span, "watcher"))?;
        let matched = spawn_filter(changed, patterns, fs, info_span!(parent: span, "filter"));
        let batches = spawn_aggregator(matched, quiet_window, info_span!(parent: span, "gather"));
        Ok(Self { watcher, batches })
    }

    /// Next coalesced batch, or `None` once the pipeline has shut down.
    pub async fn next_batch(&mut self) -> Option<ChangeBatch> {
        self.batches.recv().await
    }

    /// Stop consuming and wait for the watcher to finish.
    ///
    /// Dropping our end first unblocks any stage stuck on a full channel.
    /// Returns the watcher's error if it stopped for a fatal reason.
    pub async fn shutdown(self) -> Result<()> {
        drop(self.batches);
        self.watcher.join().await
    }
}
