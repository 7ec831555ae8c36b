// src/watch/filter.rs

//! Projection stage between the watcher and the aggregator: keep only paths
//! that still exist as files and whose base name matches a pattern.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{Instrument, Span, trace};

use crate::fs::FileSystem;
use crate::watch::patterns::PatternSet;
use crate::watch::STAGE_CAPACITY;

/// Returns true if `path` should be forwarded downstream.
///
/// The target is re-checked at call time: a path deleted since its event
/// was raised, or one that names a directory, is dropped.
pub fn accepts(fs: &dyn FileSystem, patterns: &PatternSet, path: &Path) -> bool {
    if !fs.exists(path) || fs.is_dir(path) {
        return false;
    }
    patterns.matches_file_name(path)
}

/// Spawn the filter stage over `paths`.
///
/// The returned receiver closes when `paths` closes, or stops being fed
/// once the receiver itself is dropped.
pub fn spawn_filter(
    mut paths: mpsc::Receiver<PathBuf>,
    patterns: Arc<PatternSet>,
    fs: Arc<dyn FileSystem>,
    span: Span,
) -> mpsc::Receiver<PathBuf> {
    let (tx, rx) = mpsc::channel(STAGE_CAPACITY);

    tokio::spawn(
        async move {
            while let Some(path) = paths.recv().await {
                if !accepts(fs.as_ref(), &patterns, &path) {
                    trace!(?path, "dropped by filter");
                    continue;
                }
                if tx.send(path).await.is_err() {
                    break;
                }
            }
            trace!("filter stage finished");
        }
        .instrument(span),
    );

    rx
}
