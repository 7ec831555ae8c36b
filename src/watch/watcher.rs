// src/watch/watcher.rs

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use notify::event::{AccessKind, AccessMode, ModifyKind};
use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{Instrument, Span, debug, info, trace};

use crate::engine::AbortListener;
use crate::errors::{Result, RewatchError};
use crate::fs::FileSystem;
use crate::watch::STAGE_CAPACITY;
use crate::watch::walk::list_directories;

/// Handle for the watcher's event loop.
///
/// The loop owns the OS watcher; it releases every registration and closes
/// its output when the abort signal fires. [`WatcherHandle::join`] reports
/// how it ended.
pub struct WatcherHandle {
    task: JoinHandle<Result<()>>,
}

impl std::fmt::Debug for WatcherHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WatcherHandle").finish()
    }
}

impl WatcherHandle {
    /// Wait for the event loop to finish.
    pub async fn join(self) -> Result<()> {
        match self.task.await {
            Ok(res) => res,
            Err(err) => Err(RewatchError::Other(
                anyhow::Error::new(err).context("watcher task failed"),
            )),
        }
    }
}

/// Start watching `root` and return the stream of changed paths.
///
/// - If `root` is a directory, it and every directory below it are
///   registered. Directories created or moved in later are registered as
///   they appear, and the files already inside them are reported. Every
///   notified path (files and directories) is forwarded.
/// - If `root` is a single file, that path is produced once; the stream then
///   stays open, without live watching, until `abort` fires.
///
/// Fails if `root` doesn't exist, if the notification backend can't be
/// created, or if any directory can't be registered.
pub fn spawn_watcher(
    root: &Path,
    fs: Arc<dyn FileSystem>,
    mut abort: AbortListener,
    span: Span,
) -> Result<(WatcherHandle, mpsc::Receiver<PathBuf>)> {
    if !fs.exists(root) {
        return Err(RewatchError::WatchRoot {
            path: root.to_path_buf(),
            reason: "no such file or directory".to_string(),
        });
    }
    let root = fs.canonicalize(root).unwrap_or_else(|_| root.to_path_buf());
    let (out_tx, out_rx) = mpsc::channel(STAGE_CAPACITY);

    if !fs.is_dir(&root) {
        let task = tokio::spawn(
            async move {
                info!(path = ?root, "watching a single file");
                let sent = tokio::select! {
                    _ = abort.fired() => false,
                    res = out_tx.send(root) => res.is_ok(),
                };
                if sent {
                    abort.fired().await;
                }
                Ok(())
            }
            .instrument(span),
        );
        return Ok((WatcherHandle { task }, out_rx));
    }

    // notify calls us on its own thread; hop into the async world.
    let (event_tx, event_rx) = mpsc::unbounded_channel::<notify::Result<Event>>();
    let watcher = RecommendedWatcher::new(
        move |res: notify::Result<Event>| {
            // Only fails once the event loop is gone, i.e. during shutdown.
            let _ = event_tx.send(res);
        },
        Config::default(),
    )
    .map_err(RewatchError::WatchInit)?;

    let mut watch_set = WatchSet::new(watcher, Arc::clone(&fs));
    let dirs = list_directories(fs.as_ref(), &root).map_err(|e| RewatchError::WatchRoot {
        path: root.clone(),
        reason: format!("{e:#}"),
    })?;
    for dir in dirs {
        watch_set.add(&dir)?;
    }

    let task = tokio::spawn(
        async move {
            info!(root = ?root, directories = watch_set.len(), "start watching");
            event_loop(watch_set, event_rx, out_tx, abort).await
        }
        .instrument(span),
    );

    Ok((WatcherHandle { task }, out_rx))
}

/// The directories currently registered with the OS watcher.
///
/// Only the event loop touches this, so it needs no locking. Removed
/// directories are forgotten as their events arrive; the remaining
/// registrations are dropped all at once in [`WatchSet::release`].
struct WatchSet {
    watcher: RecommendedWatcher,
    dirs: BTreeSet<PathBuf>,
    fs: Arc<dyn FileSystem>,
}

impl WatchSet {
    fn new(watcher: RecommendedWatcher, fs: Arc<dyn FileSystem>) -> Self {
        Self {
            watcher,
            dirs: BTreeSet::new(),
            fs,
        }
    }

    fn len(&self) -> usize {
        self.dirs.len()
    }

    /// Register `dir` unless it already is. Used for the startup walk.
    fn add(&mut self, dir: &Path) -> Result<()> {
        if self.dirs.contains(dir) {
            return Ok(());
        }
        self.register(dir)
    }

    /// Register `dir` with the OS watcher, even if it was registered before.
    ///
    /// A directory that was deleted and created again under the same path
    /// lost its OS watch along with the old inode.
    fn register(&mut self, dir: &Path) -> Result<()> {
        self.watcher
            .watch(dir, RecursiveMode::NonRecursive)
            .map_err(|source| RewatchError::WatchRegistration {
                path: dir.to_path_buf(),
                source,
            })?;
        debug!(?dir, "registered directory");
        self.dirs.insert(dir.to_path_buf());
        Ok(())
    }

    /// Drop bookkeeping for a removed path and everything below it.
    fn forget(&mut self, path: &Path) {
        self.dirs.retain(|dir| !dir.starts_with(path));
    }

    /// Register a directory that appeared after startup, with its subtree,
    /// and return the files already inside it.
    ///
    /// Each directory is registered before it is listed, so an entry created
    /// in it afterwards raises its own event and one created before shows up
    /// in the listing. Entries that are gone again by the time we get to
    /// them are skipped.
    fn add_created(&mut self, dir: &Path) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        let mut pending = vec![dir.to_path_buf()];

        while let Some(next) = pending.pop() {
            match self.register(&next) {
                Ok(()) => {}
                Err(_) if !self.fs.exists(&next) => {
                    debug!(dir = ?next, "new directory vanished before it could be watched");
                    continue;
                }
                Err(err) => return Err(err),
            }

            let entries = match self.fs.read_dir(&next) {
                Ok(entries) => entries,
                Err(_) if !self.fs.exists(&next) => continue,
                Err(err) => {
                    return Err(RewatchError::Other(
                        err.context(format!("enumerating new directory {next:?}")),
                    ));
                }
            };

            for entry in entries {
                if !self.fs.is_dir(&entry) {
                    files.push(entry);
                } else if !self.fs.is_symlink(&entry) {
                    pending.push(entry);
                }
            }
        }
        Ok(files)
    }

    fn release(mut self) -> Result<()> {
        for dir in &self.dirs {
            // The OS drops watches on deleted directories by itself.
            if !self.fs.exists(dir) {
                continue;
            }
            if let Err(source) = self.watcher.unwatch(dir) {
                if matches!(source.kind, notify::ErrorKind::WatchNotFound) {
                    continue;
                }
                return Err(RewatchError::WatchRelease {
                    path: dir.clone(),
                    source,
                });
            }
        }
        debug!(directories = self.dirs.len(), "released watch registrations");
        Ok(())
    }
}

async fn event_loop(
    mut watch_set: WatchSet,
    mut events: mpsc::UnboundedReceiver<notify::Result<Event>>,
    out: mpsc::Sender<PathBuf>,
    mut abort: AbortListener,
) -> Result<()> {
    'events: loop {
        let event = tokio::select! {
            biased;
            _ = abort.fired() => break 'events,
            msg = events.recv() => match msg {
                Some(Ok(event)) => event,
                Some(Err(err)) => return Err(RewatchError::WatchEvent(err)),
                None => break 'events,
            },
        };

        if !is_change(&event.kind) {
            trace!(?event, "ignoring access event");
            continue;
        }

        let mut found = Vec::new();
        if adds_paths(&event.kind) {
            for path in &event.paths {
                if watch_set.fs.is_dir(path) && !watch_set.fs.is_symlink(path) {
                    found.extend(watch_set.add_created(path)?);
                }
            }
        }
        if matches!(event.kind, EventKind::Remove(_)) {
            for path in &event.paths {
                watch_set.forget(path);
            }
        }

        for path in event.paths.into_iter().chain(found) {
            trace!(?path, "forwarding change");
            let delivered = tokio::select! {
                biased;
                _ = abort.fired() => false,
                res = out.send(path) => res.is_ok(),
            };
            if !delivered {
                break 'events;
            }
        }
    }

    watch_set.release()?;
    info!("stopped watching");
    Ok(())
}

/// Creations and renames into the tree can bring in a new directory.
fn adds_paths(kind: &EventKind) -> bool {
    matches!(
        kind,
        EventKind::Create(_) | EventKind::Modify(ModifyKind::Name(_))
    )
}

/// Opening or reading a file is not a change; closing it after writing is.
fn is_change(kind: &EventKind) -> bool {
    match kind {
        EventKind::Access(AccessKind::Close(AccessMode::Write)) => true,
        EventKind::Access(_) => false,
        _ => true,
    }
}
