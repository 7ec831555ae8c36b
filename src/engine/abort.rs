// src/engine/abort.rs

//! One-shot shutdown request shared by the runner and the watcher.

use std::sync::Arc;

use tokio::sync::watch;

/// Fires once; every [`AbortListener`] then observes it, including
/// listeners subscribed afterwards.
#[derive(Debug, Clone)]
pub struct AbortSignal {
    tx: Arc<watch::Sender<bool>>,
}

impl Default for AbortSignal {
    fn default() -> Self {
        Self::new()
    }
}

impl AbortSignal {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self { tx: Arc::new(tx) }
    }

    /// Request shutdown. Later calls do nothing.
    pub fn fire(&self) {
        self.tx.send_replace(true);
    }

    pub fn is_fired(&self) -> bool {
        *self.tx.borrow()
    }

    pub fn subscribe(&self) -> AbortListener {
        AbortListener {
            rx: self.tx.subscribe(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AbortListener {
    rx: watch::Receiver<bool>,
}

impl AbortListener {
    /// Resolves once the signal has fired (immediately if it already has).
    ///
    /// Also resolves if the [`AbortSignal`] is dropped, since nobody is left
    /// to keep the pipeline alive.
    pub async fn fired(&mut self) {
        let _ = self.rx.wait_for(|fired| *fired).await;
    }

    pub fn is_fired(&self) -> bool {
        *self.rx.borrow()
    }
}
