use std::sync::{Arc, Mutex};
use std::time::Duration;

use rewatch::exec::{Lifecycle, LifecycleFuture};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleCall {
    Start,
    Terminate,
}

#[derive(Debug, Default)]
struct State {
    calls: Vec<LifecycleCall>,
    live: bool,
    overlaps: usize,
}

/// A fake lifecycle that:
/// - records every start / terminate call in order
/// - tracks whether a (pretend) process is live
/// - counts starts issued while a previous one was still live
#[derive(Debug, Clone, Default)]
pub struct RecordingLifecycle {
    state: Arc<Mutex<State>>,
}

impl RecordingLifecycle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<LifecycleCall> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn count(&self, call: LifecycleCall) -> usize {
        self.calls().iter().filter(|c| **c == call).count()
    }

    pub fn is_live(&self) -> bool {
        self.state.lock().unwrap().live
    }

    /// Number of starts that found a previous generation still live.
    pub fn overlaps(&self) -> usize {
        self.state.lock().unwrap().overlaps
    }
}

impl Lifecycle for RecordingLifecycle {
    fn start(&self, settle_delay: Duration) -> LifecycleFuture<'_> {
        let state = Arc::clone(&self.state);
        Box::pin(async move {
            tokio::time::sleep(settle_delay).await;
            let mut guard = state.lock().unwrap();
            if guard.live {
                guard.overlaps += 1;
            }
            guard.live = true;
            guard.calls.push(LifecycleCall::Start);
            Ok(())
        })
    }

    fn terminate(&self, _wait_budget: Duration) -> LifecycleFuture<'_> {
        let state = Arc::clone(&self.state);
        Box::pin(async move {
            let mut guard = state.lock().unwrap();
            guard.live = false;
            guard.calls.push(LifecycleCall::Terminate);
            Ok(())
        })
    }
}
