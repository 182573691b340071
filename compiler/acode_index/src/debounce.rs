use std::future::Future;
use std::time::Duration;

use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use tokio::task::JoinHandle;

/// One pending-task slot per document id.
///
/// Scheduling a task for an id aborts whatever was pending for that id,
/// so a burst of edits runs the work once, after the last edit — and
/// nothing is ever published for superseded content.
#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    pending: Mutex<FxHashMap<String, JoinHandle<()>>>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Debouncer {
            delay,
            pending: Mutex::new(FxHashMap::default()),
        }
    }

    /// Run `task` after the delay, unless superseded first. Must be
    /// called from within a tokio runtime.
    pub fn schedule<F>(&self, id: &str, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let delay = self.delay;
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            task.await;
        });
        if let Some(old) = self.pending.lock().insert(id.to_string(), handle) {
            old.abort();
        }
    }

    /// Abort anything pending for `id` (document closed or deleted).
    pub fn cancel(&self, id: &str) {
        if let Some(handle) = self.pending.lock().remove(id) {
            handle.abort();
        }
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        for (_, handle) in self.pending.lock().drain() {
            handle.abort();
        }
    }
}
