//! Task scope
//!
//! One-shot delayed tasks owned by a surface. Dropping the scope, or calling
//! `cancel_all`, aborts everything still pending.

use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::debug;

/// Owner of delayed tasks. Must be used inside a tokio runtime.
#[derive(Debug, Default)]
pub struct TaskScope {
    handles: Vec<JoinHandle<()>>,
}

impl TaskScope {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `task` once after `delay`, unless cancelled first
    pub fn spawn_after<F>(&mut self, delay: Duration, task: F)
    where
        F: FnOnce() + Send + 'static,
    {
        self.handles.retain(|h| !h.is_finished());
        self.handles.push(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            task();
        }));
    }

    /// Number of tasks that have not run yet
    pub fn pending(&self) -> usize {
        self.handles.iter().filter(|h| !h.is_finished()).count()
    }

    /// Abort every pending task
    pub fn cancel_all(&mut self) {
        let pending = self.pending();
        for handle in self.handles.drain(..) {
            handle.abort();
        }
        if pending > 0 {
            debug!(pending, "Cancelled scheduled tasks");
        }
    }
}

impl Drop for TaskScope {
    fn drop(&mut self) {
        self.cancel_all();
    }
}
