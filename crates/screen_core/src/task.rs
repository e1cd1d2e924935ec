use std::future::Future;

use tokio::task::JoinHandle;
use tracing::debug;

/// Handle to in-flight work. Cancelling more than once is a no-op.
#[derive(Debug)]
pub struct TaskHandle {
    join: JoinHandle<()>,
    cancelled: bool,
}

impl TaskHandle {
    pub fn spawn<F>(future: F) -> Self
    where
        F: Future<Output = ()> + Send + 'static,
    {
        Self::from(tokio::spawn(future))
    }

    pub fn cancel(&mut self) -> bool {
        if self.cancelled {
            return false;
        }
        self.cancelled = true;
        if self.join.is_finished() {
            return false;
        }
        self.join.abort();
        true
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    pub fn is_finished(&self) -> bool {
        self.join.is_finished()
    }

    pub fn is_active(&self) -> bool {
        !self.cancelled && !self.join.is_finished()
    }

    pub async fn wait(&mut self) {
        let _ = (&mut self.join).await;
    }
}

impl From<JoinHandle<()>> for TaskHandle {
    fn from(join: JoinHandle<()>) -> Self {
        Self {
            join,
            cancelled: false,
        }
    }
}

/// Unordered pool of handles. Every handle is cancelled exactly once, either
/// by [`TaskScope::cancel_all`] or when the scope is dropped.
#[derive(Debug, Default)]
pub struct TaskScope {
    handles: Vec<TaskHandle>,
}

impl TaskScope {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, handle: TaskHandle) {
        self.handles.push(handle);
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    pub fn active_count(&self) -> usize {
        self.handles.iter().filter(|h| h.is_active()).count()
    }

    pub async fn wait_all(&mut self) {
        for handle in &mut self.handles {
            handle.wait().await;
        }
    }

    /// Cancels and drains every handle; returns how many were still running.
    pub fn cancel_all(&mut self) -> usize {
        if self.handles.is_empty() {
            return 0;
        }
        let cancelled = self
            .handles
            .drain(..)
            .map(|mut handle| handle.cancel())
            .filter(|did_cancel| *did_cancel)
            .count();
        debug!(cancelled, "task scope drained");
        cancelled
    }
}

impl Drop for TaskScope {
    fn drop(&mut self) {
        self.cancel_all();
    }
}

impl Extend<TaskHandle> for TaskScope {
    fn extend<I: IntoIterator<Item = TaskHandle>>(&mut self, iter: I) {
        self.handles.extend(iter);
    }
}

#[cfg(test)]
#[path = "tests/task_tests.rs"]
mod tests;
