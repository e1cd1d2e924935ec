use std::{
    sync::{Arc, Mutex, MutexGuard, PoisonError},
    time::Duration,
};

use shared::log::{LogLevel, LogLine};
use tokio::{sync::Notify, time::Instant};

/// Fire-and-forget log surface of a screen. Called from pipeline tasks, so
/// implementations must be thread safe.
pub trait LogView: Send + Sync {
    fn log_normal(&self, text: &str);
    fn log_success(&self, text: &str);
    fn log_error(&self, text: &str);
    fn clear_log(&self);
}

impl<T: LogView + ?Sized> LogView for Arc<T> {
    fn log_normal(&self, text: &str) {
        (**self).log_normal(text)
    }

    fn log_success(&self, text: &str) {
        (**self).log_success(text)
    }

    fn log_error(&self, text: &str) {
        (**self).log_error(text)
    }

    fn clear_log(&self) {
        (**self).clear_log()
    }
}

#[derive(Default)]
pub struct RecordingLogView {
    lines: Mutex<Vec<LogLine>>,
    clears: Mutex<usize>,
    changed: Notify,
}

impl RecordingLogView {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    fn guard(&self) -> MutexGuard<'_, Vec<LogLine>> {
        self.lines.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn push(&self, level: LogLevel, text: &str) {
        self.guard().push(LogLine::new(level, text));
        self.changed.notify_waiters();
    }

    pub fn lines(&self) -> Vec<LogLine> {
        self.guard().clone()
    }

    pub fn entries(&self) -> Vec<(LogLevel, String)> {
        self.guard()
            .iter()
            .map(|line| (line.level, line.text.clone()))
            .collect()
    }

    pub fn texts(&self) -> Vec<String> {
        self.guard().iter().map(|line| line.text.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.guard().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear_count(&self) -> usize {
        *self.clears.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub async fn wait_until<F>(&self, limit: Duration, predicate: F) -> bool
    where
        F: Fn(&[LogLine]) -> bool,
    {
        let deadline = Instant::now() + limit;
        loop {
            let notified = self.changed.notified();
            if predicate(&self.guard()) {
                return true;
            }
            if tokio::time::timeout_at(deadline, notified).await.is_err() {
                return predicate(&self.guard());
            }
        }
    }

    pub async fn wait_for_len(&self, len: usize, limit: Duration) -> bool {
        self.wait_until(limit, |lines| lines.len() >= len).await
    }

    /// Waits for a success or error line, i.e. a finished pipeline.
    pub async fn wait_for_terminal(&self, limit: Duration) -> bool {
        self.wait_until(limit, |lines| lines.iter().any(LogLine::is_terminal))
            .await
    }
}

impl LogView for RecordingLogView {
    fn log_normal(&self, text: &str) {
        self.push(LogLevel::Normal, text);
    }

    fn log_success(&self, text: &str) {
        self.push(LogLevel::Success, text);
    }

    fn log_error(&self, text: &str) {
        self.push(LogLevel::Error, text);
    }

    fn clear_log(&self) {
        self.guard().clear();
        *self.clears.lock().unwrap_or_else(PoisonError::into_inner) += 1;
        self.changed.notify_waiters();
    }
}
