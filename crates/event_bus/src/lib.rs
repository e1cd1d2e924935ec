use std::{
    collections::HashMap,
    pin::Pin,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
    task::{Context, Poll},
};

use futures::Stream;
use tokio::sync::broadcast;
use tokio_stream::wrappers::{errors::BroadcastStreamRecvError, BroadcastStream};
use tracing::{debug, warn};

pub const DEFAULT_CAPACITY: usize = 64;

pub struct EventBus<E> {
    channels: Arc<Mutex<HashMap<String, broadcast::Sender<E>>>>,
    capacity: usize,
}

impl<E> Clone for EventBus<E> {
    fn clone(&self) -> Self {
        Self {
            channels: Arc::clone(&self.channels),
            capacity: self.capacity,
        }
    }
}

impl<E: Clone + Send + 'static> Default for EventBus<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Clone + Send + 'static> EventBus<E> {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            channels: Arc::new(Mutex::new(HashMap::new())),
            capacity: capacity.max(1),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    fn channels(&self) -> MutexGuard<'_, HashMap<String, broadcast::Sender<E>>> {
        self.channels.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn subscribe(&self, key: &str) -> BusSubscription<E> {
        let mut channels = self.channels();
        let sender = channels.entry(key.to_string()).or_insert_with(|| {
            debug!(key, "registering bus channel");
            broadcast::channel(self.capacity).0
        });

        BusSubscription {
            key: key.to_string(),
            inner: BroadcastStream::new(sender.subscribe()),
        }
    }

    pub fn publish(&self, key: &str, event: E) -> usize {
        let channels = self.channels();
        let Some(sender) = channels.get(key) else {
            debug!(key, "no bus channel registered; event dropped");
            return 0;
        };
        sender.send(event).unwrap_or(0)
    }

    /// Drops the channel for `key`. Live subscriptions end once they have
    /// drained what was already published.
    pub fn unregister(&self, key: &str) -> bool {
        let removed = self.channels().remove(key).is_some();
        if removed {
            debug!(key, "unregistered bus channel");
        }
        removed
    }

    pub fn subscriber_count(&self, key: &str) -> usize {
        self.channels()
            .get(key)
            .map(broadcast::Sender::receiver_count)
            .unwrap_or(0)
    }

    pub fn keys(&self) -> Vec<String> {
        let mut keys = self.channels().keys().cloned().collect::<Vec<_>>();
        keys.sort();
        keys
    }
}

pub struct BusSubscription<E> {
    key: String,
    inner: BroadcastStream<E>,
}

impl<E> BusSubscription<E> {
    pub fn key(&self) -> &str {
        &self.key
    }
}

impl<E: Clone + Send + 'static> Stream for BusSubscription<E> {
    type Item = E;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<E>> {
        loop {
            match Pin::new(&mut self.inner).poll_next(cx) {
                Poll::Ready(Some(Ok(event))) => return Poll::Ready(Some(event)),
                Poll::Ready(Some(Err(BroadcastStreamRecvError::Lagged(skipped)))) => {
                    warn!(key = %self.key, skipped, "bus subscriber lagged; skipping missed events");
                }
                Poll::Ready(None) => return Poll::Ready(None),
                Poll::Pending => return Poll::Pending,
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
