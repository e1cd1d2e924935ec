use std::{
    collections::{HashSet, VecDeque},
    fmt::Display,
    future::Future,
    hash::Hash,
    sync::Arc,
};

use futures::{
    future,
    stream::{self, BoxStream},
    Stream, StreamExt,
};
use shared::error::PipelineError;

use crate::{log_view::LogView, task::TaskHandle};

pub const COMPLETED: &str = "Completed!";
pub const SEPARATOR: &str = "------------------------------------------------------------";

pub type Pipeline<T> = BoxStream<'static, Result<T, PipelineError>>;

pub trait PipelineExt: Stream + Sized + Send + 'static {
    fn into_pipeline(self) -> Pipeline<Self::Item>
    where
        Self::Item: Send + 'static,
    {
        self.map(Ok).boxed()
    }
}

impl<S: Stream + Send + 'static> PipelineExt for S {}

pub fn just<T, I>(items: I) -> Pipeline<T>
where
    I: IntoIterator<Item = T>,
    I::IntoIter: Send + 'static,
    T: Send + 'static,
{
    stream::iter(items).into_pipeline()
}

pub fn fail<T: Send + 'static>(error: PipelineError) -> Pipeline<T> {
    stream::once(future::ready(Err(error))).boxed()
}

pub fn distinct<T>(pipeline: Pipeline<T>) -> Pipeline<T>
where
    T: Clone + Eq + Hash + Send + 'static,
{
    pipeline
        .scan(HashSet::new(), |seen, next| {
            let keep = match &next {
                Ok(item) => seen.insert(item.clone()),
                Err(_) => true,
            };
            future::ready(Some(keep.then_some(next)))
        })
        .filter_map(future::ready)
        .boxed()
}

/// Holds back the most recent `count` items, so the last `count` never
/// reach the subscriber. Errors pass straight through.
pub fn skip_last<T>(pipeline: Pipeline<T>, count: usize) -> Pipeline<T>
where
    T: Send + 'static,
{
    pipeline
        .scan(VecDeque::with_capacity(count + 1), move |held, next| {
            let released = match next {
                Ok(item) => {
                    held.push_back(item);
                    (held.len() > count).then(|| held.pop_front()).flatten().map(Ok)
                }
                Err(err) => Some(Err(err)),
            };
            future::ready(Some(released))
        })
        .filter_map(future::ready)
        .boxed()
}

/// Replaces the first error with `fallback(&error)` and completes.
pub fn on_error_return<T, F>(pipeline: Pipeline<T>, fallback: F) -> Pipeline<T>
where
    T: Send + 'static,
    F: Fn(&PipelineError) -> T + Send + 'static,
{
    pipeline
        .scan(false, move |failed, next| {
            if *failed {
                return future::ready(None);
            }
            future::ready(Some(match next {
                Ok(item) => Ok(item),
                Err(err) => {
                    *failed = true;
                    Ok(fallback(&err))
                }
            }))
        })
        .boxed()
}

/// Resubscribes to a fresh pipeline from `factory` after each error, up to
/// `retries` times. Items emitted before a failure are emitted again.
pub fn retry<T, F>(factory: F, retries: usize) -> Pipeline<T>
where
    T: Send + 'static,
    F: Fn() -> Pipeline<T> + Send + 'static,
{
    let first = factory();
    stream::unfold(
        Some((first, 0usize, factory)),
        move |state| async move {
            let (mut current, mut attempt, factory) = state?;
            loop {
                match current.next().await {
                    Some(Ok(item)) => return Some((Ok(item), Some((current, attempt, factory)))),
                    Some(Err(_)) if attempt < retries => {
                        attempt += 1;
                        tracing::debug!(attempt, "pipeline failed; resubscribing");
                        current = factory();
                    }
                    Some(Err(err)) => return Some((Err(err), None)),
                    None => return None,
                }
            }
        },
    )
    .boxed()
}

type ItemHandler<T> = Box<dyn FnMut(T) + Send>;
type CompleteHandler = Box<dyn FnOnce() + Send>;

pub struct Observer<T> {
    on_item: Option<ItemHandler<T>>,
    on_complete: Option<CompleteHandler>,
}

impl<T> Default for Observer<T> {
    fn default() -> Self {
        Self {
            on_item: None,
            on_complete: None,
        }
    }
}

impl<T> Observer<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_item(mut self, handler: impl FnMut(T) + Send + 'static) -> Self {
        self.on_item = Some(Box::new(handler));
        self
    }

    pub fn on_complete(mut self, handler: impl FnOnce() + Send + 'static) -> Self {
        self.on_complete = Some(Box::new(handler));
        self
    }
}

/// Drives `pipeline` on a new task. Items become normal lines, the first
/// error becomes an error line and ends the subscription, completion becomes
/// a success line. Nothing is propagated past this boundary.
pub fn subscribe<T>(log: Arc<dyn LogView>, pipeline: Pipeline<T>, observer: Observer<T>) -> TaskHandle
where
    T: Display + Send + 'static,
{
    let Observer {
        mut on_item,
        on_complete,
    } = observer;

    TaskHandle::spawn(async move {
        let mut pipeline = pipeline;
        while let Some(next) = pipeline.next().await {
            match next {
                Ok(item) => match on_item.as_mut() {
                    Some(handler) => handler(item),
                    None => log.log_normal(&item.to_string()),
                },
                Err(err) => {
                    log.log_error(&err.to_string());
                    return;
                }
            }
        }

        match on_complete {
            Some(handler) => handler(),
            None => log.log_success(COMPLETED),
        }
    })
}

/// Drives a single-value computation. The value becomes a normal line and a
/// failure an error line; there is no completion line either way.
pub fn subscribe_single<T, F>(log: Arc<dyn LogView>, single: F) -> TaskHandle
where
    T: Display + Send + 'static,
    F: Future<Output = Result<T, PipelineError>> + Send + 'static,
{
    TaskHandle::spawn(async move {
        match single.await {
            Ok(value) => log.log_normal(&value.to_string()),
            Err(err) => log.log_error(&err.to_string()),
        }
    })
}

pub fn subscribe_maybe<T, F>(log: Arc<dyn LogView>, maybe: F) -> TaskHandle
where
    T: Display + Send + 'static,
    F: Future<Output = Result<Option<T>, PipelineError>> + Send + 'static,
{
    TaskHandle::spawn(async move {
        match maybe.await {
            Ok(Some(value)) => log.log_normal(&value.to_string()),
            Ok(None) => log.log_success(COMPLETED),
            Err(err) => log.log_error(&err.to_string()),
        }
    })
}

pub fn subscribe_completable<F>(log: Arc<dyn LogView>, completable: F) -> TaskHandle
where
    F: Future<Output = Result<(), PipelineError>> + Send + 'static,
{
    TaskHandle::spawn(async move {
        match completable.await {
            Ok(()) => log.log_success(COMPLETED),
            Err(err) => log.log_error(&err.to_string()),
        }
    })
}

#[cfg(test)]
#[path = "tests/pipeline_tests.rs"]
mod tests;
