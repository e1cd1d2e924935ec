use std::{fmt::Display, future::Future, sync::Arc};

use event_bus::EventBus;
use shared::{domain::ScreenId, error::PipelineError};
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::{
    assets::{source_listing, AssetStore},
    log_view::LogView,
    operation::{Lifecycle, OperationDef},
    pipeline::{
        subscribe, subscribe_completable, subscribe_maybe, subscribe_single, Observer, Pipeline,
        SEPARATOR,
    },
    task::{TaskHandle, TaskScope},
    view::{ScreenView, TOGGLE_LABEL_INSTRUCTIONS, TOGGLE_LABEL_SOURCE},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScreenEvent {
    SourceLoaded(String),
}

pub struct ScreenController {
    definition: OperationDef,
    view: Box<dyn ScreenView>,
    log: Arc<dyn LogView>,
    assets: Arc<dyn AssetStore>,
    bus: EventBus<String>,
    showing_source: bool,
    primary: Option<TaskHandle>,
    pool: TaskScope,
    events_tx: mpsc::UnboundedSender<ScreenEvent>,
    events_rx: mpsc::UnboundedReceiver<ScreenEvent>,
}

impl ScreenController {
    pub fn new(
        definition: OperationDef,
        view: impl ScreenView + 'static,
        log: Arc<dyn LogView>,
        assets: Arc<dyn AssetStore>,
    ) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        Self {
            definition,
            view: Box::new(view),
            log,
            assets,
            bus: EventBus::new(),
            showing_source: false,
            primary: None,
            pool: TaskScope::new(),
            events_tx,
            events_rx,
        }
    }

    pub fn with_event_bus(mut self, bus: EventBus<String>) -> Self {
        self.bus = bus;
        self
    }

    pub fn id(&self) -> ScreenId {
        self.definition.id
    }

    pub fn definition(&self) -> &OperationDef {
        &self.definition
    }

    pub fn log(&self) -> &Arc<dyn LogView> {
        &self.log
    }

    pub fn event_bus(&self) -> &EventBus<String> {
        &self.bus
    }

    pub fn showing_source(&self) -> bool {
        self.showing_source
    }

    pub fn pooled_tasks(&self) -> usize {
        self.pool.len()
    }

    /// Must run inside a tokio runtime.
    pub fn initialize(&mut self) {
        debug!(screen = %self.definition.id, "initializing screen");
        self.view.set_instructions(self.definition.description);
        self.apply_source_visibility();
        self.view
            .set_stop_visible(self.definition.is_continuous_operation());

        let events = self.events_tx.clone();
        let observer = Observer::new()
            .on_item(move |listing: String| {
                let _ = events.send(ScreenEvent::SourceLoaded(listing));
            })
            .on_complete(|| {});
        let load = subscribe(
            Arc::clone(&self.log),
            source_listing(Arc::clone(&self.assets), self.definition.id),
            observer,
        );
        self.pool.add(load);
    }

    pub fn pump_events(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(event) = self.events_rx.try_recv() {
            self.apply_event(event);
            applied += 1;
        }
        applied
    }

    pub async fn next_event(&mut self) -> Option<ScreenEvent> {
        let event = self.events_rx.recv().await?;
        self.apply_event(event.clone());
        Some(event)
    }

    fn apply_event(&mut self, event: ScreenEvent) {
        match event {
            ScreenEvent::SourceLoaded(listing) => {
                debug!(screen = %self.definition.id, bytes = listing.len(), "source listing loaded");
                self.view.set_source_listing(&listing);
            }
        }
    }

    pub fn toggle_source_view(&mut self) -> bool {
        self.showing_source = !self.showing_source;
        self.apply_source_visibility();
        self.showing_source
    }

    fn apply_source_visibility(&mut self) {
        let showing = self.showing_source;
        self.view.set_source_visible(showing);
        self.view.set_instructions_visible(!showing);
        self.view.set_toggle_label(if showing {
            TOGGLE_LABEL_INSTRUCTIONS
        } else {
            TOGGLE_LABEL_SOURCE
        });
    }

    pub fn on_start_requested(&mut self) {
        info!(screen = %self.definition.id, "start requested");
        self.log.clear_log();
        (self.definition.start)(self);
    }

    pub fn on_stop_requested(&mut self) {
        let lifecycle = self.definition.lifecycle;
        match lifecycle {
            Lifecycle::OneShot => {}
            Lifecycle::Continuous { stop } => {
                info!(screen = %self.definition.id, "stop requested");
                stop(self);
            }
        }
    }

    pub fn subscribe<T>(&self, pipeline: Pipeline<T>) -> TaskHandle
    where
        T: Display + Send + 'static,
    {
        subscribe(Arc::clone(&self.log), pipeline, Observer::new())
    }

    pub fn subscribe_with<T>(&self, pipeline: Pipeline<T>, observer: Observer<T>) -> TaskHandle
    where
        T: Display + Send + 'static,
    {
        subscribe(Arc::clone(&self.log), pipeline, observer)
    }

    pub fn subscribe_single<T, F>(&self, single: F) -> TaskHandle
    where
        T: Display + Send + 'static,
        F: Future<Output = Result<T, PipelineError>> + Send + 'static,
    {
        subscribe_single(Arc::clone(&self.log), single)
    }

    pub fn subscribe_maybe<T, F>(&self, maybe: F) -> TaskHandle
    where
        T: Display + Send + 'static,
        F: Future<Output = Result<Option<T>, PipelineError>> + Send + 'static,
    {
        subscribe_maybe(Arc::clone(&self.log), maybe)
    }

    pub fn subscribe_completable<F>(&self, completable: F) -> TaskHandle
    where
        F: Future<Output = Result<(), PipelineError>> + Send + 'static,
    {
        subscribe_completable(Arc::clone(&self.log), completable)
    }

    pub fn print_normal(&self, text: &str) {
        self.log.log_normal(text);
    }

    pub fn println(&self) {
        self.log.log_normal(SEPARATOR);
    }

    /// Makes `handle` the primary task. A displaced handle is not cancelled;
    /// it moves to the pool so teardown still releases it.
    pub fn set_primary_task(&mut self, handle: TaskHandle) {
        if let Some(previous) = self.primary.replace(handle) {
            self.pool.add(previous);
        }
    }

    pub fn add_to_pool(&mut self, handle: TaskHandle) {
        self.pool.add(handle);
    }

    /// Waits for the pooled work of a one-shot run to end.
    pub async fn wait_for_pool(&mut self) {
        self.pool.wait_all().await;
    }

    pub fn is_primary_task_active(&self) -> bool {
        self.primary.as_ref().is_some_and(TaskHandle::is_active)
    }

    pub fn cancel_primary(&mut self) -> bool {
        match self.primary.take() {
            Some(mut handle) if handle.is_active() => handle.cancel(),
            _ => false,
        }
    }

    /// Cancels the primary task and drains the pool. Safe to repeat.
    pub fn teardown(&mut self) {
        let primary_cancelled = self.cancel_primary();
        let pooled_cancelled = self.pool.cancel_all();
        if primary_cancelled || pooled_cancelled > 0 {
            info!(
                screen = %self.definition.id,
                primary_cancelled,
                pooled_cancelled,
                "screen torn down"
            );
        }
    }
}

impl Drop for ScreenController {
    fn drop(&mut self) {
        self.teardown();
    }
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;
