//! Drives one screen through initialize → start → (stop) → teardown.

use std::{
    sync::{Arc, Mutex, PoisonError},
    time::Duration,
};

use event_bus::EventBus;
use screen_core::{AssetStore, LogView, OperationDef, ScreenController, ViewState};
use shared::{domain::ScreenId, log::LogLevel};
use tokio::time::timeout;
use tracing::{info, warn};

use crate::terminal::{render_view, TerminalLogView};

const LISTING_TIMEOUT: Duration = Duration::from_millis(500);
const ONE_SHOT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone)]
pub struct RunOptions {
    pub run_for: Duration,
    pub show_source: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub screen: ScreenId,
    pub lines: usize,
    pub errors: usize,
    pub completed: bool,
}

pub async fn run_screen(
    definition: OperationDef,
    assets: Arc<dyn AssetStore>,
    bus: EventBus<String>,
    options: &RunOptions,
) -> RunReport {
    let log = TerminalLogView::new(definition.id);
    let view = Arc::new(Mutex::new(ViewState::default()));
    let mut screen = ScreenController::new(
        definition,
        Arc::clone(&view),
        Arc::clone(&log) as Arc<dyn LogView>,
        assets,
    )
    .with_event_bus(bus);

    screen.initialize();
    if timeout(LISTING_TIMEOUT, screen.next_event()).await.is_err() {
        warn!(screen = %definition.id, "source listing did not load in time");
    }
    if options.show_source {
        screen.toggle_source_view();
    }
    {
        let view = view.lock().unwrap_or_else(PoisonError::into_inner);
        println!("{}", render_view(definition.title, &view));
    }

    screen.on_start_requested();
    let completed = if definition.is_continuous_operation() {
        tokio::time::sleep(options.run_for).await;
        screen.on_stop_requested();
        false
    } else {
        let finished = timeout(ONE_SHOT_TIMEOUT, screen.wait_for_pool())
            .await
            .is_ok();
        if !finished {
            warn!(screen = %definition.id, "one-shot screen did not finish in time");
        }
        finished
    };
    screen.teardown();

    let lines = log.record().lines();
    let errors = lines
        .iter()
        .filter(|line| line.level == LogLevel::Error)
        .count();
    let report = RunReport {
        screen: definition.id,
        lines: lines.len(),
        errors,
        completed: completed && errors == 0,
    };
    info!(
        screen = %report.screen,
        lines = report.lines,
        errors = report.errors,
        completed = report.completed,
        "screen run finished"
    );
    report
}

#[cfg(test)]
#[path = "tests/runner_tests.rs"]
mod tests;
