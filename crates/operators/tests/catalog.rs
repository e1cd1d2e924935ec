use std::{sync::Arc, time::Duration};

use event_bus::EventBus;
use operators::{Registry, TICKER_KEY};
use screen_core::{
    LogView, MemoryAssetStore, RecordingLogView, ScreenController, ViewState, COMPLETED,
    SEPARATOR,
};
use shared::{domain::ScreenId, log::LogLevel};
use tokio::time::timeout;

const WAIT: Duration = Duration::from_secs(3);

fn controller(id: ScreenId, log: &Arc<RecordingLogView>) -> ScreenController {
    let registry = Registry::builtin();
    let definition = *registry.get(id).expect("registered");
    ScreenController::new(
        definition,
        ViewState::default(),
        Arc::clone(log) as Arc<dyn LogView>,
        Arc::new(MemoryAssetStore::new()),
    )
}

async fn run_to_completion(id: ScreenId) -> Vec<String> {
    let log = RecordingLogView::new();
    let mut screen = controller(id, &log);
    screen.on_start_requested();
    assert!(
        timeout(WAIT, screen.wait_for_pool()).await.is_ok(),
        "{id} did not finish"
    );
    screen.teardown();
    log.texts()
}

#[tokio::test]
async fn creating_operators() {
    assert_eq!(
        run_to_completion(ScreenId::JustOperator).await,
        vec!["1", "2", "3", COMPLETED]
    );
    assert_eq!(
        run_to_completion(ScreenId::RangeOperator).await,
        vec!["1", "2", "3", "4", "5", COMPLETED]
    );
    assert_eq!(
        run_to_completion(ScreenId::TimerOperator).await,
        vec!["waiting 200 ms", SEPARATOR, "0"]
    );
}

#[tokio::test]
async fn transforming_operators() {
    assert_eq!(
        run_to_completion(ScreenId::MapOperator).await,
        vec!["10", "20", "30", "40", "50", COMPLETED]
    );
    assert_eq!(
        run_to_completion(ScreenId::FlatMapOperator).await,
        vec!["1-a", "1-b", "2-a", "2-b", "3-a", "3-b", COMPLETED]
    );
    assert_eq!(
        run_to_completion(ScreenId::ScanOperator).await,
        vec!["1", "3", "6", "10", "15", COMPLETED]
    );
    assert_eq!(
        run_to_completion(ScreenId::BufferOperator).await,
        vec!["[1, 2, 3]", "[4, 5, 6]", "[7]", COMPLETED]
    );
}

#[tokio::test]
async fn filtering_operators() {
    assert_eq!(
        run_to_completion(ScreenId::FilterOperator).await,
        vec!["2", "4", "6", "8", "10", COMPLETED]
    );
    assert_eq!(
        run_to_completion(ScreenId::TakeOperator).await,
        vec!["1", "2", "3", COMPLETED]
    );
    assert_eq!(
        run_to_completion(ScreenId::SkipOperator).await,
        vec!["8", "9", "10", COMPLETED]
    );
    assert_eq!(
        run_to_completion(ScreenId::SkipLastOperator).await,
        vec!["1", "2", "3", "4", "5", "6", COMPLETED]
    );
    assert_eq!(
        run_to_completion(ScreenId::DistinctOperator).await,
        vec!["1", "2", "3", "4", COMPLETED]
    );
}

#[tokio::test]
async fn combining_operators() {
    let mut merged = run_to_completion(ScreenId::MergeOperator).await;
    assert_eq!(merged.pop().as_deref(), Some(COMPLETED));
    merged.sort();
    assert_eq!(merged, vec!["A0", "A1", "A2", "B0", "B1"]);

    assert_eq!(
        run_to_completion(ScreenId::ConcatOperator).await,
        vec!["1", "2", "3", "4", "5", "6", COMPLETED]
    );
    assert_eq!(
        run_to_completion(ScreenId::ZipOperator).await,
        vec!["a1", "b2", "c3", COMPLETED]
    );
    assert_eq!(
        run_to_completion(ScreenId::ReduceOperator).await,
        vec!["sum of 1 through 10", SEPARATOR, "55"]
    );
}

#[tokio::test]
async fn error_handling_operators() {
    assert_eq!(
        run_to_completion(ScreenId::ErrorOperator).await,
        vec!["1", "boom"]
    );
    assert_eq!(
        run_to_completion(ScreenId::OnErrorReturnOperator).await,
        vec!["1", "-1", COMPLETED]
    );
    assert_eq!(
        run_to_completion(ScreenId::RetryOperator).await,
        vec!["attempt 1", "attempt 2", "attempt 3 succeeded", COMPLETED]
    );
}

#[tokio::test]
async fn error_line_is_logged_at_error_level() {
    let log = RecordingLogView::new();
    let mut screen = controller(ScreenId::ErrorOperator, &log);
    screen.on_start_requested();
    assert!(log.wait_for_terminal(WAIT).await);
    assert_eq!(
        log.entries().last(),
        Some(&(LogLevel::Error, "boom".to_string()))
    );
}

#[tokio::test]
async fn event_bus_publish_round_trip() {
    assert_eq!(
        run_to_completion(ScreenId::EventBusPublish).await,
        vec![
            "received: hello",
            "received: from",
            "received: the bus",
            COMPLETED
        ]
    );
}

#[tokio::test]
async fn interval_runs_until_stopped() {
    let log = RecordingLogView::new();
    let mut screen = controller(ScreenId::IntervalOperator, &log);

    assert!(!screen.is_primary_task_active());
    screen.on_start_requested();
    assert!(screen.is_primary_task_active());
    assert!(log.wait_for_len(1, WAIT).await);
    assert_eq!(log.texts().first().map(String::as_str), Some("0"));

    screen.on_stop_requested();
    assert!(!screen.is_primary_task_active());
    assert!(!log.texts().iter().any(|text| text == COMPLETED));
}

#[tokio::test]
async fn throttle_emits_sparse_ticks_until_stopped() {
    let log = RecordingLogView::new();
    let mut screen = controller(ScreenId::ThrottleOperator, &log);
    screen.on_start_requested();
    assert!(log.wait_for_len(2, WAIT).await);
    screen.on_stop_requested();

    let ticks = log
        .texts()
        .iter()
        .map(|text| text.parse::<usize>().expect("tick"))
        .collect::<Vec<_>>();
    assert_eq!(ticks[0], 0);
    assert!(ticks[1] >= 3, "ticks between windows must be dropped: {ticks:?}");
}

#[tokio::test]
async fn ticker_stop_unsubscribes_and_unregisters() {
    let bus = EventBus::new();
    let log = RecordingLogView::new();
    let mut screen = controller(ScreenId::EventBusTicker, &log).with_event_bus(bus.clone());

    screen.on_start_requested();
    assert!(screen.is_primary_task_active());
    assert!(log.wait_for_len(1, WAIT).await);
    assert_eq!(log.texts()[0], "tick 0");

    screen.on_stop_requested();
    assert!(!screen.is_primary_task_active());
    assert!(!bus.keys().contains(&TICKER_KEY.to_string()));

    screen.teardown();
    assert_eq!(screen.pooled_tasks(), 0);
}

#[tokio::test]
async fn ticker_restart_after_stop_yields_a_single_sequence() {
    let bus = EventBus::new();
    let log = RecordingLogView::new();
    let mut screen = controller(ScreenId::EventBusTicker, &log).with_event_bus(bus.clone());

    screen.on_start_requested();
    assert!(log.wait_for_len(2, WAIT).await);
    screen.on_stop_requested();

    // Restart well inside one ticker period of the stop.
    screen.on_start_requested();
    assert!(log.wait_for_len(4, WAIT).await);
    screen.on_stop_requested();

    let texts = log.texts();
    let expected = (0..texts.len()).map(|tick| format!("tick {tick}")).collect::<Vec<_>>();
    assert_eq!(texts, expected);
    assert_eq!(bus.subscriber_count(TICKER_KEY), 0);
}
