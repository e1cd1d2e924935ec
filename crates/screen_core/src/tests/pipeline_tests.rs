use super::*;
use crate::log_view::RecordingLogView;
use shared::log::LogLevel;
use std::{
    sync::{
        atomic::{AtomicUsize, Ordering},
        Mutex,
    },
    time::Duration,
};

const WAIT: Duration = Duration::from_secs(2);

fn emits_then_fails(items: Vec<i32>, message: &str) -> Pipeline<i32> {
    just(items).chain(fail(PipelineError::emission(message))).boxed()
}

#[tokio::test]
async fn completed_pipeline_logs_items_then_completion() {
    let log = RecordingLogView::new();
    let mut handle = subscribe(log.clone(), just([1, 2, 3]), Observer::new());
    handle.wait().await;

    assert_eq!(
        log.entries(),
        vec![
            (LogLevel::Normal, "1".to_string()),
            (LogLevel::Normal, "2".to_string()),
            (LogLevel::Normal, "3".to_string()),
            (LogLevel::Success, COMPLETED.to_string()),
        ]
    );
}

#[tokio::test]
async fn failing_pipeline_logs_error_and_no_completion() {
    let log = RecordingLogView::new();
    let mut handle = subscribe(log.clone(), emits_then_fails(vec![1], "boom"), Observer::new());
    handle.wait().await;

    assert_eq!(
        log.entries(),
        vec![
            (LogLevel::Normal, "1".to_string()),
            (LogLevel::Error, "boom".to_string()),
        ]
    );
}

#[tokio::test]
async fn items_after_an_error_are_not_delivered() {
    let log = RecordingLogView::new();
    let pipeline = emits_then_fails(vec![1], "first")
        .chain(just([2]))
        .boxed();
    let mut handle = subscribe(log.clone(), pipeline, Observer::new());
    handle.wait().await;

    assert_eq!(log.texts(), vec!["1", "first"]);
}

#[tokio::test]
async fn custom_handlers_replace_default_logging() {
    let log = RecordingLogView::new();
    let seen = Arc::new(Mutex::new(Vec::new()));
    let completions = Arc::new(AtomicUsize::new(0));

    let seen_in = Arc::clone(&seen);
    let completions_in = Arc::clone(&completions);
    let observer = Observer::new()
        .on_item(move |item: i32| seen_in.lock().expect("seen").push(item))
        .on_complete(move || {
            completions_in.fetch_add(1, Ordering::SeqCst);
        });

    let mut handle = subscribe(log.clone(), just([4, 5]), observer);
    handle.wait().await;

    assert!(log.is_empty());
    assert_eq!(*seen.lock().expect("seen"), vec![4, 5]);
    assert_eq!(completions.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn distinct_drops_repeated_items() {
    let log = RecordingLogView::new();
    let mut handle = subscribe(log.clone(), distinct(just([1, 2, 2, 3, 1, 4])), Observer::new());
    handle.wait().await;

    assert_eq!(log.texts(), vec!["1", "2", "3", "4", COMPLETED]);
}

#[tokio::test]
async fn on_error_return_substitutes_fallback_and_completes() {
    let log = RecordingLogView::new();
    let pipeline = on_error_return(emits_then_fails(vec![1, 2], "boom"), |_| -1);
    let mut handle = subscribe(log.clone(), pipeline, Observer::new());
    handle.wait().await;

    assert_eq!(log.texts(), vec!["1", "2", "-1", COMPLETED]);
}

#[tokio::test]
async fn retry_resubscribes_until_success() {
    let attempts = Arc::new(AtomicUsize::new(0));
    let attempts_in = Arc::clone(&attempts);
    let pipeline = retry(
        move || {
            let attempt = attempts_in.fetch_add(1, Ordering::SeqCst) + 1;
            if attempt < 3 {
                emits_then_fails(vec![], "flaky")
            } else {
                just([attempt as i32])
            }
        },
        2,
    );

    let log = RecordingLogView::new();
    let mut handle = subscribe(log.clone(), pipeline, Observer::new());
    handle.wait().await;

    assert_eq!(attempts.load(Ordering::SeqCst), 3);
    assert_eq!(log.texts(), vec!["3", COMPLETED]);
}

#[tokio::test]
async fn retry_gives_up_after_budget() {
    let log = RecordingLogView::new();
    let pipeline = retry(|| emits_then_fails(vec![7], "still broken"), 1);
    let mut handle = subscribe(log.clone(), pipeline, Observer::new());
    assert!(log.wait_for_terminal(WAIT).await);
    handle.wait().await;

    assert_eq!(log.texts(), vec!["7", "7", "still broken"]);
}

#[tokio::test]
async fn skip_last_holds_back_the_final_items() {
    let log = RecordingLogView::new();
    let mut handle = subscribe(log.clone(), skip_last(just(1..=10), 4), Observer::new());
    handle.wait().await;

    assert_eq!(log.texts(), vec!["1", "2", "3", "4", "5", "6", COMPLETED]);
}

#[tokio::test]
async fn skip_last_passes_errors_and_drops_held_items() {
    let log = RecordingLogView::new();
    let pipeline = skip_last(emits_then_fails(vec![1, 2, 3], "cut short"), 2);
    let mut handle = subscribe(log.clone(), pipeline, Observer::new());
    handle.wait().await;

    assert_eq!(log.texts(), vec!["1", "cut short"]);
}

#[tokio::test]
async fn single_logs_value_without_completion() {
    let log = RecordingLogView::new();
    let mut handle = subscribe_single(log.clone(), async { Ok::<_, PipelineError>(42) });
    handle.wait().await;

    assert_eq!(log.entries(), vec![(LogLevel::Normal, "42".to_string())]);
}

#[tokio::test]
async fn single_failure_logs_error_only() {
    let log = RecordingLogView::new();
    let single = future::ready(Err::<i32, _>(PipelineError::emission("no value")));
    let mut handle = subscribe_single(log.clone(), single);
    handle.wait().await;

    assert_eq!(log.entries(), vec![(LogLevel::Error, "no value".to_string())]);
}

#[tokio::test]
async fn maybe_completes_only_when_empty() {
    let log = RecordingLogView::new();
    subscribe_maybe(log.clone(), future::ready(Ok::<_, PipelineError>(Some(7))))
        .wait()
        .await;
    assert_eq!(log.entries(), vec![(LogLevel::Normal, "7".to_string())]);

    let log = RecordingLogView::new();
    subscribe_maybe(log.clone(), future::ready(Ok::<Option<i32>, PipelineError>(None)))
        .wait()
        .await;
    assert_eq!(log.entries(), vec![(LogLevel::Success, COMPLETED.to_string())]);
}

#[tokio::test]
async fn completable_logs_completion_or_error() {
    let log = RecordingLogView::new();
    subscribe_completable(log.clone(), async { Ok(()) }).wait().await;
    subscribe_completable(log.clone(), async {
        Err(PipelineError::timeout("gave up"))
    })
    .wait()
    .await;

    assert_eq!(
        log.entries(),
        vec![
            (LogLevel::Success, COMPLETED.to_string()),
            (LogLevel::Error, "gave up".to_string()),
        ]
    );
}
