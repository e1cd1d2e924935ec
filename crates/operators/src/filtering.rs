use std::time::Duration;

use futures::{future, stream, StreamExt};
use screen_core::{cancel_primary, pipeline, OperationDef, PipelineExt, ScreenController};
use shared::domain::ScreenId;
use tokio::time::{self, Instant};
use tokio_stream::wrappers::IntervalStream;

use crate::{run_pooled, run_primary};

pub(crate) const THROTTLE_SOURCE_PERIOD: Duration = Duration::from_millis(100);
pub(crate) const THROTTLE_WINDOW: Duration = Duration::from_millis(400);

pub(crate) const DEFINITIONS: &[OperationDef] = &[
    OperationDef::one_shot(
        ScreenId::FilterOperator,
        "Filter",
        "Filter only lets through items that pass a predicate.\n\n\
         Press start to keep the even numbers between 1 and 10.",
        start_filter,
    ),
    OperationDef::one_shot(
        ScreenId::TakeOperator,
        "Take",
        "Take emits only the first n items and then completes.\n\n\
         Press start to take three items out of 1 through 10.",
        start_take,
    ),
    OperationDef::one_shot(
        ScreenId::SkipOperator,
        "Skip",
        "Skip suppresses the first n items.\n\n\
         Press start to skip seven items out of 1 through 10.",
        start_skip,
    ),
    OperationDef::one_shot(
        ScreenId::SkipLastOperator,
        "Skip last",
        "Skip last drops the final n items and keeps everything before them.\n\n\
         Press start to drop the last four items out of 1 through 10.",
        start_skip_last,
    ),
    OperationDef::one_shot(
        ScreenId::DistinctOperator,
        "Distinct",
        "Distinct suppresses items that were already emitted.\n\n\
         Press start to de-duplicate 1, 2, 2, 3, 1, 4.",
        start_distinct,
    ),
    OperationDef::continuous(
        ScreenId::ThrottleOperator,
        "Throttle first",
        "Throttle first emits the first item of each time window and drops the rest.\n\n\
         Press start to throttle a 100 ms ticker to one item every 400 ms, \
         press stop to cancel it.",
        start_throttle,
        cancel_primary,
    ),
];

fn start_filter(screen: &mut ScreenController) {
    let evens = stream::iter(1..=10)
        .filter(|x| future::ready(x % 2 == 0))
        .into_pipeline();
    run_pooled(screen, evens);
}

fn start_take(screen: &mut ScreenController) {
    run_pooled(screen, pipeline::just(1..=10).take(3).boxed());
}

fn start_skip(screen: &mut ScreenController) {
    run_pooled(screen, pipeline::just(1..=10).skip(7).boxed());
}

fn start_skip_last(screen: &mut ScreenController) {
    run_pooled(screen, pipeline::skip_last(pipeline::just(1..=10), 4));
}

fn start_distinct(screen: &mut ScreenController) {
    run_pooled(screen, pipeline::distinct(pipeline::just([1, 2, 2, 3, 1, 4])));
}

fn start_throttle(screen: &mut ScreenController) {
    let mut window_start: Option<Instant> = None;
    let throttled = IntervalStream::new(time::interval(THROTTLE_SOURCE_PERIOD))
        .enumerate()
        .map(|(tick, _)| tick)
        .filter(move |_| {
            let now = Instant::now();
            let open = match window_start {
                Some(start) => now.duration_since(start) >= THROTTLE_WINDOW,
                None => true,
            };
            if open {
                window_start = Some(now);
            }
            future::ready(open)
        });
    run_primary(screen, throttled.into_pipeline());
}
