use std::time::Duration;

use futures::StreamExt;
use screen_core::{cancel_primary, pipeline, OperationDef, PipelineExt, ScreenController};
use shared::{domain::ScreenId, error::PipelineError};
use tokio::time;
use tokio_stream::wrappers::IntervalStream;

use crate::{run_pooled, run_primary};

pub(crate) const TIMER_DELAY: Duration = Duration::from_millis(200);
pub(crate) const INTERVAL_PERIOD: Duration = Duration::from_millis(500);

pub(crate) const DEFINITIONS: &[OperationDef] = &[
    OperationDef::one_shot(
        ScreenId::JustOperator,
        "Just",
        "Just emits the items it is given, in order, and then completes.\n\n\
         Press start to emit 1, 2 and 3.",
        start_just,
    ),
    OperationDef::one_shot(
        ScreenId::RangeOperator,
        "Range",
        "Range emits a sequence of consecutive integers.\n\n\
         Press start to emit the numbers 1 through 5.",
        start_range,
    ),
    OperationDef::one_shot(
        ScreenId::TimerOperator,
        "Timer",
        "Timer emits a single 0 after a delay. It is a single value, so no \
         completion is logged.\n\n\
         Press start and wait 200 ms for the item.",
        start_timer,
    ),
    OperationDef::continuous(
        ScreenId::IntervalOperator,
        "Interval",
        "Interval emits an increasing counter at a fixed period and never completes.\n\n\
         Press start to tick every 500 ms, press stop to cancel the subscription.",
        start_interval,
        cancel_primary,
    ),
];

fn start_just(screen: &mut ScreenController) {
    run_pooled(screen, pipeline::just([1, 2, 3]));
}

fn start_range(screen: &mut ScreenController) {
    run_pooled(screen, pipeline::just(1..=5));
}

fn start_timer(screen: &mut ScreenController) {
    screen.print_normal(&format!("waiting {} ms", TIMER_DELAY.as_millis()));
    screen.println();
    let timer = screen.subscribe_single(async {
        time::sleep(TIMER_DELAY).await;
        Ok::<_, PipelineError>(0u64)
    });
    screen.add_to_pool(timer);
}

fn start_interval(screen: &mut ScreenController) {
    let ticks = IntervalStream::new(time::interval(INTERVAL_PERIOD))
        .enumerate()
        .map(|(tick, _)| tick)
        .into_pipeline();
    run_primary(screen, ticks);
}

