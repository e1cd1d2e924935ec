use std::time::Duration;

use futures::{future, stream, Stream, StreamExt};
use screen_core::{pipeline, OperationDef, PipelineExt, ScreenController};
use shared::{domain::ScreenId, error::PipelineError};
use tokio::time;
use tokio_stream::wrappers::IntervalStream;

use crate::run_pooled;

pub(crate) const MERGE_FAST_PERIOD: Duration = Duration::from_millis(60);
pub(crate) const MERGE_SLOW_PERIOD: Duration = Duration::from_millis(150);

pub(crate) const DEFINITIONS: &[OperationDef] = &[
    OperationDef::one_shot(
        ScreenId::MergeOperator,
        "Merge",
        "Merge interleaves the items of several streams as they arrive.\n\n\
         Press start to merge a fast source (A) with a slow source (B).",
        start_merge,
    ),
    OperationDef::one_shot(
        ScreenId::ConcatOperator,
        "Concat",
        "Concat subscribes to the next stream only after the previous one completes.\n\n\
         Press start to emit 1, 2, 3 followed by 4, 5, 6.",
        start_concat,
    ),
    OperationDef::one_shot(
        ScreenId::ZipOperator,
        "Zip",
        "Zip pairs items from two streams by position and stops with the shorter one.\n\n\
         Press start to combine a, b, c with 1, 2, 3, 4.",
        start_zip,
    ),
    OperationDef::one_shot(
        ScreenId::ReduceOperator,
        "Reduce",
        "Reduce folds every item into a single result. The result is logged on \
         its own, or Completed! when the source was empty.\n\n\
         Press start to sum 1 through 10.",
        start_reduce,
    ),
];

fn labelled_ticks(label: &'static str, period: Duration, count: usize) -> impl Stream<Item = String> {
    IntervalStream::new(time::interval(period))
        .take(count)
        .enumerate()
        .map(move |(n, _)| format!("{label}{n}"))
}

fn start_merge(screen: &mut ScreenController) {
    let merged = stream::select(
        labelled_ticks("A", MERGE_FAST_PERIOD, 3),
        labelled_ticks("B", MERGE_SLOW_PERIOD, 2),
    );
    run_pooled(screen, merged.into_pipeline());
}

fn start_concat(screen: &mut ScreenController) {
    let joined = pipeline::just([1, 2, 3])
        .chain(pipeline::just([4, 5, 6]))
        .boxed();
    run_pooled(screen, joined);
}

fn start_zip(screen: &mut ScreenController) {
    let pairs = stream::iter(["a", "b", "c"])
        .zip(stream::iter(1..=4))
        .map(|(letter, number)| format!("{letter}{number}"))
        .into_pipeline();
    run_pooled(screen, pairs);
}

/// Folds without a seed: an empty source has nothing to reduce.
async fn reduce<S>(source: S) -> Result<Option<i32>, PipelineError>
where
    S: Stream<Item = i32>,
{
    let sum = source
        .fold(None, |acc: Option<i32>, x| {
            future::ready(Some(acc.map_or(x, |acc| acc + x)))
        })
        .await;
    Ok(sum)
}

fn start_reduce(screen: &mut ScreenController) {
    screen.print_normal("sum of 1 through 10");
    screen.println();
    let sum = screen.subscribe_maybe(reduce(stream::iter(1..=10)));
    screen.add_to_pool(sum);
}
