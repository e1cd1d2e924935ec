use futures::{future, stream, StreamExt};
use screen_core::{pipeline, OperationDef, PipelineExt, ScreenController};
use shared::domain::ScreenId;

use crate::run_pooled;

pub(crate) const BUFFER_SIZE: usize = 3;

pub(crate) const DEFINITIONS: &[OperationDef] = &[
    OperationDef::one_shot(
        ScreenId::MapOperator,
        "Map",
        "Map transforms every item with a function.\n\n\
         Press start to multiply 1 through 5 by ten.",
        start_map,
    ),
    OperationDef::one_shot(
        ScreenId::FlatMapOperator,
        "FlatMap",
        "FlatMap turns each item into a stream of its own and flattens the results.\n\n\
         Press start to expand 1, 2 and 3 into two labelled items each.",
        start_flat_map,
    ),
    OperationDef::one_shot(
        ScreenId::ScanOperator,
        "Scan",
        "Scan applies an accumulator to each item and emits every intermediate result.\n\n\
         Press start to see the running sum of 1 through 5.",
        start_scan,
    ),
    OperationDef::one_shot(
        ScreenId::BufferOperator,
        "Buffer",
        "Buffer gathers items into batches and emits each batch as a list.\n\n\
         Press start to split 1 through 7 into batches of three.",
        start_buffer,
    ),
];

fn start_map(screen: &mut ScreenController) {
    run_pooled(screen, stream::iter(1..=5).map(|x| x * 10).into_pipeline());
}

fn start_flat_map(screen: &mut ScreenController) {
    let expanded = stream::iter(1..=3)
        .flat_map(|n| stream::iter([format!("{n}-a"), format!("{n}-b")]))
        .into_pipeline();
    run_pooled(screen, expanded);
}

fn start_scan(screen: &mut ScreenController) {
    let sums = pipeline::just(1..=5)
        .scan(0, |total, next| {
            future::ready(Some(next.map(|x| {
                *total += x;
                *total
            })))
        })
        .boxed();
    run_pooled(screen, sums);
}

fn start_buffer(screen: &mut ScreenController) {
    let batches = stream::iter(1..=7)
        .chunks(BUFFER_SIZE)
        .map(|batch| format!("{batch:?}"))
        .into_pipeline();
    run_pooled(screen, batches);
}
