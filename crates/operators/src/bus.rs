use std::time::Duration;

use futures::{future, stream, StreamExt};
use screen_core::{OperationDef, PipelineExt, ScreenController, TaskHandle};
use shared::domain::ScreenId;
use tokio::time;
use tokio_stream::wrappers::IntervalStream;
use tracing::debug;

use crate::{run_pooled, run_primary};

pub const DEMO_KEY: &str = "demo";
pub const TICKER_KEY: &str = "ticker";

pub(crate) const DEMO_MESSAGES: [&str; 3] = ["hello", "from", "the bus"];
pub(crate) const TICKER_PERIOD: Duration = Duration::from_millis(300);

pub(crate) const DEFINITIONS: &[OperationDef] = &[
    OperationDef::one_shot(
        ScreenId::EventBusPublish,
        "Event bus: publish",
        "Subscribers register on the bus under a string key and receive every \
         event published to that key.\n\n\
         Press start to subscribe to \"demo\", publish three events and unregister the key.",
        start_publish,
    ),
    OperationDef::continuous(
        ScreenId::EventBusTicker,
        "Event bus: ticker",
        "A background publisher posts a tick to the \"ticker\" key until nobody listens.\n\n\
         Press start to listen, press stop to unsubscribe and unregister the key.",
        start_ticker,
        stop_ticker,
    ),
];

fn start_publish(screen: &mut ScreenController) {
    let bus = screen.event_bus().clone();
    let received = bus
        .subscribe(DEMO_KEY)
        .map(|event| format!("received: {event}"))
        .into_pipeline();
    run_pooled(screen, received);

    let publisher = TaskHandle::spawn(async move {
        for message in DEMO_MESSAGES {
            let delivered = bus.publish(DEMO_KEY, message.to_string());
            debug!(key = DEMO_KEY, delivered, "published demo event");
            tokio::task::yield_now().await;
        }
        bus.unregister(DEMO_KEY);
    });
    screen.add_to_pool(publisher);
}

fn start_ticker(screen: &mut ScreenController) {
    let bus = screen.event_bus().clone();
    let received = bus.subscribe(TICKER_KEY).map(Some);

    // Publishing is polled by the same task as the subscription, so
    // cancelling the primary task also silences this run's publisher.
    let publisher = IntervalStream::new(time::interval(TICKER_PERIOD))
        .enumerate()
        .map(move |(tick, _)| bus.publish(TICKER_KEY, format!("tick {tick}")))
        .take_while(|delivered| {
            if *delivered == 0 {
                debug!(key = TICKER_KEY, "no ticker subscribers left; publisher exiting");
            }
            future::ready(*delivered > 0)
        })
        .map(|_| None);

    let ticks = stream::select(received, publisher).filter_map(future::ready);
    run_primary(screen, ticks.into_pipeline());
}

fn stop_ticker(screen: &mut ScreenController) {
    screen.cancel_primary();
    screen.event_bus().unregister(TICKER_KEY);
}
