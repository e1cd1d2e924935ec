use std::fmt::Display;

use screen_core::{Pipeline, ScreenController};

mod bus;
mod combining;
mod creating;
mod errors;
mod filtering;
pub mod registry;
mod transforming;

pub use bus::{DEMO_KEY, TICKER_KEY};
pub use registry::{Registry, RegistryError};

/// Subscribes `pipeline` and keeps the handle in the screen's pool.
fn run_pooled<T>(screen: &mut ScreenController, pipeline: Pipeline<T>)
where
    T: Display + Send + 'static,
{
    let handle = screen.subscribe(pipeline);
    screen.add_to_pool(handle);
}

fn run_primary<T>(screen: &mut ScreenController, pipeline: Pipeline<T>)
where
    T: Display + Send + 'static,
{
    let handle = screen.subscribe(pipeline);
    screen.set_primary_task(handle);
}
