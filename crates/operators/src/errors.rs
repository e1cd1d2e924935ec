use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

use futures::StreamExt;
use screen_core::{
    pipeline::{self, Pipeline},
    OperationDef, ScreenController,
};
use shared::{domain::ScreenId, error::PipelineError};

use crate::run_pooled;

pub(crate) const ERROR_MESSAGE: &str = "boom";
pub(crate) const FALLBACK_ITEM: i64 = -1;
pub(crate) const RETRY_BUDGET: usize = 3;
/// Attempt on which the flaky source in the retry demonstration succeeds.
pub(crate) const SUCCEEDS_ON_ATTEMPT: usize = 3;

pub(crate) const DEFINITIONS: &[OperationDef] = &[
    OperationDef::one_shot(
        ScreenId::ErrorOperator,
        "Error",
        "A stream that fails terminates with the error and emits nothing more.\n\n\
         Press start to emit 1 and then fail.",
        start_error,
    ),
    OperationDef::one_shot(
        ScreenId::OnErrorReturnOperator,
        "OnErrorReturn",
        "OnErrorReturn replaces an error with a fallback item and completes normally.\n\n\
         Press start to emit 1, then the fallback -1 instead of the failure.",
        start_on_error_return,
    ),
    OperationDef::one_shot(
        ScreenId::RetryOperator,
        "Retry",
        "Retry resubscribes to the source when it fails, up to a budget of attempts.\n\n\
         Press start to retry a source that fails twice before succeeding.",
        start_retry,
    ),
];

fn failing_after_one() -> Pipeline<i64> {
    pipeline::just([1])
        .chain(pipeline::fail(PipelineError::emission(ERROR_MESSAGE)))
        .boxed()
}

fn start_error(screen: &mut ScreenController) {
    run_pooled(screen, failing_after_one());
}

fn start_on_error_return(screen: &mut ScreenController) {
    run_pooled(
        screen,
        pipeline::on_error_return(failing_after_one(), |_| FALLBACK_ITEM),
    );
}

fn start_retry(screen: &mut ScreenController) {
    let attempts = Arc::new(AtomicUsize::new(0));
    let flaky = move || {
        let attempt = attempts.fetch_add(1, Ordering::SeqCst) + 1;
        if attempt < SUCCEEDS_ON_ATTEMPT {
            pipeline::just([format!("attempt {attempt}")])
                .chain(pipeline::fail(PipelineError::emission(format!(
                    "attempt {attempt} failed"
                ))))
                .boxed()
        } else {
            pipeline::just([format!("attempt {attempt} succeeded")])
        }
    };
    run_pooled(screen, pipeline::retry(flaky, RETRY_BUDGET));
}
