//! Batch aggregator
//!
//! Executes intents strictly one after another in input order. A panic
//! inside one action is contained and recorded as that action's failure;
//! the remaining actions still run.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use intentrelay_domain::{ActionIntent, BatchResult};
use tracing::{error, info};

use super::classifier;
use super::executor::ActionExecutor;

/// Batch aggregator service
pub struct BatchAggregator {
    executor: Arc<ActionExecutor>,
}

impl BatchAggregator {
    pub fn new(executor: Arc<ActionExecutor>) -> Self {
        Self { executor }
    }

    /// Execute every intent in order and aggregate the results
    pub async fn execute_all(&self, user_id: &str, intents: &[ActionIntent]) -> BatchResult {
        let mut results = Vec::with_capacity(intents.len());

        for (index, intent) in intents.iter().enumerate() {
            let execution = AssertUnwindSafe(self.executor.execute(user_id, intent)).catch_unwind();
            let result = match execution.await {
                Ok(result) => result,
                Err(payload) => {
                    error!(
                        user_id,
                        index,
                        kind = %intent.kind(),
                        panic = panic_message(payload.as_ref()),
                        "action aborted unexpectedly"
                    );
                    classifier::unexpected_failure_result(intent.kind())
                }
            };
            results.push(result);
        }

        let batch = BatchResult::from_results(results);
        info!(
            user_id,
            total = batch.total,
            succeeded = batch.succeeded,
            failed = batch.failed,
            "batch finished"
        );
        batch
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("non-string panic payload")
}
