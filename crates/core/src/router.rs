//! Command router
//!
//! Entry point of the core: text or a raw model response goes in, a single
//! action result or a batch result comes out.

use std::sync::Arc;

use intentrelay_domain::{IntentRelayError, RawIntentResponse, Result, RouteOutcome};
use tracing::{debug, info};

use crate::actions::BatchAggregator;
use crate::intent::{normalize, IntentExtractor};

/// Command router service
pub struct CommandRouter {
    extractor: Arc<dyn IntentExtractor>,
    batch: Arc<BatchAggregator>,
}

impl CommandRouter {
    pub fn new(extractor: Arc<dyn IntentExtractor>, batch: Arc<BatchAggregator>) -> Self {
        Self { extractor, batch }
    }

    /// Normalize and execute an already extracted model response
    ///
    /// One normalized intent yields [`RouteOutcome::Single`], more than one
    /// yields [`RouteOutcome::Batch`].
    ///
    /// # Errors
    /// `Validation` for a blank user id; `MalformedIntent` when the response
    /// cannot be normalized. Action failures are reported inside the outcome.
    pub async fn route(&self, user_id: &str, raw: RawIntentResponse) -> Result<RouteOutcome> {
        let user_id = require_user(user_id)?;
        let intents = normalize(raw)?;
        debug!(user_id, count = intents.len(), "intents normalized");

        let mut batch = self.batch.execute_all(user_id, &intents).await;
        if batch.total == 1 {
            if let Some(result) = batch.results.pop() {
                return Ok(RouteOutcome::Single(result));
            }
        }
        Ok(RouteOutcome::Batch(batch))
    }

    /// Extract intents from `text` with the model, then [`route`](Self::route)
    ///
    /// # Errors
    /// `Validation` for blank text or user id, model failures from the
    /// extractor, and the errors of `route`.
    pub async fn process_text(&self, user_id: &str, text: &str) -> Result<RouteOutcome> {
        let user_id = require_user(user_id)?;
        let text = text.trim();
        if text.is_empty() {
            return Err(IntentRelayError::Validation("Text is required".to_string()));
        }

        info!(user_id, chars = text.chars().count(), "processing command");
        let raw = self.extractor.extract(text).await?;
        self.route(user_id, raw).await
    }
}

fn require_user(user_id: &str) -> Result<&str> {
    let user_id = user_id.trim();
    if user_id.is_empty() {
        return Err(IntentRelayError::Validation("User identity is required".to_string()));
    }
    Ok(user_id)
}
