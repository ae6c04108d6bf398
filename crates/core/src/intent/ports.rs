//! Port interface for the language-model collaborator

use async_trait::async_trait;
use intentrelay_domain::{RawIntentResponse, Result};

/// Turns free text into the model's structured intent response
#[async_trait]
pub trait IntentExtractor: Send + Sync {
    /// Extract intents from one user utterance
    async fn extract(&self, text: &str) -> Result<RawIntentResponse>;
}
