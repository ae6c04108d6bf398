//! Gemini client turning free text into structured intents

use async_trait::async_trait;
use intentrelay_core::IntentExtractor;
use intentrelay_domain::{IntentRelayError, ModelConfig, RawIntentResponse, Result};
use reqwest::Method;
use tracing::{debug, info, warn};

use super::types::{Content, GenerateContentRequest, GenerateContentResponse, GenerationConfig, Part};
use crate::errors::upstream_error;
use crate::http::{Delivery, HttpClient};

const DEFAULT_TEMPERATURE: f32 = 0.2;
const PARSE_FAILURE_MESSAGE: &str = "Failed to parse model response";

const PROMPT_TEMPLATE: &str = r#"Analyze the following user input and extract structured information. Determine the action type (calendar, task, or email) and extract relevant details.

User input: {input}

Return a JSON object with the following structure based on the action type:

For CALENDAR events:
{
  "action": "calendar",
  "title": "Event title",
  "description": "Event description",
  "date": "YYYY-MM-DD or relative date like 'tomorrow', 'next Monday'",
  "time": "HH:MM in 24-hour format",
  "duration": number in minutes,
  "location": "Event location if mentioned"
}

For TASKS:
{
  "action": "task",
  "title": "Task title",
  "description": "Task description",
  "dueDate": "YYYY-MM-DD or relative date",
  "priority": "low" | "medium" | "high"
}

For EMAIL:
{
  "action": "email",
  "recipient": "email@example.com",
  "subject": "Email subject",
  "body": "Email body content"
}

If the input asks for more than one thing, return every request in order:
{
  "actions": [ { ...first action... }, { ...second action... } ]
}

If the action cannot be determined, return:
{
  "action": "unknown",
  "title": "Extracted title if any"
}

IMPORTANT: Return ONLY valid JSON, no additional text or markdown formatting."#;

/// `IntentExtractor` backed by the Gemini `generateContent` endpoint
pub struct GeminiIntentExtractor {
    http: HttpClient,
    api_key: Option<String>,
    model: String,
    base_url: String,
}

impl GeminiIntentExtractor {
    pub fn new(http: HttpClient, config: &ModelConfig) -> Self {
        Self {
            http,
            api_key: config.api_key.clone().filter(|key| !key.trim().is_empty()),
            model: config.model.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
        }
    }

    fn build_prompt(text: &str) -> String {
        // JSON-quote the input so embedded quotes cannot end the string early.
        let quoted = serde_json::to_string(text).unwrap_or_else(|_| format!("\"{text}\""));
        PROMPT_TEMPLATE.replace("{input}", &quoted)
    }
}

#[async_trait]
impl IntentExtractor for GeminiIntentExtractor {
    async fn extract(&self, text: &str) -> Result<RawIntentResponse> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| IntentRelayError::Config("GEMINI_API_KEY is not set".into()))?;

        let url = format!("{}/models/{}:generateContent", self.base_url, self.model);
        let payload = GenerateContentRequest {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![Part { text: Self::build_prompt(text) }],
            }],
            generation_config: GenerationConfig {
                temperature: DEFAULT_TEMPERATURE,
                response_mime_type: "application/json".to_string(),
            },
        };

        info!(model = %self.model, input_len = text.len(), "Extracting intent with Gemini");

        let response = self
            .http
            .send(
                self.http
                    .request(Method::POST, &url)
                    .header("x-goog-api-key", api_key)
                    .json(&payload),
                Delivery::Retryable,
            )
            .await?;

        let status = response.status();
        debug!(status = status.as_u16(), "Received Gemini API response");

        if !status.is_success() {
            return Err(upstream_error("Gemini", response).await);
        }

        let body: GenerateContentResponse = response.json().await.map_err(|e| {
            warn!(error = %e, "Gemini response body is not valid JSON");
            IntentRelayError::Upstream(PARSE_FAILURE_MESSAGE.into())
        })?;

        let content = body.first_text().ok_or_else(|| {
            warn!("Gemini response contained no candidate text");
            IntentRelayError::Upstream(PARSE_FAILURE_MESSAGE.into())
        })?;

        RawIntentResponse::from_json_str(strip_code_fences(&content)).map_err(|e| {
            warn!(error = %e, "Gemini candidate is not an intent object");
            IntentRelayError::Upstream(PARSE_FAILURE_MESSAGE.into())
        })
    }
}

/// Remove a surrounding Markdown code fence, with or without a `json` tag
fn strip_code_fences(text: &str) -> &str {
    let trimmed = text.trim();
    let opened = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```JSON"))
        .or_else(|| trimmed.strip_prefix("```"))
        .unwrap_or(trimmed);
    let closed = opened.trim_end().strip_suffix("```").unwrap_or(opened);
    closed.trim()
}
