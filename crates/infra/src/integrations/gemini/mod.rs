//! Gemini integration for intent extraction
//!
//! `GeminiIntentExtractor` implements the `IntentExtractor` port against the
//! `generateContent` endpoint. The prompt describes the calendar, task and
//! email JSON shapes plus the `actions` list form used for multi-step
//! commands. Responses wrapped in Markdown code fences are unwrapped before
//! decoding.
//!
//! Any response that does not decode into an intent becomes
//! `Upstream("Failed to parse model response")`.

pub mod client;
mod types;

pub use client::GeminiIntentExtractor;
