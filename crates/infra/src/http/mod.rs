//! Shared HTTP client used by the Google and Gemini adapters.

mod client;

pub use client::{Delivery, HttpClient};
