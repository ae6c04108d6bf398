//! # IntentRelay Infrastructure
//!
//! Infrastructure implementations of core domain ports.
//!
//! This crate contains:
//! - SQLite credential persistence
//! - HTTP client with retry support
//! - Google integrations (OAuth, Calendar, Tasks, Gmail)
//! - Gemini intent extraction
//! - Configuration loading
//!
//! ## Architecture
//! - Implements traits defined in `intentrelay-core`
//! - Depends on `intentrelay-common`, `intentrelay-domain` and `intentrelay-core`
//! - Contains all "impure" code (I/O, network, filesystem)

pub mod config;
pub mod database;
pub mod errors;
pub mod http;
pub mod integrations;

// Re-export commonly used items
pub use database::{DbManager, SqliteCredentialRepository};
pub use errors::InfraError;
pub use http::{Delivery, HttpClient};
pub use integrations::gemini::GeminiIntentExtractor;
pub use integrations::google::{
    GoogleCalendarClient, GoogleGmailClient, GoogleOAuthProvider, GoogleTasksClient,
};
