//! # IntentRelay Core
//!
//! Pure business logic layer - no infrastructure dependencies.
//!
//! This crate contains:
//! - Credential store and authorization flow
//! - Intent normalization
//! - Action execution, batch aggregation and error classification
//! - The command router tying them together
//! - Port interfaces (traits) for storage, OAuth, the model and the Google
//!   integrations
//!
//! ## Architecture Principles
//! - Only depends on `intentrelay-common` and `intentrelay-domain`
//! - No database, HTTP, or platform code
//! - All external dependencies via traits

pub mod actions;
pub mod credentials;
pub mod intent;
pub mod router;

// Re-export specific items to avoid ambiguity
pub use actions::{
    ActionExecutor, BatchAggregator, CalendarGateway, CreatedEvent, CreatedTask, MailGateway,
    NewCalendarEvent, NewTask, SentMessage, TaskGateway,
};
pub use credentials::{
    AuthorizationFlow, AuthorizationRequest, CredentialRepository, CredentialStore, OAuthProvider,
};
pub use intent::{normalize, IntentExtractor};
pub use router::CommandRouter;
