//! Domain types and models

pub mod credential;
pub mod intent;
pub mod result;

pub use credential::UserCredential;
pub use intent::{
    ActionIntent, ActionKind, CalendarIntent, EmailIntent, Priority, RawIntent,
    RawIntentResponse, TaskIntent,
};
pub use result::{ActionData, ActionResult, BatchResult, FailureKind, RouteOutcome};
