//! Application constants
//!
//! Centralized location for all domain-level constants used throughout the
//! application.

// Credential lifecycle
/// Access tokens expiring within this window are refreshed before use
pub const TOKEN_EXPIRY_BUFFER_MS: i64 = 5 * 60 * 1000;
/// Lifetime assumed when the provider omits `expires_in`
pub const DEFAULT_TOKEN_LIFETIME_SECS: i64 = 3600;
/// Pending authorization states are discarded after this long
pub const AUTH_STATE_TTL_SECS: i64 = 10 * 60;

/// Scopes requested together at authorization time
pub const GOOGLE_SCOPES: [&str; 3] = [
    "https://www.googleapis.com/auth/calendar",
    "https://www.googleapis.com/auth/tasks",
    "https://www.googleapis.com/auth/gmail.send",
];

// Action defaults
pub const DEFAULT_EVENT_DURATION_MINUTES: u32 = 60;
pub const PRIMARY_CALENDAR_ID: &str = "primary";
pub const DEFAULT_TASK_LIST_ID: &str = "@default";
pub const TASK_STATUS_NEEDS_ACTION: &str = "needsAction";

// User-facing messages
pub const UNKNOWN_INTENT_MESSAGE: &str =
    "Could not determine the action from the input. Please be more specific.";
pub const CALENDAR_SUCCESS_MESSAGE: &str = "Calendar event created successfully";
pub const TASK_SUCCESS_MESSAGE: &str = "Task created successfully";
pub const EMAIL_SUCCESS_MESSAGE: &str = "Email sent successfully";
