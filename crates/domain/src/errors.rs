//! Error types used throughout the application

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for IntentRelay
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum IntentRelayError {
    /// A required field is missing or a value is unusable
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Authentication error: {0}")]
    Auth(#[from] AuthError),

    /// The external integration rejected or failed the call
    #[error("Upstream error: {0}")]
    Upstream(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Not found: {0}")]
    NotFound(String),

    /// The model response could not be turned into actions
    #[error("Malformed intent: {0}")]
    MalformedIntent(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntentRelayError {
    /// Message without the category prefix, for surfacing to end users
    #[must_use]
    pub fn detail(&self) -> String {
        match self {
            Self::Validation(msg)
            | Self::Upstream(msg)
            | Self::Network(msg)
            | Self::Database(msg)
            | Self::Config(msg)
            | Self::NotFound(msg)
            | Self::MalformedIntent(msg)
            | Self::InvalidInput(msg)
            | Self::Internal(msg) => msg.clone(),
            Self::Auth(err) => err.to_string(),
        }
    }

    /// Whether the caller should run the authorization flow again
    #[must_use]
    pub fn requires_auth(&self) -> bool {
        matches!(self, Self::Auth(_))
    }
}

/// OAuth credential failures
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reason", content = "detail")]
pub enum AuthError {
    /// No usable credential is stored for the user
    #[error("User not authenticated with Google")]
    NotAuthenticated,

    /// The provider rejected the refresh-token grant
    #[error("Token refresh failed: {0}")]
    RefreshFailed(String),

    /// The provider answered an API call with 401/403
    #[error("Google rejected the credential: {0}")]
    Rejected(String),

    #[error("Authorization state is unknown or expired")]
    StateMismatch,

    #[error(
        "No refresh token received. Revoke this app's access in your Google account settings and authorize again."
    )]
    MissingRefreshToken,

    #[error("Authorization code exchange failed: {0}")]
    ExchangeFailed(String),
}

/// Result type alias for IntentRelay operations
pub type Result<T> = std::result::Result<T, IntentRelayError>;
