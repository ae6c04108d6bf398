//! OAuth 2.0 types and structures
//!
//! Token sets, token endpoint responses, provider configuration, and the
//! RFC 6749 error body.

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// OAuth 2.0 access and refresh tokens with metadata
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TokenSet {
    /// Bearer token for API calls
    pub access_token: String,

    /// Refresh token. Providers commonly omit it on refresh responses.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,

    /// Token type (always "Bearer" for Google)
    pub token_type: String,

    /// Access token lifetime in seconds, when the provider reported one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_in: Option<i64>,

    /// Absolute expiration timestamp computed from `expires_in`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,

    /// Granted scopes (space-separated)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
}

impl TokenSet {
    /// Build a token set from a token endpoint response received at `received_at`
    #[must_use]
    pub fn from_response(response: TokenResponse, received_at: DateTime<Utc>) -> Self {
        let expires_at = response
            .expires_in
            .filter(|secs| *secs > 0)
            .map(|secs| received_at + Duration::seconds(secs));

        Self {
            access_token: response.access_token,
            refresh_token: response.refresh_token.filter(|token| !token.is_empty()),
            token_type: response.token_type.unwrap_or_else(|| "Bearer".to_string()),
            expires_in: response.expires_in,
            expires_at,
            scope: response.scope,
        }
    }

    /// Expiry as epoch milliseconds, if known
    #[must_use]
    pub fn expires_at_millis(&self) -> Option<i64> {
        self.expires_at.map(|at| at.timestamp_millis())
    }
}

/// OAuth token response from authorization server (RFC 6749 §5.1)
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub token_type: Option<String>,
    pub expires_in: Option<i64>,
    pub scope: Option<String>,
}

/// OAuth configuration for one provider/client registration
///
/// Process-wide and immutable once built: per-user credentials are passed
/// explicitly to each call, never stored on the config or the client.
#[derive(Debug, Clone)]
pub struct OAuthConfig {
    /// OAuth client ID
    pub client_id: String,

    /// OAuth client secret (confidential server-side clients)
    client_secret: Option<String>,

    /// Redirect URI registered with the provider
    pub redirect_uri: String,

    /// Full authorization endpoint URL
    pub authorization_endpoint: String,

    /// Full token endpoint URL
    pub token_endpoint: String,

    /// OAuth scopes to request
    pub scopes: Vec<String>,

    extra_authorize_params: Vec<(String, String)>,
}

impl OAuthConfig {
    /// Create a new OAuth configuration
    #[must_use]
    pub fn new(
        client_id: String,
        redirect_uri: String,
        authorization_endpoint: String,
        token_endpoint: String,
        scopes: Vec<String>,
    ) -> Self {
        Self {
            client_id,
            client_secret: None,
            redirect_uri,
            authorization_endpoint,
            token_endpoint,
            scopes,
            extra_authorize_params: Vec::new(),
        }
    }

    /// Attach a client secret
    #[must_use]
    pub fn with_client_secret(mut self, secret: Option<String>) -> Self {
        self.client_secret = secret.filter(|s| !s.is_empty());
        self
    }

    /// Add a provider-specific authorization query parameter
    /// (e.g. Google's `access_type=offline`)
    #[must_use]
    pub fn with_authorize_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra_authorize_params.push((key.into(), value.into()));
        self
    }

    /// Client secret, if configured
    #[must_use]
    pub fn client_secret(&self) -> Option<&str> {
        self.client_secret.as_deref()
    }

    /// Extra authorization query parameters
    #[must_use]
    pub fn extra_authorize_params(&self) -> &[(String, String)] {
        &self.extra_authorize_params
    }

    /// Get scopes as space-separated string
    #[must_use]
    pub fn scope_string(&self) -> String {
        self.scopes.join(" ")
    }

    /// Whether both client id and secret are present
    #[must_use]
    pub fn has_client_credentials(&self) -> bool {
        !self.client_id.trim().is_empty() && self.client_secret.is_some()
    }
}

/// OAuth error response from authorization server (RFC 6749 §5.2)
#[derive(Debug, Clone, Deserialize)]
pub struct OAuthError {
    pub error: String,
    pub error_description: Option<String>,
}

/// Codes with which the server refuses the grant itself rather than
/// failing to process the request
const GRANT_REJECTION_CODES: [&str; 4] =
    ["invalid_grant", "invalid_client", "unauthorized_client", "unsupported_grant_type"];

impl OAuthError {
    /// Whether retrying with the same grant cannot succeed
    #[must_use]
    pub fn rejects_grant(&self) -> bool {
        GRANT_REJECTION_CODES.contains(&self.error.as_str())
    }
}

impl fmt::Display for OAuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.error_description {
            Some(desc) => write!(f, "{}: {}", self.error, desc),
            None => write!(f, "{}", self.error),
        }
    }
}

impl std::error::Error for OAuthError {}
